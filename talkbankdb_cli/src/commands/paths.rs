//! The `path-trees` and `valid-path` subcommands.

use anyhow::{bail, Result};
use clap::Args;
use talkbankdb_api::types::{PathNode, ResultTable};
use talkbankdb_api::{Client, Transport, ValidationOutcome};

use crate::output::{print_json, print_result_table, OutputFormat};

#[derive(Args, Debug)]
pub struct PathTreesArgs {
    /// Only list what sits below this slash-separated path (e.g. childes/Eng-NA)
    #[arg(long)]
    pub under: Option<String>,
}

#[derive(Args, Debug)]
pub struct ValidPathArgs {
    /// Slash-separated corpus path (e.g. childes/Eng-NA/MacWhinney/010411a)
    pub path: String,
}

fn split_path(raw: &str) -> Vec<String> {
    raw.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// One row per child of `node`: its name, full path and number of children.
fn children_table(prefix: &[String], node: &PathNode) -> Result<ResultTable> {
    let rows = node
        .child_names()
        .map(|name| {
            let mut path = prefix.to_vec();
            path.push(name.to_string());
            let below = node.child(name).map(|c| c.child_names().count()).unwrap_or(0);
            vec![name.to_string(), path.join("/"), below.to_string()]
        })
        .collect();
    Ok(ResultTable::new(
        vec!["name".to_string(), "path".to_string(), "children".to_string()],
        rows,
    )?)
}

fn describe_invalid(segments: &[String], depth: usize) -> String {
    format!(
        "Invalid path at: {} (depth {} of {})",
        segments.get(depth).map(String::as_str).unwrap_or(""),
        depth,
        segments.join("/")
    )
}

pub async fn run_path_trees<T: Transport>(
    args: &PathTreesArgs,
    client: &Client<T>,
    format: &OutputFormat,
) -> Result<()> {
    let tree = client.path_tree().await?;
    let prefix = args.under.as_deref().map(split_path).unwrap_or_default();

    let node = match tree.node(prefix.as_slice()) {
        Some(node) => node,
        None => match tree.validate(prefix.as_slice()) {
            ValidationOutcome::Invalid { depth } => bail!(describe_invalid(&prefix, depth)),
            ValidationOutcome::Valid => bail!("path {} not found", prefix.join("/")),
        },
    };

    match format {
        OutputFormat::Json => print_json(node),
        _ => print_result_table(&children_table(&prefix, node)?, format)?,
    }
    Ok(())
}

pub async fn run_valid_path<T: Transport>(args: &ValidPathArgs, client: &Client<T>) -> Result<()> {
    let segments = split_path(&args.path);
    match client.valid_path(segments.as_slice()).await? {
        ValidationOutcome::Valid => {
            println!("Valid path: {}", segments.join("/"));
            Ok(())
        }
        ValidationOutcome::Invalid { depth } => bail!(describe_invalid(&segments, depth)),
    }
}
