use std::io::Write;
use std::str::FromStr;

use anyhow::{bail, Result};
use talkbankdb_api::types::ResultTable;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::Table;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!("unknown output format '{}' (expected table, json, csv or markdown)", other),
        }
    }
}

pub fn build_table(table: &ResultTable) -> Table {
    let mut builder = Builder::default();
    builder.push_record(table.col_headings.iter().cloned());
    for row in table.data.iter() {
        builder.push_record(row.iter().cloned());
    }
    builder.build()
}

pub fn print_result_table(table: &ResultTable, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", build_table(table));
            eprintln!("{} row(s)", table.len());
        }
        OutputFormat::Markdown => {
            let mut rendered = build_table(table);
            rendered.with(Style::markdown());
            println!("{}", rendered);
        }
        OutputFormat::Csv => write_csv(table, std::io::stdout())?,
        OutputFormat::Json => print_json(table),
    }
    Ok(())
}

// -- CSV output --

pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.col_headings)?;
    for row in table.data.iter() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
