//! The data-query subcommands: transcripts, participants, tokens, token types,
//! utterances, n-grams and CQL.

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use serde_json::Value;
use talkbankdb_api::types::{
    AgeRange, CqlToken, DesignType, Gender, Media, NgramSpec, NgramType,
};
use talkbankdb_api::{Client, Operation, QuerySpec, Transport};

use crate::output::{print_result_table, OutputFormat};

/// Filters shared by every data query. List flags take comma-separated values.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Corpus to search (e.g. childes). Defaults to the first segment of the first --corpus path
    #[arg(long)]
    pub corpus_name: Option<String>,

    /// Corpus path to search under, slash-separated (e.g. childes/Eng-NA/MacWhinney). Repeatable
    #[arg(long = "corpus")]
    pub corpora: Vec<String>,

    /// Language codes, ISO 639-3 (e.g. eng,spa)
    #[arg(long)]
    pub lang: Option<String>,

    /// Media type: audio, video
    #[arg(long)]
    pub media: Option<String>,

    /// Target participant age ranges in months (e.g. 14-18,24-30)
    #[arg(long)]
    pub age: Option<String>,

    /// Target participant gender: female (f), male (m)
    #[arg(long)]
    pub gender: Option<String>,

    /// Study design: long, cross
    #[arg(long)]
    pub design_type: Option<String>,

    /// Activity type from the CHAT manual (e.g. toyplay)
    #[arg(long)]
    pub activity_type: Option<String>,

    /// Group type from the CHAT manual (e.g. HL)
    #[arg(long)]
    pub group_type: Option<String>,

    /// Extra service filter as KEY=JSON (e.g. 'speakerRole=["Target_Child"]'). Repeatable
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Prompt for credentials to reach protected collections
    #[arg(long)]
    pub auth: bool,
}

#[derive(Args, Debug)]
pub struct NgramArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Number of units per n-gram
    #[arg(long, default_value = "2")]
    pub size: u32,

    /// N-gram unit: word, stem, pos
    #[arg(long = "type", default_value = "word")]
    pub ngram_type: String,
}

#[derive(Args, Debug)]
pub struct CqlArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Pattern as comma-separated TYPE:ITEM[:FREQ] components, where TYPE is
    /// word, lemma or pos and FREQ is once, zeroPlus (*) or onePlus (+)
    /// (e.g. lemma:go:once,word:home)
    #[arg(long, required = true)]
    pub pattern: String,
}

fn split_list(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_list<T>(input: &Option<String>) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = String>,
{
    match input {
        Some(raw) => split_list(raw)
            .map(|item| item.parse::<T>().map_err(|e| anyhow!(e)))
            .collect(),
        None => Ok(Vec::new()),
    }
}

fn parse_corpus_path(raw: &str) -> Result<Vec<String>> {
    let segments: Vec<String> = raw
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if segments.is_empty() {
        bail!("corpus path '{}' has no segments", raw);
    }
    Ok(segments)
}

fn parse_filter(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("filter '{}' must look like KEY=JSON", raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("filter '{}' has an empty key", raw);
    }
    // Bare words are taken as strings so `--filter role=CHI` works unquoted.
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Turns command-line filters into a [`QuerySpec`].
///
/// An absent corpus name is left empty so the client reports it as missing.
pub fn build_query(args: &QueryArgs) -> Result<QuerySpec> {
    let corpora = args
        .corpora
        .iter()
        .map(|raw| parse_corpus_path(raw))
        .collect::<Result<Vec<_>>>()?;

    let corpus_name = args
        .corpus_name
        .clone()
        .or_else(|| corpora.first().and_then(|path| path.first().cloned()))
        .unwrap_or_default();

    let mut query = QuerySpec::new(&corpus_name).with_auth(args.auth);
    for path in corpora.iter() {
        query = query.with_corpus_path(path.as_slice());
    }
    if let Some(ref lang) = args.lang {
        for code in split_list(lang) {
            query = query.with_lang(code);
        }
    }
    for media in parse_list::<Media>(&args.media)? {
        query = query.with_media(media);
    }
    for range in parse_list::<AgeRange>(&args.age)? {
        query = query.with_age(range.from, range.to);
    }
    for gender in parse_list::<Gender>(&args.gender)? {
        query = query.with_gender(gender);
    }
    for design in parse_list::<DesignType>(&args.design_type)? {
        query = query.with_design_type(design);
    }
    if let Some(ref activity) = args.activity_type {
        for code in split_list(activity) {
            query = query.with_activity_type(code);
        }
    }
    if let Some(ref group) = args.group_type {
        for code in split_list(group) {
            query = query.with_group_type(code);
        }
    }
    for raw in args.filters.iter() {
        let (key, value) = parse_filter(raw)?;
        query = query.with_extra(&key, value);
    }
    Ok(query)
}

pub fn build_ngram_query(args: &NgramArgs) -> Result<QuerySpec> {
    if args.size == 0 {
        bail!("n-gram size must be at least 1");
    }
    let ngram_type = args
        .ngram_type
        .parse::<NgramType>()
        .map_err(|e| anyhow!(e))?;
    Ok(build_query(&args.query)?.with_ngram(NgramSpec {
        size: args.size,
        ngram_type,
    }))
}

pub fn build_cql_query(args: &CqlArgs) -> Result<QuerySpec> {
    let tokens = split_list(&args.pattern)
        .map(|component| component.parse::<CqlToken>().map_err(|e| anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;
    if tokens.is_empty() {
        bail!("CQL pattern is empty");
    }
    Ok(tokens
        .into_iter()
        .fold(build_query(&args.query)?, |query, token| query.with_cql_token(token)))
}

async fn execute<T: Transport>(
    operation: Operation,
    query: &QuerySpec,
    client: &Client<T>,
    format: &OutputFormat,
) -> Result<()> {
    let table = client
        .query(operation, query)
        .await
        .with_context(|| format!("{} query failed", operation))?;
    print_result_table(&table, format)
}

pub async fn run<T: Transport>(
    args: &QueryArgs,
    operation: Operation,
    client: &Client<T>,
    format: &OutputFormat,
) -> Result<()> {
    let query = build_query(args)?;
    execute(operation, &query, client, format).await
}

pub async fn run_ngrams<T: Transport>(
    args: &NgramArgs,
    client: &Client<T>,
    format: &OutputFormat,
) -> Result<()> {
    let query = build_ngram_query(args)?;
    execute(Operation::Ngrams, &query, client, format).await
}

pub async fn run_cql<T: Transport>(
    args: &CqlArgs,
    client: &Client<T>,
    format: &OutputFormat,
) -> Result<()> {
    let query = build_cql_query(args)?;
    execute(Operation::Cql, &query, client, format).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use talkbankdb_api::types::{CqlFreq, CqlType};

    #[derive(Parser)]
    struct QueryHarness {
        #[command(flatten)]
        args: QueryArgs,
    }

    #[derive(Parser)]
    struct NgramHarness {
        #[command(flatten)]
        args: NgramArgs,
    }

    #[derive(Parser)]
    struct CqlHarness {
        #[command(flatten)]
        args: CqlArgs,
    }

    fn query_from(argv: &[&str]) -> Result<QuerySpec> {
        let harness = QueryHarness::try_parse_from(std::iter::once("tbdb").chain(argv.iter().copied()))?;
        build_query(&harness.args)
    }

    #[test]
    fn corpus_name_defaults_to_first_path_segment() {
        let query = query_from(&["--corpus", "childes/Eng-NA/MacWhinney/010411a"]).unwrap();
        assert_eq!(query.corpus_name, "childes");
        assert_eq!(
            query.corpora,
            vec![vec!["childes", "Eng-NA", "MacWhinney", "010411a"]]
        );
    }

    #[test]
    fn explicit_corpus_name_wins() {
        let query = query_from(&["--corpus-name", "ca", "--corpus", "childes/Eng-NA"]).unwrap();
        assert_eq!(query.corpus_name, "ca");
    }

    #[test]
    fn no_corpus_leaves_name_empty() {
        let query = query_from(&["--lang", "eng"]).unwrap();
        assert!(query.corpus_name.is_empty());
    }

    #[test]
    fn repeated_corpus_paths_are_kept_in_order() {
        let query = query_from(&[
            "--corpus",
            "childes/Eng-NA/Brown",
            "--corpus",
            "/childes/Eng-NA/MacWhinney/",
        ])
        .unwrap();
        assert_eq!(query.corpora.len(), 2);
        assert_eq!(query.corpora[1], vec!["childes", "Eng-NA", "MacWhinney"]);
    }

    #[test]
    fn parses_comma_separated_filters() {
        let query = query_from(&[
            "--corpus-name",
            "childes",
            "--lang",
            "eng, spa",
            "--media",
            "video",
            "--age",
            "14-18,24-30",
            "--gender",
            "f",
            "--design-type",
            "long",
            "--activity-type",
            "toyplay",
            "--group-type",
            "HL,TD",
            "--auth",
        ])
        .unwrap();
        assert_eq!(query.lang, vec!["eng", "spa"]);
        assert_eq!(query.media, vec![Media::Video]);
        assert_eq!(query.age.len(), 2);
        assert_eq!(query.age[1], AgeRange { from: 24, to: 30 });
        assert_eq!(query.gender, vec![Gender::Female]);
        assert_eq!(query.design_type, vec![DesignType::Longitudinal]);
        assert_eq!(query.activity_type, vec!["toyplay"]);
        assert_eq!(query.group_type, vec!["HL", "TD"]);
        assert!(query.auth);
    }

    #[test]
    fn rejects_unknown_enum_values() {
        assert!(query_from(&["--corpus-name", "childes", "--media", "hologram"]).is_err());
        assert!(query_from(&["--corpus-name", "childes", "--age", "old"]).is_err());
        assert!(query_from(&["--corpus", "//"]).is_err());
    }

    #[test]
    fn extra_filters_accept_json_or_bare_words() {
        let query = query_from(&[
            "--corpus-name",
            "childes",
            "--filter",
            "speakerRole=[\"Target_Child\"]",
            "--filter",
            "role=CHI",
        ])
        .unwrap();
        assert_eq!(query.extra.get("speakerRole"), Some(&json!(["Target_Child"])));
        assert_eq!(query.extra.get("role"), Some(&json!("CHI")));
        assert!(query_from(&["--corpus-name", "childes", "--filter", "novalue"]).is_err());
    }

    #[test]
    fn ngram_args_build_spec() {
        let harness = NgramHarness::try_parse_from([
            "tbdb",
            "--corpus",
            "childes/Eng-NA",
            "--size",
            "3",
            "--type",
            "pos",
        ])
        .unwrap();
        let query = build_ngram_query(&harness.args).unwrap();
        assert_eq!(
            query.ngram,
            Some(NgramSpec {
                size: 3,
                ngram_type: NgramType::PartOfSpeech
            })
        );

        let harness =
            NgramHarness::try_parse_from(["tbdb", "--corpus", "childes", "--size", "0"]).unwrap();
        assert!(build_ngram_query(&harness.args).is_err());
    }

    #[test]
    fn cql_pattern_builds_tokens() {
        let harness = CqlHarness::try_parse_from([
            "tbdb",
            "--corpus",
            "childes/Eng-NA/MacWhinney",
            "--pattern",
            "pos:pro:sub:once,lemma:go,pos:adv:+,word:home",
        ])
        .unwrap();
        let query = build_cql_query(&harness.args).unwrap();
        assert_eq!(query.cql_arr.len(), 4);
        assert_eq!(
            query.cql_arr[0],
            CqlToken::new(CqlType::PartOfSpeech, "pro:sub", CqlFreq::Once)
        );
        assert_eq!(query.cql_arr[2].freq, CqlFreq::OnePlus);
        assert_eq!(query.cql_arr[3].cql_type, CqlType::Word);
    }

    #[test]
    fn cql_requires_pattern() {
        assert!(CqlHarness::try_parse_from(["tbdb", "--corpus", "childes"]).is_err());
        let harness =
            CqlHarness::try_parse_from(["tbdb", "--corpus", "childes", "--pattern", ","]).unwrap();
        assert!(build_cql_query(&harness.args).is_err());
    }
}
