//! The caller-facing query description and its wire payload.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};

use crate::{
    types::{AgeRange, CqlToken, Credentials, DesignType, Gender, Media, NgramSpec},
    Error,
};

/// Everything a data query can ask for.
///
/// `corpus_name` is required; every other field is optional and left out of
/// the filter when empty. Keys the client does not recognize are kept in
/// `extra` and forwarded to the service untouched, as is any filter value
/// the typed fields cannot hold exactly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySpec {
    /// Corpus to search (e.g. `childes`).
    pub corpus_name: String,
    /// Paths below the corpus, each from the corpus name down to a folder or file.
    pub corpora: Vec<Vec<String>>,
    /// Prompt for credentials to reach protected collections.
    pub auth: bool,
    /// ISO 639-3 language codes; transcripts must contain all of them.
    pub lang: Vec<String>,
    pub media: Vec<Media>,
    /// Target participant age windows, in months.
    pub age: Vec<AgeRange>,
    pub gender: Vec<Gender>,
    pub design_type: Vec<DesignType>,
    /// Activity codes from the CHAT manual (e.g. `toyplay`).
    pub activity_type: Vec<String>,
    /// Group codes from the CHAT manual (e.g. `HL`).
    pub group_type: Vec<String>,
    /// CQL pattern, used by the CQL operation.
    pub cql_arr: Vec<CqlToken>,
    /// N-gram size and unit, used by the n-gram operation.
    pub ngram: Option<NgramSpec>,
    /// Unrecognized keys, forwarded verbatim.
    pub extra: Map<String, Value>,
}

impl QuerySpec {
    pub fn new(corpus_name: &str) -> Self {
        Self {
            corpus_name: corpus_name.to_string(),
            ..Self::default()
        }
    }

    /// Reads a query from its JSON dictionary form, e.g.
    /// `{"corpusName": "childes", "corpora": [["childes", "Eng-NA"]]}`.
    ///
    /// Only `corpusName`, `corpora` and `auth` must have a fixed shape. Other
    /// filters land in their typed field when it reproduces them exactly and
    /// are otherwise kept in `extra`, so the service sees them as written.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidQuery(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        };

        let corpus_name = match map.remove("corpusName") {
            Some(Value::String(name)) => name,
            _ => return Err(Error::MissingField("corpusName")),
        };
        let corpora = match map.remove("corpora") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(empty)) if empty.is_empty() => Vec::new(),
            Some(raw) => serde_json::from_value(raw)
                .map_err(|e| Error::InvalidQuery(format!("corpora: {}", e)))?,
        };
        let auth = match map.remove("auth") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(auth)) => auth,
            Some(other) => {
                return Err(Error::InvalidQuery(format!(
                    "auth must be true or false, got {}",
                    other
                )))
            }
        };

        Ok(Self {
            corpus_name,
            corpora,
            auth,
            lang: take_exact(&mut map, "lang").unwrap_or_default(),
            media: take_exact(&mut map, "media").unwrap_or_default(),
            age: take_exact(&mut map, "age").unwrap_or_default(),
            gender: take_exact(&mut map, "gender").unwrap_or_default(),
            design_type: take_exact(&mut map, "designType").unwrap_or_default(),
            activity_type: take_exact(&mut map, "activityType").unwrap_or_default(),
            group_type: take_exact(&mut map, "groupType").unwrap_or_default(),
            cql_arr: take_exact(&mut map, "cqlArr").unwrap_or_default(),
            ngram: take_exact(&mut map, "nGram"),
            extra: map,
        })
    }

    pub fn with_corpus_path<S: AsRef<str>>(mut self, path: &[S]) -> Self {
        self.corpora
            .push(path.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    pub fn with_auth(mut self, auth: bool) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_lang(mut self, lang: &str) -> Self {
        self.lang.push(lang.to_string());
        self
    }

    pub fn with_media(mut self, media: Media) -> Self {
        self.media.push(media);
        self
    }

    pub fn with_age(mut self, from_months: u32, to_months: u32) -> Self {
        self.age.push(AgeRange {
            from: from_months,
            to: to_months,
        });
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender.push(gender);
        self
    }

    pub fn with_design_type(mut self, design_type: DesignType) -> Self {
        self.design_type.push(design_type);
        self
    }

    pub fn with_activity_type(mut self, activity_type: &str) -> Self {
        self.activity_type.push(activity_type.to_string());
        self
    }

    pub fn with_group_type(mut self, group_type: &str) -> Self {
        self.group_type.push(group_type.to_string());
        self
    }

    pub fn with_cql_token(mut self, token: CqlToken) -> Self {
        self.cql_arr.push(token);
        self
    }

    pub fn with_ngram(mut self, ngram: NgramSpec) -> Self {
        self.ngram = Some(ngram);
        self
    }

    /// Adds a filter the client has no typed field for.
    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// Builds the `{"queryVals": {...}}` body the service expects.
    ///
    /// Unset filters are sent as `{}`. When `credentials` is given the body
    /// also carries `auth: true` and the logins under `nsAuth`.
    pub fn to_payload(&self, credentials: Option<&[Credentials]>) -> Result<Value, Error> {
        let mut vals = self.extra.clone();
        vals.insert("corpusName".to_string(), json!(self.corpus_name));
        vals.insert("corpora".to_string(), list_or_empty(&self.corpora)?);
        put_list(&mut vals, "lang", &self.lang)?;
        put_list(&mut vals, "media", &self.media)?;
        put_list(&mut vals, "age", &self.age)?;
        put_list(&mut vals, "gender", &self.gender)?;
        put_list(&mut vals, "designType", &self.design_type)?;
        put_list(&mut vals, "activityType", &self.activity_type)?;
        put_list(&mut vals, "groupType", &self.group_type)?;
        put_list(&mut vals, "cqlArr", &self.cql_arr)?;
        match &self.ngram {
            Some(ngram) => {
                vals.insert("nGram".to_string(), to_json(ngram)?);
            }
            None => {
                vals.entry("nGram").or_insert_with(|| json!({}));
            }
        }
        vals.insert("respType".to_string(), json!("JSON"));

        if let Some(credentials) = credentials {
            vals.insert("auth".to_string(), json!(true));
            vals.insert("nsAuth".to_string(), to_json(&credentials)?);
        }

        Ok(json!({ "queryVals": vals }))
    }
}

/// Removes `key` from `map` if its value reads as `T` and writes back
/// unchanged. Anything else, including an empty list, stays in `map`.
fn take_exact<T: DeserializeOwned + Serialize>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let raw = map.get(key)?;
    if raw.as_array().is_some_and(Vec::is_empty) {
        return None;
    }
    let typed: T = serde_json::from_value(raw.clone()).ok()?;
    if serde_json::to_value(&typed).ok().as_ref() != Some(raw) {
        return None;
    }
    map.remove(key);
    Some(typed)
}

/// Typed values win; an empty field keeps whatever `extra` holds for the key.
fn put_list<T: Serialize>(vals: &mut Map<String, Value>, key: &str, items: &[T]) -> Result<(), Error> {
    if items.is_empty() {
        vals.entry(key).or_insert_with(|| json!({}));
    } else {
        vals.insert(key.to_string(), to_json(&items)?);
    }
    Ok(())
}

fn list_or_empty<T: Serialize>(items: &[T]) -> Result<Value, Error> {
    if items.is_empty() {
        Ok(json!({}))
    } else {
        to_json(&items)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|e| Error::InvalidQuery(e.to_string()))
}
