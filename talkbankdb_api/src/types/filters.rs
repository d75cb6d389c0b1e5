use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Media type linked to a transcript.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Media {
    #[serde(rename = "audio")]
    Audio,

    #[serde(rename = "video")]
    Video,
}
impl std::fmt::Display for Media {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Media::Audio => "audio",
                Media::Video => "video",
            }
        )
    }
}
impl FromStr for Media {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "audio" => Ok(Media::Audio),
            "video" => Ok(Media::Video),
            other => Err(format!("unknown media type '{}'", other)),
        }
    }
}

/// Gender of the target participant.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    /// Female.
    #[serde(rename = "female")]
    Female,

    /// Male.
    #[serde(rename = "male")]
    Male,
}
impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Gender::Female => "female",
                Gender::Male => "male",
            }
        )
    }
}
impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" | "f" => Ok(Gender::Female),
            "male" | "m" => Ok(Gender::Male),
            other => Err(format!("unknown gender '{}'", other)),
        }
    }
}

/// Study design of the corpus.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesignType {
    /// Longitudinal study.
    #[serde(rename = "long")]
    Longitudinal,

    /// Cross-sectional study.
    #[serde(rename = "cross")]
    CrossSectional,
}
impl std::fmt::Display for DesignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DesignType::Longitudinal => "long",
                DesignType::CrossSectional => "cross",
            }
        )
    }
}
impl FromStr for DesignType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" | "longitudinal" => Ok(DesignType::Longitudinal),
            "cross" | "cross-sectional" => Ok(DesignType::CrossSectional),
            other => Err(format!("unknown design type '{}'", other)),
        }
    }
}

/// Participant age window in months, inclusive on both ends.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgeRange {
    pub from: u32,
    pub to: u32,
}

impl FromStr for AgeRange {
    type Err = String;

    /// Parses `14-18` into `{from: 14, to: 18}`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once('-')
            .ok_or_else(|| format!("age range '{}' must look like FROM-TO", s))?;
        let from = from
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid lower age bound in '{}'", s))?;
        let to = to
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid upper age bound in '{}'", s))?;
        if from > to {
            return Err(format!("age range '{}' is reversed", s));
        }
        Ok(AgeRange { from, to })
    }
}

/// What an n-gram is built from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NgramType {
    /// Exact words.
    #[serde(rename = "word")]
    Word,

    /// Word stems.
    #[serde(rename = "stem")]
    Stem,

    /// Part-of-speech codes.
    #[serde(rename = "pos")]
    PartOfSpeech,
}
impl std::fmt::Display for NgramType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NgramType::Word => "word",
                NgramType::Stem => "stem",
                NgramType::PartOfSpeech => "pos",
            }
        )
    }
}
impl FromStr for NgramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "word" => Ok(NgramType::Word),
            "stem" => Ok(NgramType::Stem),
            "pos" => Ok(NgramType::PartOfSpeech),
            other => Err(format!("unknown n-gram type '{}'", other)),
        }
    }
}

/// N-gram request: size and unit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct NgramSpec {
    pub size: u32,
    #[serde(rename = "type")]
    pub ngram_type: NgramType,
}

/// How a CQL component matches text at its position.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CqlType {
    /// Exact word match.
    #[serde(rename = "word")]
    Word,

    /// Any inflected form of the item.
    #[serde(rename = "lemma")]
    Lemma,

    /// Part-of-speech code.
    #[serde(rename = "pos")]
    PartOfSpeech,
}
impl std::fmt::Display for CqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CqlType::Word => "word",
                CqlType::Lemma => "lemma",
                CqlType::PartOfSpeech => "pos",
            }
        )
    }
}
impl FromStr for CqlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "word" => Ok(CqlType::Word),
            "lemma" => Ok(CqlType::Lemma),
            "pos" => Ok(CqlType::PartOfSpeech),
            other => Err(format!("unknown CQL type '{}'", other)),
        }
    }
}

/// How many times a CQL component may repeat at its position.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CqlFreq {
    #[default]
    #[serde(rename = "once")]
    Once,

    #[serde(rename = "zeroPlus")]
    ZeroPlus,

    #[serde(rename = "onePlus")]
    OnePlus,
}
impl std::fmt::Display for CqlFreq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CqlFreq::Once => "once",
                CqlFreq::ZeroPlus => "zeroPlus",
                CqlFreq::OnePlus => "onePlus",
            }
        )
    }
}
impl FromStr for CqlFreq {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "once" | "1" => Ok(CqlFreq::Once),
            "zeroPlus" | "*" => Ok(CqlFreq::ZeroPlus),
            "onePlus" | "+" => Ok(CqlFreq::OnePlus),
            other => Err(format!("unknown CQL frequency '{}'", other)),
        }
    }
}

/// One component of a CQL search pattern.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CqlToken {
    #[serde(rename = "type")]
    pub cql_type: CqlType,
    pub item: String,
    #[serde(default)]
    pub freq: CqlFreq,
}

impl CqlToken {
    pub fn new(cql_type: CqlType, item: &str, freq: CqlFreq) -> Self {
        Self {
            cql_type,
            item: item.to_string(),
            freq,
        }
    }
}

impl FromStr for CqlToken {
    type Err = String;

    /// Parses `type:item[:freq]`, e.g. `lemma:go:once` or `pos:adv:+`.
    /// Part-of-speech items may contain a colon (`pos:pro:sub:once`), so the
    /// frequency is only split off the end when it parses as one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("CQL component '{}' must look like TYPE:ITEM[:FREQ]", s))?;
        let cql_type = kind.parse::<CqlType>()?;
        let (item, freq) = match rest.rsplit_once(':') {
            Some((item, freq)) => match freq.parse::<CqlFreq>() {
                Ok(freq) => (item, freq),
                Err(_) => (rest, CqlFreq::Once),
            },
            None => (rest, CqlFreq::Once),
        };
        if item.is_empty() {
            return Err(format!("CQL component '{}' has an empty item", s));
        }
        Ok(CqlToken::new(cql_type, item, freq))
    }
}
