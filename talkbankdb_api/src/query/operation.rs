use std::str::FromStr;

/// Route of the path-tree metadata call.
pub(crate) const PATH_TREES_ROUTE: &str = "getPathTrees";

/// The data queries the service answers with a result table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// One row per transcript.
    Transcripts,
    /// One row per participant per transcript.
    Participants,
    /// One row per token (word).
    Tokens,
    /// One row per distinct token type.
    TokenTypes,
    /// One row per utterance.
    Utterances,
    /// N-gram frequencies; needs `nGram`.
    Ngrams,
    /// Corpus Query Language pattern search; needs `cqlArr`.
    Cql,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Transcripts,
        Operation::Participants,
        Operation::Tokens,
        Operation::TokenTypes,
        Operation::Utterances,
        Operation::Ngrams,
        Operation::Cql,
    ];

    /// Service route this operation posts to.
    pub fn route(&self) -> &'static str {
        match self {
            Operation::Transcripts => "getTranscriptSummary",
            Operation::Participants => "getParticipantSummary",
            Operation::Tokens => "getTokenSummary",
            Operation::TokenTypes => "getTokenTypes",
            Operation::Utterances => "getUtteranceSummary",
            Operation::Ngrams => "getNgrams",
            Operation::Cql => "cql",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Operation::Transcripts => "transcripts",
                Operation::Participants => "participants",
                Operation::Tokens => "tokens",
                Operation::TokenTypes => "token-types",
                Operation::Utterances => "utterances",
                Operation::Ngrams => "ngrams",
                Operation::Cql => "cql",
            }
        )
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.to_string() == s || op.route() == s)
            .ok_or_else(|| format!("unknown operation '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_match_service() {
        assert_eq!(Operation::Transcripts.route(), "getTranscriptSummary");
        assert_eq!(Operation::Participants.route(), "getParticipantSummary");
        assert_eq!(Operation::Tokens.route(), "getTokenSummary");
        assert_eq!(Operation::TokenTypes.route(), "getTokenTypes");
        assert_eq!(Operation::Utterances.route(), "getUtteranceSummary");
        assert_eq!(Operation::Ngrams.route(), "getNgrams");
        assert_eq!(Operation::Cql.route(), "cql");
    }

    #[test]
    fn parses_display_name_and_route() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
            assert_eq!(op.route().parse::<Operation>().unwrap(), op);
        }
        assert!("getEverything".parse::<Operation>().is_err());
    }
}
