//! Local checks run before any request leaves the client.

use crate::{
    types::{PathNode, PathTree},
    Error, QuerySpec,
};

/// Result of walking a corpus path through the [`PathTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Every segment named a child of the node reached before it.
    Valid,
    /// The segment at `depth` (zero-based) is not a child of its parent node.
    Invalid { depth: usize },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Depth of the first bad segment, if any.
    pub fn failed_depth(&self) -> Option<usize> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid { depth } => Some(*depth),
        }
    }
}

/// Walks `segments` from the root of `tree`, one child lookup per segment.
///
/// An empty path is valid. A path that runs past a leaf fails at the first
/// segment below the leaf, since leaves have no children.
pub fn validate_path<S: AsRef<str>>(segments: &[S], tree: &PathTree) -> ValidationOutcome {
    let mut node: &PathNode = tree.root();
    for (depth, segment) in segments.iter().enumerate() {
        match node.child(segment.as_ref()) {
            Some(child) => node = child,
            None => return ValidationOutcome::Invalid { depth },
        }
    }
    ValidationOutcome::Valid
}

impl PathTree {
    /// Shorthand for [`validate_path`] against this tree.
    pub fn validate<S: AsRef<str>>(&self, segments: &[S]) -> ValidationOutcome {
        validate_path(segments, self)
    }
}

/// Fails with [`Error::MissingField`] if the query has no corpus name.
pub fn validate_corpus_name(query: &QuerySpec) -> Result<(), Error> {
    if query.corpus_name.trim().is_empty() {
        return Err(Error::MissingField("corpusName"));
    }
    Ok(())
}

/// Checks each `corpora` entry in order and reports the first one that fails.
pub fn validate_corpora(query: &QuerySpec, tree: &PathTree) -> Result<(), Error> {
    for path in query.corpora.iter() {
        if let ValidationOutcome::Invalid { depth } = validate_path(path.as_slice(), tree) {
            tracing::warn!(
                "Corpus path {} is invalid at depth {}",
                path.join("/"),
                depth
            );
            return Err(Error::InvalidPath {
                path: path.clone(),
                depth,
            });
        }
    }
    Ok(())
}
