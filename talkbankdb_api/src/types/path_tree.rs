use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::Error;

/// One named level of the corpus hierarchy. Leaves have no children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathNode {
    children: BTreeMap<String, PathNode>,
}

impl PathNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a child and returns `self` for chaining.
    pub fn with_child(mut self, name: &str, child: PathNode) -> Self {
        self.children.insert(name.to_string(), child);
        self
    }

    /// Adds an empty child.
    pub fn with_leaf(self, name: &str) -> Self {
        self.with_child(name, PathNode::new())
    }

    pub fn child(&self, name: &str) -> Option<&PathNode> {
        self.children.get(name)
    }

    /// Child names in sorted order.
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self {
                children: map
                    .into_iter()
                    .map(|(name, child)| (name, PathNode::from_value(child)))
                    .collect(),
            },
            // The service marks leaves with scalars or empty collections.
            _ => Self::default(),
        }
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.children
                .iter()
                .map(|(name, child)| (name.clone(), child.to_value()))
                .collect::<Map<String, Value>>(),
        )
    }
}

impl<'de> Deserialize<'de> for PathNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(PathNode::from_value)
    }
}

impl Serialize for PathNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

/// The hierarchy of valid corpus, collection and transcript paths.
///
/// The root's children are corpus names (`childes`, `aphasia`, ...). The tree
/// is read-only once built and can be shared across threads.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct PathTree {
    root: PathNode,
}

impl PathTree {
    pub fn new(root: PathNode) -> Self {
        Self { root }
    }

    /// Builds a tree from a `getPathTrees` response, unwrapping `respMsg`.
    pub fn from_response(value: Value) -> Result<Self, Error> {
        let tree = match value {
            Value::Object(mut map) => match map.remove("respMsg") {
                Some(Value::Object(inner)) => Value::Object(inner),
                Some(other) => {
                    return Err(Error::MalformedResponse(format!(
                        "respMsg must hold the path tree object, got {}",
                        other
                    )))
                }
                None => Value::Object(map),
            },
            other => {
                return Err(Error::MalformedResponse(format!(
                    "expected a path tree object, got {}",
                    other
                )))
            }
        };
        Ok(Self {
            root: PathNode::from_value(tree),
        })
    }

    pub fn root(&self) -> &PathNode {
        &self.root
    }

    /// Node reached by walking `segments` from the root, if the walk succeeds.
    pub fn node<S: AsRef<str>>(&self, segments: &[S]) -> Option<&PathNode> {
        segments
            .iter()
            .try_fold(&self.root, |node, segment| node.child(segment.as_ref()))
    }

    /// Corpus names at the top of the hierarchy.
    pub fn corpus_names(&self) -> impl Iterator<Item = &str> {
        self.root.child_names()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }
}
