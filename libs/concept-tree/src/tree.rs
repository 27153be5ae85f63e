//! The concept tree and its path-addressed mutations
//!
//! Every operation re-walks the tree from the roots using the supplied path.
//! No node references are retained between calls.

use crate::error::{Error, Result};
use crate::path::ConceptPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use termadmin_models::ConceptNode;

/// Ordered root concepts of one code system.
///
/// Serializes as the bare JSON array stored in `CodeSystem.concept`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptTree {
    roots: Vec<ConceptNode>,
}

/// Scalar concept fields the editor can overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConceptField {
    Code,
    Display,
    Definition,
}

impl ConceptField {
    pub const ALL: [ConceptField; 3] = [Self::Code, Self::Display, Self::Definition];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Display => "display",
            Self::Definition => "definition",
        }
    }

    pub fn get<'a>(&self, node: &'a ConceptNode) -> &'a str {
        match self {
            Self::Code => &node.code,
            Self::Display => &node.display,
            Self::Definition => &node.definition,
        }
    }

    fn slot<'a>(&self, node: &'a mut ConceptNode) -> &'a mut String {
        match self {
            Self::Code => &mut node.code,
            Self::Display => &mut node.display,
            Self::Definition => &mut node.definition,
        }
    }
}

impl fmt::Display for ConceptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConceptField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "code" => Ok(Self::Code),
            "display" => Ok(Self::Display),
            "definition" => Ok(Self::Definition),
            other => Err(Error::UnknownField(other.to_string())),
        }
    }
}

impl ConceptTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(roots: Vec<ConceptNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[ConceptNode] {
        &self.roots
    }

    pub fn into_nodes(self) -> Vec<ConceptNode> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every level.
    pub fn len(&self) -> usize {
        self.roots.iter().map(ConceptNode::subtree_len).sum()
    }

    /// Number of levels, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.roots.iter().map(ConceptNode::depth).max().unwrap_or(0)
    }

    pub fn node(&self, path: &ConceptPath) -> Option<&ConceptNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.roots.get(*first)?;
        for idx in rest {
            node = node.children.get(*idx)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &ConceptPath) -> Option<&mut ConceptNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for idx in rest {
            node = node.children.get_mut(*idx)?;
        }
        Some(node)
    }

    pub fn contains(&self, path: &ConceptPath) -> bool {
        self.node(path).is_some()
    }

    /// Every node path in depth-first pre-order.
    pub fn paths(&self) -> Vec<ConceptPath> {
        fn walk(nodes: &[ConceptNode], prefix: &ConceptPath, out: &mut Vec<ConceptPath>) {
            for (idx, node) in nodes.iter().enumerate() {
                let path = prefix.child(idx);
                out.push(path.clone());
                walk(&node.children, &path, out);
            }
        }
        let mut out = Vec::with_capacity(self.len());
        walk(&self.roots, &ConceptPath::default(), &mut out);
        out
    }

    /// The sibling list a new node would be appended to: the roots for
    /// `None`, otherwise the children of the addressed node.
    fn siblings_mut(&mut self, parent: Option<&ConceptPath>) -> Result<&mut Vec<ConceptNode>> {
        match parent {
            None => Ok(&mut self.roots),
            Some(path) if path.is_empty() => Err(Error::EmptyPath),
            Some(path) => self
                .node_mut(path)
                .map(|node| &mut node.children)
                .ok_or_else(|| Error::PathNotFound { path: path.clone() }),
        }
    }

    /// Append a blank concept under `parent` (or at the root) and return
    /// the path of the new node.
    pub fn push_empty(&mut self, parent: Option<&ConceptPath>) -> Result<ConceptPath> {
        let siblings = self.siblings_mut(parent)?;
        siblings.push(ConceptNode::empty());
        let index = siblings.len() - 1;
        Ok(match parent {
            Some(path) => path.child(index),
            None => ConceptPath::root(index),
        })
    }

    /// Overwrite one scalar field of the node at `path`.
    pub fn set_field(
        &mut self,
        path: &ConceptPath,
        field: ConceptField,
        value: impl Into<String>,
    ) -> Result<()> {
        if path.is_empty() {
            return Err(Error::EmptyPath);
        }
        let node = self
            .node_mut(path)
            .ok_or_else(|| Error::PathNotFound { path: path.clone() })?;
        *field.slot(node) = value.into();
        Ok(())
    }

    /// Detach the node at `path` together with its subtree.
    pub fn remove(&mut self, path: &ConceptPath) -> Result<ConceptNode> {
        let (parent, index) = path.split_last().ok_or(Error::EmptyPath)?;
        let siblings = if parent.is_empty() {
            &mut self.roots
        } else {
            &mut self
                .node_mut(&ConceptPath::from(parent))
                .ok_or_else(|| Error::PathNotFound { path: path.clone() })?
                .children
        };
        if index >= siblings.len() {
            return Err(Error::PathNotFound { path: path.clone() });
        }
        Ok(siblings.remove(index))
    }
}

impl From<Vec<ConceptNode>> for ConceptTree {
    fn from(roots: Vec<ConceptNode>) -> Self {
        Self::from_nodes(roots)
    }
}

impl From<ConceptTree> for Vec<ConceptNode> {
    fn from(tree: ConceptTree) -> Self {
        tree.into_nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConceptTree {
        ConceptTree::from_nodes(vec![
            ConceptNode::new("A").with_children(vec![
                ConceptNode::new("A1"),
                ConceptNode::new("A2").with_children(vec![ConceptNode::new("A2a")]),
            ]),
            ConceptNode::new("B"),
        ])
    }

    #[test]
    fn node_walks_children_by_index() {
        let tree = sample();
        assert_eq!(tree.node(&[0, 1, 0].into()).unwrap().code, "A2a");
        assert_eq!(tree.node(&[1].into()).unwrap().code, "B");
        assert!(tree.node(&[0, 2].into()).is_none());
        assert!(tree.node(&ConceptPath::default()).is_none());
        assert!(tree.contains(&[0, 1, 0].into()));
        assert!(!tree.contains(&[0, 1, 1].into()));
    }

    #[test]
    fn paths_are_pre_order() {
        let rendered: Vec<String> = sample().paths().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["0", "0.0", "0.1", "0.1.0", "1"]);
    }

    #[test]
    fn len_and_depth() {
        let tree = sample();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.depth(), 3);
        assert_eq!(ConceptTree::new().depth(), 0);
    }

    #[test]
    fn push_empty_rejects_missing_parent() {
        let mut tree = sample();
        let err = tree.push_empty(Some(&[3].into())).unwrap_err();
        assert!(matches!(err, Error::PathNotFound { .. }));
        assert!(matches!(
            tree.push_empty(Some(&ConceptPath::default())),
            Err(Error::EmptyPath)
        ));
        assert_eq!(tree, sample());
    }

    #[test]
    fn remove_out_of_range_leaves_tree_alone() {
        let mut tree = sample();
        assert!(matches!(
            tree.remove(&[0, 5].into()),
            Err(Error::PathNotFound { .. })
        ));
        assert!(matches!(
            tree.remove(&[9, 0].into()),
            Err(Error::PathNotFound { .. })
        ));
        assert!(matches!(tree.remove(&ConceptPath::default()), Err(Error::EmptyPath)));
        assert_eq!(tree, sample());
    }

    #[test]
    fn field_names_parse() {
        for field in ConceptField::ALL {
            assert_eq!(field.as_str().parse::<ConceptField>().unwrap(), field);
        }
        assert!(matches!(
            "designation".parse::<ConceptField>(),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn serializes_as_bare_array() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["concept"][1]["concept"][0]["code"], "A2a");
    }
}
