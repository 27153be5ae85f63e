//! Index paths into a concept tree
//!
//! A path `[i0, i1, ..., ik]` addresses `roots[i0].children[i1]...children[ik]`.
//! Paths are only meaningful against the snapshot they were derived from.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConceptPath(Vec<usize>);

impl ConceptPath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Path of a root-level node.
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nesting level, 0 for roots.
    pub fn level(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// This path extended by one child index.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Parent path, `None` for roots and the empty path.
    pub fn parent(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
            _ => None,
        }
    }

    /// Split into parent indices and the index within the parent.
    pub fn split_last(&self) -> Option<(&[usize], usize)> {
        self.0.split_last().map(|(last, rest)| (rest, *last))
    }

    /// True when `self` is `other` or lies inside `other`'s subtree.
    pub fn starts_with(&self, other: &ConceptPath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl From<Vec<usize>> for ConceptPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for ConceptPath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for ConceptPath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for ConceptPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

impl FromStr for ConceptPath {
    type Err = Error;

    /// Parses the dotted form, e.g. `0.2.1`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidPath("path is empty".to_string()));
        }
        s.split('.')
            .map(|segment| {
                segment.parse::<usize>().map_err(|_| {
                    Error::InvalidPath(format!("'{s}': segment '{segment}' is not an index"))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}
