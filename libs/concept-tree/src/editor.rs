//! Concept tree editor
//!
//! The editor never owns the tree. Each operation takes the owner's current
//! snapshot, applies the change to a copy and hands the updated tree back in
//! an [`Edit`]; the owner stores it. The editor itself only keeps
//! presentation state (node keys and collapsed flags).
//!
//! Paths must come from the snapshot being edited, normally straight from the
//! latest render pass. A path that no longer addresses a node is rejected
//! with [`Error::PathNotFound`](crate::Error::PathNotFound) and nothing changes.

use crate::error::Result;
use crate::expansion::{ExpansionState, NodeKey};
use crate::path::ConceptPath;
use crate::render::{render_tree, ConceptRenderer};
use crate::tree::{ConceptField, ConceptTree};
use termadmin_models::ConceptNode;

/// Result of one structural operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    /// The complete updated tree for the owner to store.
    pub tree: ConceptTree,
    /// Path of the added, updated or removed node, valid against `tree`
    /// except after a removal.
    pub target: ConceptPath,
    /// The detached subtree, for removals.
    pub removed: Option<ConceptNode>,
}

#[derive(Debug, Clone, Default)]
pub struct ConceptTreeEditor {
    expansion: ExpansionState,
}

impl ConceptTreeEditor {
    pub fn new(tree: &ConceptTree) -> Self {
        Self {
            expansion: ExpansionState::for_tree(tree),
        }
    }

    /// Re-key after the owner replaced or reshaped the tree itself.
    pub fn sync(&mut self, tree: &ConceptTree) {
        if self.expansion.reconcile(tree) {
            tracing::debug!(nodes = tree.len(), "Concept tree keys reconciled");
        }
    }

    /// Append an empty concept as the last child of `parent`, or as the last
    /// root when `parent` is `None`.
    pub fn add_node(&mut self, tree: &ConceptTree, parent: Option<&ConceptPath>) -> Result<Edit> {
        self.sync(tree);
        let mut next = tree.clone();
        let target = next
            .push_empty(parent)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected concept insert"))?;
        self.expansion.appended(parent);

        tracing::debug!(path = %target, roots = next.roots().len(), "Concept added");
        Ok(Edit {
            tree: next,
            target,
            removed: None,
        })
    }

    /// Overwrite `field` of the concept at `path`.
    pub fn update_node(
        &mut self,
        tree: &ConceptTree,
        path: &ConceptPath,
        field: ConceptField,
        value: impl Into<String>,
    ) -> Result<Edit> {
        self.sync(tree);
        let mut next = tree.clone();
        next.set_field(path, field, value)
            .inspect_err(|e| tracing::warn!(error = %e, %field, "Rejected concept update"))?;

        tracing::debug!(%path, %field, "Concept updated");
        Ok(Edit {
            tree: next,
            target: path.clone(),
            removed: None,
        })
    }

    /// Remove the concept at `path` with its whole subtree. Later siblings
    /// move up by one index and keep their order.
    pub fn remove_node(&mut self, tree: &ConceptTree, path: &ConceptPath) -> Result<Edit> {
        self.sync(tree);
        let mut next = tree.clone();
        let removed = next
            .remove(path)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected concept removal"))?;
        self.expansion.removed(path);

        tracing::debug!(
            %path,
            dropped = removed.subtree_len(),
            roots = next.roots().len(),
            "Concept removed"
        );
        Ok(Edit {
            tree: next,
            target: path.clone(),
            removed: Some(removed),
        })
    }

    /// Show or hide one node's children. Returns the new expanded state, or
    /// `None` if `key` does not belong to the current tree or names a node
    /// without children.
    pub fn toggle_expand(&mut self, key: NodeKey) -> Option<bool> {
        self.expansion.toggle(key)
    }

    pub fn set_expanded(&mut self, key: NodeKey, expanded: bool) -> Option<bool> {
        self.expansion.set_expanded(key, expanded)
    }

    pub fn expand_all(&mut self) {
        self.expansion.expand_all();
    }

    pub fn is_expanded(&self, key: NodeKey) -> bool {
        self.expansion.is_expanded(key)
    }

    pub fn key_at(&self, path: &ConceptPath) -> Option<NodeKey> {
        self.expansion.key_at(path)
    }

    /// Current path of a node key, if the node still exists.
    pub fn path_of(&self, key: NodeKey) -> Option<ConceptPath> {
        self.expansion.path_of(key)
    }

    /// Drive `renderer` over `tree`. Neither the tree nor the editor state
    /// is modified.
    pub fn render<R: ConceptRenderer + ?Sized>(&self, tree: &ConceptTree, renderer: &mut R) {
        render_tree(tree, &self.expansion, renderer);
    }
}
