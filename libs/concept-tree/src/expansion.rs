//! Presentation-only expand/collapse state
//!
//! Kept apart from [`ConceptTree`] so the persisted tree never carries UI
//! state. A mirror of the tree's shape holds one generated [`NodeKey`] per
//! node; the editor keeps the mirror in step with every structural edit so a
//! node keeps its key when earlier siblings are removed.

use crate::path::ConceptPath;
use crate::tree::ConceptTree;
use std::collections::HashSet;
use std::fmt;
use termadmin_models::ConceptNode;

/// Stable identifier of a rendered node for the lifetime of one editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl NodeKey {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct KeyNode {
    key: NodeKey,
    children: Vec<KeyNode>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    roots: Vec<KeyNode>,
    collapsed: HashSet<NodeKey>,
    next_key: u64,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign keys for every node of `tree`, all expanded.
    pub fn for_tree(tree: &ConceptTree) -> Self {
        let mut state = Self::new();
        state.reconcile(tree);
        state
    }

    fn alloc(&mut self) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        key
    }

    fn fresh(&mut self, node: &ConceptNode) -> KeyNode {
        KeyNode {
            key: self.alloc(),
            children: node.children.iter().map(|c| self.fresh(c)).collect(),
        }
    }

    /// Bring the key mirror in line with `tree`.
    ///
    /// Keys survive wherever a node still exists at the same path; new nodes
    /// get fresh keys; keys with no node left are forgotten along with their
    /// collapsed flag. Returns `true` when anything changed.
    pub fn reconcile(&mut self, tree: &ConceptTree) -> bool {
        let mut roots = std::mem::take(&mut self.roots);
        let changed = self.reconcile_level(&mut roots, tree.roots());
        self.roots = roots;
        changed
    }

    fn reconcile_level(&mut self, keys: &mut Vec<KeyNode>, nodes: &[ConceptNode]) -> bool {
        let mut changed = false;
        if keys.len() > nodes.len() {
            for dropped in keys.drain(nodes.len()..) {
                forget(&mut self.collapsed, &dropped);
            }
            changed = true;
        }
        for (idx, node) in nodes.iter().enumerate() {
            if idx < keys.len() {
                changed |= self.reconcile_level(&mut keys[idx].children, &node.children);
                if node.children.is_empty() {
                    self.collapsed.remove(&keys[idx].key);
                }
            } else {
                let fresh = self.fresh(node);
                keys.push(fresh);
                changed = true;
            }
        }
        changed
    }

    fn level_mut(&mut self, parent: Option<&ConceptPath>) -> Option<&mut Vec<KeyNode>> {
        let Some(parent) = parent else {
            return Some(&mut self.roots);
        };
        let (first, rest) = parent.indices().split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for idx in rest {
            node = node.children.get_mut(*idx)?;
        }
        Some(&mut node.children)
    }

    fn key_node(&self, path: &ConceptPath) -> Option<&KeyNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.roots.get(*first)?;
        for idx in rest {
            node = node.children.get(*idx)?;
        }
        Some(node)
    }

    /// Record a node appended under `parent` (or at the root).
    pub(crate) fn appended(&mut self, parent: Option<&ConceptPath>) -> Option<NodeKey> {
        let key = self.alloc();
        let level = self.level_mut(parent)?;
        level.push(KeyNode {
            key,
            children: Vec::new(),
        });
        Some(key)
    }

    /// Record the removal of the node at `path` and its subtree.
    pub(crate) fn removed(&mut self, path: &ConceptPath) {
        let Some((parent, index)) = path.split_last() else {
            return;
        };
        let parent = (!parent.is_empty()).then(|| ConceptPath::from(parent));
        let Some(level) = self.level_mut(parent.as_ref()) else {
            return;
        };
        if index >= level.len() {
            return;
        }
        let dropped = level.remove(index);
        let now_leaf = level.is_empty();
        forget(&mut self.collapsed, &dropped);
        if now_leaf {
            if let Some(key) = parent.as_ref().and_then(|p| self.key_at(p)) {
                self.collapsed.remove(&key);
            }
        }
    }

    pub fn key_at(&self, path: &ConceptPath) -> Option<NodeKey> {
        self.key_node(path).map(|n| n.key)
    }

    /// Current path of `key`, derived from the mirror.
    pub fn path_of(&self, key: NodeKey) -> Option<ConceptPath> {
        fn search(nodes: &[KeyNode], key: NodeKey, prefix: &mut Vec<usize>) -> bool {
            for (idx, node) in nodes.iter().enumerate() {
                prefix.push(idx);
                if node.key == key || search(&node.children, key, prefix) {
                    return true;
                }
                prefix.pop();
            }
            false
        }
        let mut prefix = Vec::new();
        search(&self.roots, key, &mut prefix).then(|| ConceptPath::new(prefix))
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.node_of(key).is_some()
    }

    fn node_of(&self, key: NodeKey) -> Option<&KeyNode> {
        fn search(nodes: &[KeyNode], key: NodeKey) -> Option<&KeyNode> {
            nodes
                .iter()
                .find_map(|n| (n.key == key).then_some(n).or_else(|| search(&n.children, key)))
        }
        search(&self.roots, key)
    }

    /// Whether `key` names a node that currently has children.
    pub fn is_expandable(&self, key: NodeKey) -> bool {
        self.node_of(key).is_some_and(|n| !n.children.is_empty())
    }

    /// Expanded unless explicitly collapsed.
    pub fn is_expanded(&self, key: NodeKey) -> bool {
        !self.collapsed.contains(&key)
    }

    /// Flip one node. `None` if the key is not part of the current tree or
    /// its node has no children; leaves carry no collapsed flag.
    pub fn toggle(&mut self, key: NodeKey) -> Option<bool> {
        if !self.is_expandable(key) {
            return None;
        }
        let expanded = if self.collapsed.remove(&key) {
            true
        } else {
            self.collapsed.insert(key);
            false
        };
        Some(expanded)
    }

    /// Same contract as [`toggle`](Self::toggle).
    pub fn set_expanded(&mut self, key: NodeKey, expanded: bool) -> Option<bool> {
        if !self.is_expandable(key) {
            return None;
        }
        if expanded {
            self.collapsed.remove(&key);
        } else {
            self.collapsed.insert(key);
        }
        Some(expanded)
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    pub fn collapsed_len(&self) -> usize {
        self.collapsed.len()
    }
}

fn forget(collapsed: &mut HashSet<NodeKey>, node: &KeyNode) {
    collapsed.remove(&node.key);
    for child in &node.children {
        forget(collapsed, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(roots: Vec<ConceptNode>) -> ConceptTree {
        ConceptTree::from_nodes(roots)
    }

    #[test]
    fn keys_are_unique_per_node() {
        let t = tree(vec![
            ConceptNode::new("A").with_children(vec![ConceptNode::new("A1")]),
            ConceptNode::new("B"),
        ]);
        let state = ExpansionState::for_tree(&t);
        let keys: HashSet<_> = t.paths().iter().filter_map(|p| state.key_at(p)).collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn reconcile_keeps_keys_at_surviving_paths() {
        let before = tree(vec![
            ConceptNode::new("A"),
            ConceptNode::new("B").with_children(vec![ConceptNode::new("B1")]),
        ]);
        let mut state = ExpansionState::for_tree(&before);
        let a = state.key_at(&[0].into()).unwrap();
        let b = state.key_at(&[1].into()).unwrap();
        assert_eq!(state.toggle(b), Some(false));

        let after = tree(vec![ConceptNode::new("A").with_children(vec![ConceptNode::new("A1")])]);
        assert!(state.reconcile(&after));

        assert_eq!(state.key_at(&[0].into()), Some(a));
        assert!(state.key_at(&[0, 0].into()).is_some());
        assert!(state.key_at(&[1].into()).is_none());
        assert!(!state.contains(b));
        assert_eq!(state.collapsed_len(), 0);
        assert!(!state.reconcile(&after));
    }

    #[test]
    fn toggle_unknown_key_is_rejected() {
        let mut state = ExpansionState::for_tree(&tree(vec![ConceptNode::new("A")]));
        assert_eq!(state.toggle(NodeKey(99)), None);
    }

    #[test]
    fn leaves_cannot_be_collapsed() {
        let mut state = ExpansionState::for_tree(&tree(vec![ConceptNode::new("A")]));
        let a = state.key_at(&[0].into()).unwrap();
        assert!(!state.is_expandable(a));
        assert_eq!(state.toggle(a), None);
        assert_eq!(state.set_expanded(a, false), None);
        assert_eq!(state.collapsed_len(), 0);

        state.appended(Some(&[0].into()));
        assert!(state.is_expandable(a));
        assert!(state.is_expanded(a));
    }

    #[test]
    fn losing_last_child_clears_collapsed_flag() {
        let t = tree(vec![ConceptNode::new("A").with_children(vec![ConceptNode::new("A1")])]);
        let mut state = ExpansionState::for_tree(&t);
        let a = state.key_at(&[0].into()).unwrap();
        state.set_expanded(a, false);

        state.removed(&[0, 0].into());
        assert!(state.is_expanded(a));

        state.appended(Some(&[0].into()));
        assert!(state.is_expanded(a));
    }

    #[test]
    fn reconcile_clears_flag_of_emptied_node() {
        let t = tree(vec![ConceptNode::new("A").with_children(vec![ConceptNode::new("A1")])]);
        let mut state = ExpansionState::for_tree(&t);
        let a = state.key_at(&[0].into()).unwrap();
        state.toggle(a);

        state.reconcile(&tree(vec![ConceptNode::new("A")]));
        assert_eq!(state.key_at(&[0].into()), Some(a));
        assert!(state.is_expanded(a));
    }

    #[test]
    fn removal_forgets_collapsed_descendants() {
        let t = tree(vec![
            ConceptNode::new("A").with_children(vec![
                ConceptNode::new("A1").with_children(vec![ConceptNode::new("A1a")]),
            ]),
            ConceptNode::new("B"),
        ]);
        let mut state = ExpansionState::for_tree(&t);
        let a1 = state.key_at(&[0, 0].into()).unwrap();
        let b = state.key_at(&[1].into()).unwrap();
        assert_eq!(state.set_expanded(a1, false), Some(false));
        assert_eq!(state.collapsed_len(), 1);

        state.removed(&[0].into());

        assert_eq!(state.collapsed_len(), 0);
        assert_eq!(state.key_at(&[0].into()), Some(b));
        assert_eq!(state.path_of(b), Some(ConceptPath::from([0])));
    }
}
