//! Recursive rendering contract
//!
//! A [`ConceptRenderer`] is driven depth first over a tree. Each node is
//! presented with its freshly derived path, its key, its level and its
//! expand state; children are only visited when the node is expanded.

use crate::expansion::{ExpansionState, NodeKey};
use crate::path::ConceptPath;
use crate::tree::ConceptTree;
use termadmin_models::ConceptNode;

/// One node as seen by a renderer.
///
/// `path` is valid for the snapshot being rendered only; actions such as
/// "add child" or "remove" should hand it straight back to the editor.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    pub node: &'a ConceptNode,
    pub path: &'a ConceptPath,
    /// `None` when the tree was changed behind the editor's back and has not
    /// been synced yet.
    pub key: Option<NodeKey>,
    pub level: usize,
    pub expanded: bool,
    /// The expand control is only live when there are children to show.
    pub expandable: bool,
}

pub trait ConceptRenderer {
    fn node(&mut self, view: &NodeView<'_>);

    fn enter_children(&mut self, _parent: &NodeView<'_>) {}

    fn leave_children(&mut self, _parent: &NodeView<'_>) {}

    /// Called once instead of any `node` call when the tree has no roots.
    fn empty(&mut self) {}
}

pub(crate) fn render_tree<R: ConceptRenderer + ?Sized>(
    tree: &ConceptTree,
    expansion: &ExpansionState,
    renderer: &mut R,
) {
    if tree.is_empty() {
        renderer.empty();
        return;
    }
    render_level(
        tree.roots(),
        &ConceptPath::default(),
        0,
        expansion,
        renderer,
    );
}

fn render_level<R: ConceptRenderer + ?Sized>(
    nodes: &[ConceptNode],
    prefix: &ConceptPath,
    level: usize,
    expansion: &ExpansionState,
    renderer: &mut R,
) {
    for (idx, node) in nodes.iter().enumerate() {
        let path = prefix.child(idx);
        let key = expansion.key_at(&path);
        let view = NodeView {
            node,
            path: &path,
            key,
            level,
            expanded: key.map_or(true, |k| expansion.is_expanded(k)),
            expandable: !node.children.is_empty(),
        };
        renderer.node(&view);

        if view.expanded && view.expandable {
            renderer.enter_children(&view);
            render_level(&node.children, &path, level + 1, expansion, renderer);
            renderer.leave_children(&view);
        }
    }
}

/// Flat record of one visible node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub path: ConceptPath,
    pub key: Option<NodeKey>,
    pub level: usize,
    pub code: String,
    pub expanded: bool,
    pub expandable: bool,
}

/// Collects the visible rows in display order.
#[derive(Debug, Default)]
pub struct RowCollector {
    pub rows: Vec<VisibleRow>,
}

impl ConceptRenderer for RowCollector {
    fn node(&mut self, view: &NodeView<'_>) {
        self.rows.push(VisibleRow {
            path: view.path.clone(),
            key: view.key,
            level: view.level,
            code: view.node.code.clone(),
            expanded: view.expanded,
            expandable: view.expandable,
        });
    }
}

/// Plain-text outline, one line per visible node.
///
/// ```text
/// [-] 0 head | Head
///   [ ] 0.0 eye | Eye | Organ of sight.
/// [+] 1 trunk | Trunk (2 hidden)
/// ```
#[derive(Debug)]
pub struct TextRenderer {
    indent: usize,
    out: String,
}

impl TextRenderer {
    pub fn new(indent: usize) -> Self {
        Self {
            indent,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl ConceptRenderer for TextRenderer {
    fn node(&mut self, view: &NodeView<'_>) {
        let marker = match (view.expandable, view.expanded) {
            (false, _) => "[ ]",
            (true, true) => "[-]",
            (true, false) => "[+]",
        };
        let code = if view.node.code.is_empty() {
            "<no code>"
        } else {
            view.node.code.as_str()
        };
        let pad = view.level * self.indent;
        self.out.push_str(&format!("{:pad$}{marker} {} {code}", "", view.path));
        for text in [&view.node.display, &view.node.definition] {
            if !text.is_empty() {
                self.out.push_str(&format!(" | {text}"));
            }
        }
        if view.expandable && !view.expanded {
            let hidden = view.node.subtree_len() - 1;
            self.out.push_str(&format!(" ({hidden} hidden)"));
        }
        self.out.push('\n');
    }

    fn empty(&mut self) {
        self.out.push_str("(no concepts)\n");
    }
}
