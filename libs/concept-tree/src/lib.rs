//! Hierarchical concept editing for FHIR CodeSystems
//!
//! Path-addressed create/update/delete over an ordered, arbitrarily deep
//! tree of concepts, with a recursive rendering contract and per-node
//! expand/collapse state kept out of the persisted data.
//!
//! # Example
//!
//! ```rust
//! use termadmin_concept_tree::{ConceptField, ConceptTree, ConceptTreeEditor, TextRenderer};
//!
//! let mut tree = ConceptTree::new();
//! let mut editor = ConceptTreeEditor::new(&tree);
//!
//! let edit = editor.add_node(&tree, None).unwrap();
//! tree = edit.tree;
//! tree = editor.update_node(&tree, &edit.target, ConceptField::Code, "head").unwrap().tree;
//!
//! let child = editor.add_node(&tree, Some(&edit.target)).unwrap();
//! tree = child.tree;
//! tree = editor.update_node(&tree, &child.target, ConceptField::Code, "eye").unwrap().tree;
//!
//! let mut text = TextRenderer::default();
//! editor.render(&tree, &mut text);
//! assert_eq!(text.finish(), "[-] 0 head\n  [ ] 0.0 eye\n");
//! ```

pub mod editor;
pub mod error;
pub mod expansion;
pub mod form;
pub mod path;
pub mod render;
pub mod store;
pub mod tree;

pub use editor::{ConceptTreeEditor, Edit};
pub use error::{Error, Result};
pub use expansion::{ExpansionState, NodeKey};
pub use form::{CodeSystemForm, FormMode};
pub use path::ConceptPath;
pub use render::{ConceptRenderer, NodeView, RowCollector, TextRenderer, VisibleRow};
pub use store::{CodeSystemStore, JsonFileStore, MemoryStore};
pub use tree::{ConceptField, ConceptTree};

pub use termadmin_models::ConceptNode;
