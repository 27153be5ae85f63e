//! CodeSystem form state
//!
//! Owns the resource being created or edited. The concept tree is held
//! apart from the other fields while editing and folded back into the
//! resource's `concept` element when the form is submitted.

use crate::editor::ConceptTreeEditor;
use crate::error::{Error, Result};
use crate::expansion::NodeKey;
use crate::path::ConceptPath;
use crate::render::ConceptRenderer;
use crate::store::CodeSystemStore;
use crate::tree::{ConceptField, ConceptTree};
use termadmin_models::{CodeSystem, CodeSystemContentMode, ConceptNode, PublicationStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone)]
pub struct CodeSystemForm {
    mode: FormMode,
    /// Everything except `concept`, which lives in `concepts`.
    resource: CodeSystem,
    concepts: ConceptTree,
    editor: ConceptTreeEditor,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.trim().is_empty()).then_some(value)
}

impl CodeSystemForm {
    /// Blank form for a new resource.
    pub fn create() -> Self {
        Self::from_resource(FormMode::Create, CodeSystem::draft())
    }

    /// Load an existing resource for editing.
    pub fn edit<S: CodeSystemStore + ?Sized>(id: &str, store: &S) -> Result<Self> {
        let resource = store.get(id)?;
        tracing::debug!(%id, concepts = resource.concept_count(), "Loaded CodeSystem into form");
        Ok(Self::from_resource(
            FormMode::Edit { id: id.to_string() },
            resource,
        ))
    }

    pub fn from_resource(mode: FormMode, mut resource: CodeSystem) -> Self {
        let concepts = ConceptTree::from_nodes(std::mem::take(&mut resource.concept));
        let editor = ConceptTreeEditor::new(&concepts);
        Self {
            mode,
            resource,
            concepts,
            editor,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn concepts(&self) -> &ConceptTree {
        &self.concepts
    }

    pub fn editor(&self) -> &ConceptTreeEditor {
        &self.editor
    }

    /// The resource as it would be submitted.
    pub fn to_resource(&self) -> CodeSystem {
        let mut resource = self.resource.clone();
        resource.concept = self.concepts.roots().to_vec();
        resource
    }

    pub fn url(&self) -> &str {
        &self.resource.url
    }

    /// Requested logical id for a resource that does not exist yet. Ignored
    /// in edit mode.
    pub fn set_id(&mut self, id: impl Into<String>) {
        if !self.is_edit() {
            self.resource.id = non_empty(id);
        }
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.resource.url = url.into();
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.resource.version = non_empty(version);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.resource.name = non_empty(name);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.resource.title = non_empty(title);
    }

    pub fn set_status(&mut self, status: PublicationStatus) {
        self.resource.status = status;
    }

    pub fn set_publisher(&mut self, publisher: impl Into<String>) {
        self.resource.publisher = non_empty(publisher);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.resource.description = non_empty(description);
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.resource.case_sensitive = Some(case_sensitive);
    }

    pub fn set_content(&mut self, content: CodeSystemContentMode) {
        self.resource.content = content;
    }

    /// Append an empty concept; returns its path.
    pub fn add_concept(&mut self, parent: Option<&ConceptPath>) -> Result<ConceptPath> {
        let edit = self.editor.add_node(&self.concepts, parent)?;
        self.concepts = edit.tree;
        Ok(edit.target)
    }

    pub fn update_concept(
        &mut self,
        path: &ConceptPath,
        field: ConceptField,
        value: impl Into<String>,
    ) -> Result<()> {
        let edit = self.editor.update_node(&self.concepts, path, field, value)?;
        self.concepts = edit.tree;
        Ok(())
    }

    pub fn remove_concept(&mut self, path: &ConceptPath) -> Result<ConceptNode> {
        let edit = self.editor.remove_node(&self.concepts, path)?;
        self.concepts = edit.tree;
        Ok(edit.removed.unwrap_or_default())
    }

    pub fn toggle_concept(&mut self, key: NodeKey) -> Option<bool> {
        self.editor.toggle_expand(key)
    }

    /// Only concepts with children can be collapsed.
    pub fn set_concept_expanded(&mut self, path: &ConceptPath, expanded: bool) -> Result<bool> {
        let key = self
            .editor
            .key_at(path)
            .ok_or_else(|| Error::PathNotFound { path: path.clone() })?;
        self.editor
            .set_expanded(key, expanded)
            .ok_or_else(|| Error::NoChildren { path: path.clone() })
    }

    pub fn concept_key(&self, path: &ConceptPath) -> Option<NodeKey> {
        self.editor.key_at(path)
    }

    pub fn render_concepts<R: ConceptRenderer + ?Sized>(&self, renderer: &mut R) {
        self.editor.render(&self.concepts, renderer);
    }

    /// Problems that would block `submit`.
    pub fn validation_issues(&self) -> Vec<String> {
        self.to_resource().validation_issues()
    }

    /// Validate and persist. A created resource switches the form to edit
    /// mode under its new id.
    pub fn submit<S: CodeSystemStore + ?Sized>(&mut self, store: &mut S) -> Result<CodeSystem> {
        let resource = self.to_resource();
        let issues = resource.validation_issues();
        if !issues.is_empty() {
            tracing::warn!(issues = issues.len(), "CodeSystem form rejected");
            return Err(Error::Validation(issues));
        }

        let saved = match &self.mode {
            FormMode::Create => store.create(&resource)?,
            FormMode::Edit { id } => store.update(id, &resource)?,
        };

        if let Some(id) = saved.id.clone() {
            self.mode = FormMode::Edit { id };
            self.resource.id = saved.id.clone();
        }
        Ok(saved)
    }
}
