//! Subcommands
//!
//! Each command loads the CodeSystem into a form, drives the concept editor
//! and submits the form back to the store when it changed something.

use anyhow::Context;
use clap::Subcommand;
use std::io::Write;
use termadmin_concept_tree::{
    CodeSystemForm, CodeSystemStore, ConceptField, ConceptPath, TextRenderer,
};
use termadmin_models::{CodeSystemContentMode, PublicationStatus};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a CodeSystem and print its id
    New {
        /// Canonical URL
        #[arg(long)]
        url: String,
        /// Computer-friendly name
        #[arg(long)]
        name: String,
        /// Logical id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        version: Option<String>,
        #[arg(long)]
        publisher: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// draft | active | retired | unknown
        #[arg(long, default_value = "draft")]
        status: PublicationStatus,
        /// not-present | example | fragment | complete | supplement
        #[arg(long, default_value = "complete")]
        content: CodeSystemContentMode,
        /// Codes compare case-insensitively
        #[arg(long)]
        case_insensitive: bool,
    },
    /// Print the concept tree
    Show {
        id: String,
        /// Collapse the concept at this path (repeatable)
        #[arg(long = "collapse", value_name = "PATH")]
        collapse: Vec<ConceptPath>,
    },
    /// Append a concept at the root or under a parent
    Add {
        id: String,
        /// Parent concept path, e.g. 0.2
        #[arg(long, value_name = "PATH")]
        parent: Option<ConceptPath>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        display: Option<String>,
        #[arg(long)]
        definition: Option<String>,
    },
    /// Overwrite one field (code | display | definition) of a concept
    Set {
        id: String,
        path: ConceptPath,
        field: ConceptField,
        value: String,
    },
    /// Delete a concept and everything below it
    Remove { id: String, path: ConceptPath },
    /// Print the CodeSystem as JSON
    Export { id: String },
}

pub fn run<S, W>(command: Command, store: &mut S, indent: usize, out: &mut W) -> anyhow::Result<()>
where
    S: CodeSystemStore,
    W: Write,
{
    match command {
        Command::New {
            url,
            name,
            id,
            title,
            version,
            publisher,
            description,
            status,
            content,
            case_insensitive,
        } => {
            let mut form = CodeSystemForm::create();
            form.set_url(url);
            form.set_name(name);
            form.set_status(status);
            form.set_content(content);
            form.set_case_sensitive(!case_insensitive);
            if let Some(title) = title {
                form.set_title(title);
            }
            if let Some(version) = version {
                form.set_version(version);
            }
            if let Some(publisher) = publisher {
                form.set_publisher(publisher);
            }
            if let Some(description) = description {
                form.set_description(description);
            }
            if let Some(id) = id {
                form.set_id(id);
            }
            let saved = form
                .submit(store)
                .context("Failed to create CodeSystem")?;
            writeln!(out, "{}", saved.id.unwrap_or_default())?;
        }
        Command::Show { id, collapse } => {
            let mut form = load(&id, store)?;
            for path in &collapse {
                form.set_concept_expanded(path, false)
                    .with_context(|| format!("Cannot collapse {path}"))?;
            }
            let mut text = TextRenderer::new(indent);
            form.render_concepts(&mut text);
            let resource = form.to_resource();
            writeln!(
                out,
                "{} ({}) {} concepts",
                resource.url,
                resource.status,
                resource.concept_count()
            )?;
            out.write_all(text.finish().as_bytes())?;
        }
        Command::Add {
            id,
            parent,
            code,
            display,
            definition,
        } => {
            let mut form = load(&id, store)?;
            let path = form.add_concept(parent.as_ref())?;
            for (field, value) in [
                (ConceptField::Code, code),
                (ConceptField::Display, display),
                (ConceptField::Definition, definition),
            ] {
                if let Some(value) = value {
                    form.update_concept(&path, field, value)?;
                }
            }
            save(&mut form, store)?;
            writeln!(out, "{path}")?;
        }
        Command::Set {
            id,
            path,
            field,
            value,
        } => {
            let mut form = load(&id, store)?;
            form.update_concept(&path, field, value)?;
            save(&mut form, store)?;
        }
        Command::Remove { id, path } => {
            let mut form = load(&id, store)?;
            let removed = form.remove_concept(&path)?;
            save(&mut form, store)?;
            writeln!(
                out,
                "removed {} ({} concepts)",
                removed.code,
                removed.subtree_len()
            )?;
        }
        Command::Export { id } => {
            let resource = store
                .get(&id)
                .with_context(|| format!("Failed to load CodeSystem/{id}"))?;
            serde_json::to_writer_pretty(&mut *out, &resource)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn load<S: CodeSystemStore>(id: &str, store: &S) -> anyhow::Result<CodeSystemForm> {
    CodeSystemForm::edit(id, store).with_context(|| format!("Failed to load CodeSystem/{id}"))
}

fn save<S: CodeSystemStore>(form: &mut CodeSystemForm, store: &mut S) -> anyhow::Result<()> {
    form.submit(store).context("Failed to save CodeSystem")?;
    Ok(())
}
