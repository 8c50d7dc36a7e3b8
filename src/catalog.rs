use crate::error::ToolError;
use crate::models::{ToolDefinition, ToolSpec};
use crate::settings::FileSettings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// One `[tools.<name>]` entry; a malformed entry keeps its validation error
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub definition: Result<ToolDefinition, ToolError>,
}

/// Tool definitions in file order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

/// Parsed catalog file
#[derive(Debug, Clone, Default)]
pub struct CatalogFile {
    pub settings: FileSettings,
    pub catalog: Catalog,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up a tool that is both present and valid
    pub fn definition(&self, name: &str) -> Result<&ToolDefinition, ToolError> {
        match self.get(name) {
            Some(entry) => entry.definition.as_ref().map_err(Clone::clone),
            None => Err(ToolError::InvalidConfiguration(format!(
                "{name}: not defined in catalog"
            ))),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Valid definitions only, in file order
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.entries.iter().filter_map(|e| e.definition.as_ref().ok())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read and parse a catalog file
pub fn load(path: &Path) -> Result<CatalogFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse catalog file: {}", path.display()))
}

/// Parse catalog TOML.
///
/// Syntax errors, unknown top-level keys and a malformed `[settings]` table
/// are fatal. Problems inside a single `[tools.<name>]` table are kept on
/// that entry so the remaining tools stay usable.
pub fn parse(content: &str) -> Result<CatalogFile> {
    let mut document: toml::Table = toml::from_str(content).context("Invalid TOML")?;

    let settings = match document.remove("settings") {
        Some(value) => value
            .try_into::<FileSettings>()
            .context("Invalid [settings] table")?,
        None => FileSettings::default(),
    };

    let tools = match document.remove("tools") {
        Some(toml::Value::Table(tools)) => tools,
        Some(_) => return Err(anyhow::anyhow!("'tools' must be a table of tool definitions")),
        None => toml::Table::new(),
    };

    if let Some(key) = document.keys().next() {
        return Err(anyhow::anyhow!("Unknown top-level key: {key}"));
    }

    let entries = tools
        .into_iter()
        .map(|(name, value)| {
            let definition = value
                .try_into::<ToolSpec>()
                .map_err(|e| ToolError::InvalidConfiguration(format!("{name}: {}", e.message())))
                .and_then(|spec| ToolDefinition::from_spec(&name, spec));
            CatalogEntry { name, definition }
        })
        .collect();

    Ok(CatalogFile {
        settings,
        catalog: Catalog::new(entries),
    })
}
