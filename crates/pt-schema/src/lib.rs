//! pt-schema: architecture document format, loading and saving.
//!
//! The loader is a pure parse: it produces the raw component, connection,
//! bus-membership and control-parameter records of one document and checks
//! their shape. It never resolves references between records.

pub mod migrate;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::validate_document;

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Malformed document structure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Parse error at {location}: {reason}")]
pub struct ParseError {
    /// `line:column` for syntax errors, a record path such as `components[2].id` otherwise.
    pub location: String,
    pub reason: String,
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err
            .location()
            .map(|l| format!("{}:{}", l.line(), l.column()))
            .unwrap_or_else(|| "document".to_string());
        ParseError {
            location,
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError {
            location: format!("{}:{}", err.line(), err.column()),
            reason: err.to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Text encodings a document may be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Yaml,
    Json,
}

impl DocFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocFormat::Json,
            _ => DocFormat::Yaml,
        }
    }
}

/// Parse, migrate and check a document held in memory.
pub fn parse_str(content: &str, format: DocFormat) -> Result<ArchitectureDoc, ParseError> {
    let doc: ArchitectureDoc = match format {
        DocFormat::Yaml => serde_yaml::from_str(content)?,
        DocFormat::Json => serde_json::from_str(content)?,
    };
    let doc = migrate_to_latest(doc)?;
    validate_document(&doc)?;
    tracing::debug!(
        name = %doc.name,
        components = doc.components.len(),
        connections = doc.connections.len(),
        buses = doc.buses.len(),
        "parsed architecture document"
    );
    Ok(doc)
}

pub fn to_string(doc: &ArchitectureDoc, format: DocFormat) -> SchemaResult<String> {
    Ok(match format {
        DocFormat::Yaml => serde_yaml::to_string(doc)?,
        DocFormat::Json => serde_json::to_string_pretty(doc)?,
    })
}

/// Load a document, picking the format from the file extension.
pub fn load(path: &Path) -> SchemaResult<ArchitectureDoc> {
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_str(&content, DocFormat::from_path(path))?)
}

/// Save a document, picking the format from the file extension.
pub fn save(path: &Path, doc: &ArchitectureDoc) -> SchemaResult<()> {
    validate_document(doc)?;
    let content = to_string(doc, DocFormat::from_path(path))?;
    std::fs::write(path, content).map_err(|source| SchemaError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn load_yaml(content: &str) -> Result<ArchitectureDoc, ParseError> {
    parse_str(content, DocFormat::Yaml)
}

pub fn load_json(content: &str) -> Result<ArchitectureDoc, ParseError> {
    parse_str(content, DocFormat::Json)
}
