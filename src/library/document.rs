//! Reading and writing Kometa YAML documents.

use crate::constants::YAML_EXTENSIONS;
use crate::models::MetadataDocument;
use crate::parser::get_regex;
use regex::Regex;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("{0} is not a YAML file (expected .yml or .yaml)")]
    NotYaml(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Checks that `path` exists and has a YAML extension.
pub fn ensure_yaml_file(path: &Path) -> Result<(), DocumentError> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| YAML_EXTENSIONS.contains(&e.to_lowercase().as_str()));

    if !is_yaml {
        return Err(DocumentError::NotYaml(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Loads a `metadata:` document from a `.yml`/`.yaml` file.
pub fn load_metadata_document(path: &Path) -> Result<MetadataDocument, DocumentError> {
    ensure_yaml_file(path)?;
    read_yaml(path)
}

/// Reads and deserializes any YAML file.
pub fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    // An empty file is an empty document.
    let content = if content.trim().is_empty() {
        "{}"
    } else {
        content.as_str()
    };

    serde_yaml::from_str(content).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes `value` to YAML, prefixed with `header` when given.
///
/// Strings such as `no` or `on` are quoted so YAML 1.1 readers (Kometa
/// included) keep them as strings.
pub fn to_yaml_string<T: Serialize>(value: &T, header: Option<&str>) -> Result<String, DocumentError> {
    let body = quote_yaml11_booleans(&serde_yaml::to_string(value)?);
    Ok(match header {
        Some(header) => format!("{header}{body}"),
        None => body,
    })
}

fn quote_yaml11_booleans(body: &str) -> String {
    static BLOCK_START: OnceLock<Regex> = OnceLock::new();
    static BOOL_VALUE: OnceLock<Regex> = OnceLock::new();
    let block_start = get_regex(&BLOCK_START, r"(?:^\s*|: |- )[|>][0-9]?[-+]?[0-9]?$");
    let bool_value = get_regex(
        &BOOL_VALUE,
        r##"^(\s*(?:- )*(?:[^\s'"#-][^:]*: )?)((?i:y|n|yes|no|on|off))$"##,
    );

    let mut out = String::with_capacity(body.len());
    // Indent of the line that opened the current literal/folded block.
    let mut block_indent: Option<usize> = None;

    for line in body.split_inclusive('\n') {
        let text = line.trim_end_matches('\n');
        let indent = text.len() - text.trim_start().len();

        if let Some(parent) = block_indent {
            if text.trim().is_empty() || indent > parent {
                out.push_str(line);
                continue;
            }
            block_indent = None;
        }

        if block_start.is_match(text) {
            block_indent = Some(indent);
            out.push_str(line);
            continue;
        }

        match bool_value.captures(text) {
            Some(caps) => {
                out.push_str(&caps[1]);
                out.push('\'');
                out.push_str(&caps[2]);
                out.push('\'');
                if line.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => out.push_str(line),
        }
    }

    out
}

/// Replaces `path` with `content` in one step.
///
/// The content goes to a temporary file in the destination directory which is
/// then renamed over `path`, so readers see either the old or the new file.
/// An existing file keeps its permissions.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), DocumentError> {
    let write_err = |source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(write_err)?;

    let existing = std::fs::metadata(path).ok().map(|m| m.permissions());

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    // New files get the usual 0644 (minus umask) instead of tempfile's 0600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }

    let mut tmp = builder.tempfile_in(&parent).map_err(write_err)?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions).map_err(write_err)?;
    }
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Writes a metadata document back to disk.
pub fn save_metadata_document(path: &Path, doc: &MetadataDocument) -> Result<(), DocumentError> {
    let content = to_yaml_string(doc, None)?;
    write_atomic(path, &content)
}
