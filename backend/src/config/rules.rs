//! Rule declaration file loading.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use header_rules::{DeclarationError, HeaderValidationProperties};
use thiserror::Error;

/// Errors returned while loading rule declarations from disk.
#[derive(Debug, Error)]
pub enum RulesLoadError {
    /// The file could not be read.
    #[error("failed to read header rules at {path}: {source}")]
    Read {
        /// Path to the rules file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file contents are not valid rule declarations.
    #[error("invalid header rules at {path}: {source}")]
    Declaration {
        /// Path to the rules file.
        path: PathBuf,
        /// Underlying declaration error.
        #[source]
        source: DeclarationError,
    },
}

/// Read and parse the rule declarations stored at `path`.
///
/// # Errors
/// Returns [`RulesLoadError::Read`] when the file cannot be opened or is not
/// UTF-8, and [`RulesLoadError::Declaration`] when it is not a valid
/// declaration document.
pub fn load_declarations(path: &Path) -> Result<HeaderValidationProperties, RulesLoadError> {
    let read_error = |source: std::io::Error| RulesLoadError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "rules path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir
        .read_to_string(Path::new(file_name))
        .map_err(read_error)?;
    HeaderValidationProperties::from_json(&contents).map_err(|source| {
        RulesLoadError::Declaration {
            path: path.to_path_buf(),
            source,
        }
    })
}
