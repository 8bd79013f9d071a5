//! eq-project: problem file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_problem_file};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown reaction: {id}")]
    UnknownReaction { id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding of a problem file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// `.json` is JSON; any other extension (or none) is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }

    pub fn parse(self, content: &str) -> ProjectResult<ProblemFile> {
        let file: ProblemFile = match self {
            FileFormat::Yaml => serde_yaml::from_str(content)?,
            FileFormat::Json => serde_json::from_str(content)?,
        };
        validate_problem_file(&file)?;
        Ok(file)
    }

    pub fn render(self, file: &ProblemFile) -> ProjectResult<String> {
        validate_problem_file(file)?;
        Ok(match self {
            FileFormat::Yaml => serde_yaml::to_string(file)?,
            FileFormat::Json => serde_json::to_string_pretty(file)?,
        })
    }
}

/// Load a problem file, picking the format from the extension.
pub fn load(path: &Path) -> ProjectResult<ProblemFile> {
    load_as(path, FileFormat::from_path(path))
}

/// Save a problem file, picking the format from the extension.
pub fn save(path: &Path, file: &ProblemFile) -> ProjectResult<()> {
    save_as(path, file, FileFormat::from_path(path))
}

pub fn load_as(path: &Path, format: FileFormat) -> ProjectResult<ProblemFile> {
    format.parse(&std::fs::read_to_string(path)?)
}

pub fn save_as(path: &Path, file: &ProblemFile, format: FileFormat) -> ProjectResult<()> {
    let content = format.render(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_yaml(path: &Path) -> ProjectResult<ProblemFile> {
    load_as(path, FileFormat::Yaml)
}

pub fn save_yaml(path: &Path, file: &ProblemFile) -> ProjectResult<()> {
    save_as(path, file, FileFormat::Yaml)
}

pub fn load_json(path: &Path) -> ProjectResult<ProblemFile> {
    load_as(path, FileFormat::Json)
}

pub fn save_json(path: &Path, file: &ProblemFile) -> ProjectResult<()> {
    save_as(path, file, FileFormat::Json)
}
