//! YAML error types with source-span diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors from reading or parsing a YAML document
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(YamlSyntaxError),

    #[error("IO error: {0}")]
    #[diagnostic(code(prr::yaml::io))]
    Io(#[from] std::io::Error),
}

/// A syntax or shape error pointing into the offending file
#[derive(Debug, Error, Diagnostic)]
#[error("Failed to parse {filename}: {message}")]
#[diagnostic(
    code(prr::yaml::syntax),
    help("Check indentation, quoting and field names near the highlighted position")
)]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error and the text it came from
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let span = err.location().map(|loc| {
            let offset = loc.index().min(content.len());
            let len = if offset < content.len() { 1 } else { 0 };
            SourceSpan::from((offset, len))
        });

        Self {
            filename: filename.to_string(),
            message: err.to_string(),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }

    /// Byte offset of the error, if serde_yml reported one
    pub fn offset(&self) -> Option<usize> {
        self.span.map(|s| s.offset())
    }
}
