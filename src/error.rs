use std::path::PathBuf;

use crate::render::RenderFault;

/// Errors that can occur while loading a conformance corpus.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CorpusLoadError {
    #[error("cannot read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Malformed JSON, or a record missing a required field.
    #[error("invalid corpus {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("corpus {path} contains example {example} more than once")]
    DuplicateExample { path: PathBuf, example: u32 },
}

/// An extension name with no known mapping to a renderer syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported extension: {0:?}")]
pub struct UnsupportedExtensionError(pub String);

/// Errors surfaced by [`compare`](crate::compare).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HarnessError {
    #[error(transparent)]
    Corpus(#[from] CorpusLoadError),
    #[error(transparent)]
    Extension(#[from] UnsupportedExtensionError),
    /// Only produced when the caller asked for render faults to propagate.
    #[error("render fault: {0}")]
    Render(#[from] RenderFault),
}
