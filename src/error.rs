//! Error types for the download, export and generation pipelines.
//!
//! Every fallible operation in this crate returns [`Error`]. Per-icon
//! failures during a batch are wrapped in [`Error::Export`] so the failing
//! identifier is always part of the message, and they abort the remaining
//! batch rather than being skipped. Files written before the failure are
//! left in place.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An icon identifier that is not of the form `prefix:name`.
    #[error("invalid icon identifier {0:?}: expected \"prefix:name\"")]
    InvalidIdentifier(String),

    /// The HTTP request for one icon failed or returned a non-2xx status.
    #[error("failed to fetch {icon}: {source}")]
    Fetch {
        icon: String,
        #[source]
        source: reqwest::Error,
    },

    /// A metadata request (search, collection listing) failed.
    #[error("request to {endpoint} failed: {source}")]
    Api {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body had no parseable `<svg>` root element.
    #[error("failed to parse {icon}: no <svg> root element in response")]
    MalformedSvg { icon: String },

    /// A per-icon failure inside an export batch, naming the icon.
    #[error("failed to export {icon}: {source}")]
    Export {
        icon: String,
        #[source]
        source: Box<Error>,
    },

    /// Reading an input file or writing the archive stream failed.
    #[error("failed to build archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Provider generation was pointed at a directory that does not exist.
    #[error("directory {} doesn't exist", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Provider generation found no `*.json` collection files to register.
    #[error("{} has no json files", .0.display())]
    NoCollections(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps a batch-item failure with the identifier it belongs to.
    pub(crate) fn for_icon(icon: impl Into<String>, source: Error) -> Self {
        Error::Export {
            icon: icon.into(),
            source: Box::new(source),
        }
    }
}
