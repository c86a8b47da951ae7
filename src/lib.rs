//! iconify-downloader: export icons from the Iconify API.
//!
//! This crate searches and downloads icons from the public Iconify catalog
//! and exports them to disk as individual SVG files, zipped archives, or
//! Iconify-compatible JSON collections, optionally generating a provider
//! source file that registers those collections with `@iconify/react`.
//!
//! Icons are addressed by `prefix:name` identifiers and processed strictly
//! in input order; the first per-icon failure aborts the batch with the
//! failing identifier in the error.
//!
//! # Example
//!
//! ```no_run
//! use iconify_downloader::{Exporter, ExportOptions, IconId, IconifyClient};
//! use std::path::Path;
//!
//! let exporter = Exporter::new(IconifyClient::new());
//! let icons = [IconId::parse("mdi:home")?, IconId::parse("mdi:account")?];
//!
//! let options = ExportOptions {
//!     zip_enabled: true,
//!     zip_name: Some("my-icons".into()),
//!     ..Default::default()
//! };
//! let written = exporter.export_svgs(&icons, Path::new("./out"), &options, |event| {
//!     eprintln!("{event:?}");
//! })?;
//! // Two SVG files plus the archive, in order.
//! assert_eq!(written.len(), 3);
//! # Ok::<(), iconify_downloader::Error>(())
//! ```

mod api;
mod archive;
mod cache;
mod error;
mod export;
mod icon;
mod provider;
mod svg;

pub use api::{
    API_BASE, CollectionAuthor, CollectionInfo, CollectionSummary, IconSource, IconifyClient,
    SearchResults,
};
pub use archive::write_archive;
pub use cache::PreviewCache;
pub use error::Error;
pub use export::{ExportFormat, ExportOptions, Exporter, ProgressEvent};
pub use icon::{CollectionDocument, IconId, IconRecord, ParsedIcon};
pub use provider::generate_provider;
pub use svg::{apply_color, parse_icon};
