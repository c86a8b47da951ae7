//! The export pipeline: fetch, transform, write, optionally archive.
//!
//! Icons are processed strictly in input order, one at a time. A per-icon
//! failure aborts the remaining batch with the identifier in the error;
//! files written for earlier icons stay on disk. See [`Exporter`] for the
//! two modes.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::IconSource;
use crate::archive::write_archive;
use crate::error::Error;
use crate::icon::{CollectionDocument, IconId};
use crate::svg;

// ============================================================================
// Options and progress
// ============================================================================

/// Output format of an export batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One `.svg` file per icon.
    Svg,
    /// One Iconify-compatible `.json` collection per prefix.
    Json,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "svg" => Ok(ExportFormat::Svg),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("invalid format {other:?}: use \"svg\" or \"json\"")),
        }
    }
}

/// Customization of an export batch.
///
/// The field names mirror the JSON option bag interactive hosts send, so
/// the struct deserializes straight from it. Defaults: no subfolder, flat
/// layout, no recoloring, no archive.
///
/// `apply_color`, `color`, `force_monochrome` and `organize_by_prefix` only
/// affect SVG exports; the JSON pipeline accepts and ignores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Relative folder under the output directory to nest results in.
    /// Sanitized once at the pipeline boundary.
    pub subfolder: Option<String>,
    /// Group SVG files into one subdirectory per prefix.
    pub organize_by_prefix: bool,
    /// Master switch for recoloring; `color` is ignored without it.
    pub apply_color: bool,
    /// CSS color applied to the root element's `style`.
    pub color: Option<String>,
    /// With `apply_color`, force all paint to `currentColor`.
    pub force_monochrome: bool,
    /// Bundle the written files into one zip archive.
    pub zip_enabled: bool,
    /// Base name for the archive; defaults to a timestamped name.
    pub zip_name: Option<String>,
}

impl ExportOptions {
    fn color_override(&self) -> Option<&str> {
        if self.apply_color {
            self.color.as_deref()
        } else {
            None
        }
    }
}

/// Ordered progress notifications emitted while a batch runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressEvent<'a> {
    /// Emitted once before the first fetch.
    Start { format: ExportFormat, total: usize },
    /// Emitted after each icon has been fetched and processed.
    Icon {
        current: usize,
        total: usize,
        icon: &'a IconId,
    },
    /// Emitted once after all writes (and the archive, if any) finished.
    Done { format: ExportFormat, total: usize },
}

// ============================================================================
// Exporter
// ============================================================================

/// Orchestrates fetch → transform → write → archive over a list of icons.
///
/// # Example
///
/// ```no_run
/// use iconify_downloader::{Exporter, ExportOptions, IconId, IconifyClient};
/// use std::path::Path;
///
/// let exporter = Exporter::new(IconifyClient::new());
/// let icons = [IconId::parse("mdi:home")?, IconId::parse("mdi:account")?];
/// let written = exporter.export_svgs(
///     &icons,
///     Path::new("./out"),
///     &ExportOptions::default(),
///     |_| {},
/// )?;
/// assert_eq!(written.len(), 2);
/// # Ok::<(), iconify_downloader::Error>(())
/// ```
#[derive(Debug)]
pub struct Exporter<S> {
    source: S,
}

impl<S: IconSource> Exporter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Exports each icon as an individual SVG file.
    ///
    /// Returns the written paths in input order, with the archive path
    /// appended last when `zip_enabled` is set.
    pub fn export_svgs(
        &self,
        icons: &[IconId],
        output_dir: &Path,
        options: &ExportOptions,
        mut progress: impl FnMut(ProgressEvent<'_>),
    ) -> Result<Vec<PathBuf>, Error> {
        let base_dir = resolve_base_dir(output_dir, options.subfolder.as_deref());
        fs::create_dir_all(&base_dir)?;

        let total = icons.len();
        progress(ProgressEvent::Start {
            format: ExportFormat::Svg,
            total,
        });

        let mut written = Vec::with_capacity(total);
        for icon in icons {
            let path = self
                .save_svg(icon, &base_dir, options)
                .map_err(|e| Error::for_icon(icon.to_string(), e))?;
            written.push(path);
            progress(ProgressEvent::Icon {
                current: written.len(),
                total,
                icon,
            });
        }

        if options.zip_enabled {
            let name = zip_base_name(options.zip_name.as_deref(), "icons");
            let zip_path = base_dir.join(format!("{name}.zip"));
            write_archive(&written, &base_dir, &zip_path)?;
            written.push(zip_path);
        }

        progress(ProgressEvent::Done {
            format: ExportFormat::Svg,
            total,
        });
        Ok(written)
    }

    fn save_svg(
        &self,
        icon: &IconId,
        base_dir: &Path,
        options: &ExportOptions,
    ) -> Result<PathBuf, Error> {
        let mut markup = self.source.fetch_svg(icon)?;
        if let Some(color) = options.color_override() {
            markup = svg::apply_color(&markup, color, options.force_monochrome);
        }

        let target_dir = if options.organize_by_prefix {
            let dir = base_dir.join(icon.prefix());
            fs::create_dir_all(&dir)?;
            dir
        } else {
            base_dir.to_path_buf()
        };

        let path = target_dir.join(format!("{}.svg", icon.file_stem()));
        fs::write(&path, markup)?;
        debug!("wrote {}", path.display());
        Ok(path)
    }

    /// Exports icons grouped into one JSON collection file per prefix.
    ///
    /// Document dimensions are seeded from the first icon seen for each
    /// prefix. Returns the written paths with the archive appended last
    /// when `zip_enabled` is set.
    pub fn export_collections(
        &self,
        icons: &[IconId],
        output_dir: &Path,
        options: &ExportOptions,
        mut progress: impl FnMut(ProgressEvent<'_>),
    ) -> Result<Vec<PathBuf>, Error> {
        let total = icons.len();
        progress(ProgressEvent::Start {
            format: ExportFormat::Json,
            total,
        });

        let mut collections: BTreeMap<String, CollectionDocument> = BTreeMap::new();
        for (index, icon) in icons.iter().enumerate() {
            let parsed = self
                .source
                .fetch_svg(icon)
                .and_then(|markup| svg::parse_icon(&markup, icon))
                .map_err(|e| Error::for_icon(icon.to_string(), e))?;
            progress(ProgressEvent::Icon {
                current: index + 1,
                total,
                icon,
            });
            collections
                .entry(parsed.prefix.clone())
                .or_insert_with(|| {
                    CollectionDocument::new(&parsed.prefix, parsed.width, parsed.height)
                })
                .insert(&parsed);
        }

        let base_dir = resolve_base_dir(output_dir, options.subfolder.as_deref());
        fs::create_dir_all(&base_dir)?;

        let mut written = Vec::with_capacity(collections.len());
        for (prefix, document) in &collections {
            let path = base_dir.join(format!("{prefix}.json"));
            let mut json = serde_json::to_vec_pretty(document)?;
            json.push(b'\n');
            fs::write(&path, json)?;
            debug!("wrote {}", path.display());
            written.push(path);
        }

        if options.zip_enabled {
            let name = zip_base_name(options.zip_name.as_deref(), "collections");
            let zip_path = base_dir.join(format!("{name}.zip"));
            write_archive(&written, &base_dir, &zip_path)?;
            written.push(zip_path);
        }

        progress(ProgressEvent::Done {
            format: ExportFormat::Json,
            total,
        });
        Ok(written)
    }
}

// ============================================================================
// Path and name sanitization
// ============================================================================

fn resolve_base_dir(output_dir: &Path, subfolder: Option<&str>) -> PathBuf {
    match subfolder.map(sanitize_folder_name) {
        Some(name) if !name.is_empty() => output_dir.join(name),
        _ => output_dir.to_path_buf(),
    }
}

/// Replaces characters invalid in folder names with `-` and trims.
fn sanitize_folder_name(input: &str) -> String {
    input
        .replace(['<', '>', ':', '"', '/', '\\', '|', '?', '*'], "-")
        .trim()
        .to_string()
}

fn zip_base_name(requested: Option<&str>, default_stem: &str) -> String {
    match requested {
        Some(name) => sanitize_zip_name(name),
        None => format!("{default_stem}-{}", unix_millis()),
    }
}

/// Normalizes a user-supplied archive name to a portable base name:
/// trimmed, a trailing `.zip` stripped, lowercased, anything outside
/// `[a-z0-9._-]` collapsed into single underscores. Falls back to `icons`
/// when nothing survives.
fn sanitize_zip_name(input: &str) -> String {
    let trimmed = input.trim();
    let stem = trimmed
        .get(trimmed.len().wrapping_sub(4)..)
        .filter(|tail| tail.eq_ignore_ascii_case(".zip"))
        .map(|_| &trimmed[..trimmed.len() - 4])
        .unwrap_or(trimmed);

    let mut out = String::with_capacity(stem.len());
    let mut previous_was_filler = false;
    for c in stem.to_lowercase().chars() {
        let mapped = if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            c
        } else {
            '_'
        };
        if mapped == '_' {
            if previous_was_filler {
                continue;
            }
            previous_was_filler = true;
        } else {
            previous_was_filler = false;
        }
        out.push(mapped);
    }

    let out = out.trim_matches('_');
    if out.is_empty() {
        "icons".to_string()
    } else {
        out.to_string()
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
