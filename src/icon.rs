//! Core value types: icon identifiers, parsed icons and JSON collections.
//!
//! An icon in the remote catalog is addressed by an identifier of the form
//! `prefix:name`, where the prefix names the icon set (e.g. `mdi`) and the
//! name the icon inside it (e.g. `home`). The JSON export path turns fetched
//! SVG markup into [`ParsedIcon`] records and groups them per prefix into
//! [`CollectionDocument`]s compatible with Iconify's collection format.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::Error;

// ============================================================================
// IconId
// ============================================================================

/// A validated `prefix:name` icon identifier.
///
/// Both halves must be non-empty. The name half may itself contain further
/// `:` separators (some callers pass odd identifiers through from search
/// results); those extra separators are folded into `-` when deriving a
/// filename.
///
/// # Example
///
/// ```
/// use iconify_downloader::IconId;
///
/// let id: IconId = "mdi:home".parse().unwrap();
/// assert_eq!(id.prefix(), "mdi");
/// assert_eq!(id.name(), "home");
/// assert_eq!(id.file_stem(), "mdi-home");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconId {
    prefix: String,
    name: String,
}

impl IconId {
    /// Parses an identifier, validating the `prefix:name` shape.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let (prefix, name) = input
            .split_once(':')
            .ok_or_else(|| Error::InvalidIdentifier(input.to_string()))?;
        if prefix.is_empty() || name.is_empty() {
            return Err(Error::InvalidIdentifier(input.to_string()));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            name: name.to_string(),
        })
    }

    /// Builds an identifier from already-validated parts.
    ///
    /// Used when expanding a collection listing, where the remote service
    /// returns bare names scoped to a known prefix.
    pub fn from_parts(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// The icon set prefix (everything before the first `:`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The icon name (everything after the first `:`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filename stem for SVG export: `{prefix}-{name}`, with any residual
    /// `:` in the name folded into `-`.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.prefix, self.name.replace(':', "-"))
    }
}

impl FromStr for IconId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.name)
    }
}

// ============================================================================
// Parsed icons and collections
// ============================================================================

/// One icon extracted from fetched SVG markup, ready for grouping into a
/// collection document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIcon {
    pub prefix: String,
    pub name: String,
    /// Inner markup of the `<svg>` element, surrounding whitespace trimmed.
    pub body: String,
    /// Width component of the viewBox (third numeric token).
    pub width: f64,
    /// Height component of the viewBox (fourth numeric token).
    pub height: f64,
}

/// A single icon entry inside a [`CollectionDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconRecord {
    pub body: String,
    #[serde(serialize_with = "serialize_dimension")]
    pub width: f64,
    #[serde(serialize_with = "serialize_dimension")]
    pub height: f64,
}

/// An Iconify-compatible collection: all exported icons sharing one prefix.
///
/// Document-level `width`/`height` are seeded from the first icon seen for
/// the prefix and are not revalidated against later icons of differing size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDocument {
    pub prefix: String,
    pub icons: BTreeMap<String, IconRecord>,
    #[serde(serialize_with = "serialize_dimension")]
    pub width: f64,
    #[serde(serialize_with = "serialize_dimension")]
    pub height: f64,
}

impl CollectionDocument {
    /// Creates an empty collection whose dimensions come from the first
    /// icon encountered for this prefix.
    pub fn new(prefix: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            prefix: prefix.into(),
            icons: BTreeMap::new(),
            width,
            height,
        }
    }

    /// Inserts or replaces one icon entry.
    pub fn insert(&mut self, icon: &ParsedIcon) {
        self.icons.insert(
            icon.name.clone(),
            IconRecord {
                body: icon.body.clone(),
                width: icon.width,
                height: icon.height,
            },
        );
    }
}

/// Iconify collection dimensions are conventionally integers; emit them as
/// such when the value is integral so the output matches upstream JSON.
fn serialize_dimension<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
