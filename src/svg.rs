//! SVG transforms: recoloring and extraction into collection records.
//!
//! Both operations stream quick-xml events rather than building a full DOM.
//! Untouched markup is copied through from the raw event buffers, so an
//! export without recoloring writes the fetched document byte-for-byte.
//!
//! The two entry points deliberately differ on malformed input:
//! [`apply_color`] is a silent no-op when no `<svg>` root exists (a recolor
//! of something unrecognizable just returns it), while [`parse_icon`] fails
//! with [`Error::MalformedSvg`] because the JSON collection format cannot
//! represent a document without a root element.

use log::warn;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};

use crate::error::Error;
use crate::icon::{IconId, ParsedIcon};

/// viewBox assumed when the attribute is absent or unparseable.
const DEFAULT_VIEW_BOX: (f64, f64) = (24.0, 24.0);

// ============================================================================
// Recoloring
// ============================================================================

/// Applies a foreground color to SVG markup.
///
/// Appends `color: {color};` to the root element's `style` attribute
/// (creating it if needed). With `force_monochrome`, every `fill` and
/// `stroke` attribute inside the root that is not exactly `none` is
/// rewritten to `currentColor`, and the root gains `fill="currentColor"`
/// unless it already carries `fill="none"`. Shapes then inherit the CSS
/// `color` just set, so the whole icon becomes a single controllable
/// foreground color.
///
/// Markup with no `<svg>` root element is returned unchanged.
pub fn apply_color(svg: &str, color: &str, force_monochrome: bool) -> String {
    recolor(svg, color, force_monochrome).unwrap_or_else(|| svg.to_string())
}

fn recolor(svg: &str, color: &str, mono: bool) -> Option<String> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());
    let mut saw_root = false;
    let mut in_root = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event().ok()? {
            Event::Start(e) => {
                if !saw_root && e.local_name().as_ref() == b"svg" {
                    saw_root = true;
                    in_root = true;
                    depth = 0;
                    let root = restyle_root(&e, color, mono)?;
                    writer.write_event(Event::Start(root)).ok()?;
                } else if in_root && mono {
                    depth += 1;
                    let rewritten = rewrite_paint(&e)?;
                    writer.write_event(Event::Start(rewritten)).ok()?;
                } else {
                    if in_root {
                        depth += 1;
                    }
                    writer.write_event(Event::Start(e)).ok()?;
                }
            }
            Event::Empty(e) => {
                if !saw_root && e.local_name().as_ref() == b"svg" {
                    saw_root = true;
                    let root = restyle_root(&e, color, mono)?;
                    writer.write_event(Event::Empty(root)).ok()?;
                } else if in_root && mono {
                    let rewritten = rewrite_paint(&e)?;
                    writer.write_event(Event::Empty(rewritten)).ok()?;
                } else {
                    writer.write_event(Event::Empty(e)).ok()?;
                }
            }
            Event::End(e) => {
                if in_root && depth == 0 {
                    in_root = false;
                } else if in_root {
                    depth -= 1;
                }
                writer.write_event(Event::End(e)).ok()?;
            }
            Event::Eof => break,
            other => writer.write_event(other).ok()?,
        }
    }

    if !saw_root {
        return None;
    }
    String::from_utf8(writer.into_inner()).ok()
}

/// Rebuilds the root `<svg>` element with the color style appended and,
/// in monochrome mode, its own `fill` forced to `currentColor`.
fn restyle_root(element: &BytesStart<'_>, color: &str, mono: bool) -> Option<BytesStart<'static>> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    let mut style = None;
    let mut fill = None;

    for attr in element.attributes() {
        let attr = attr.ok()?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().ok()?.into_owned();
        match key.as_str() {
            "style" => style = Some(value),
            "fill" => fill = Some(value),
            _ => out.push_attribute((key.as_str(), value.as_str())),
        }
    }

    let style = match style {
        Some(existing) => format!("{existing}; color: {color};"),
        None => format!("color: {color};"),
    };
    out.push_attribute(("style", style.as_str()));

    match fill {
        Some(value) if !mono || value == "none" => out.push_attribute(("fill", value.as_str())),
        Some(_) => out.push_attribute(("fill", "currentColor")),
        None if mono => out.push_attribute(("fill", "currentColor")),
        None => {}
    }

    Some(out)
}

/// Rewrites `fill`/`stroke` attributes to `currentColor`, leaving values
/// that are exactly `none` (or empty) untouched.
fn rewrite_paint(element: &BytesStart<'_>) -> Option<BytesStart<'static>> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);

    for attr in element.attributes() {
        let attr = attr.ok()?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().ok()?.into_owned();
        let value = match key.as_str() {
            "fill" | "stroke" if !value.is_empty() && value != "none" => {
                "currentColor".to_string()
            }
            _ => value,
        };
        out.push_attribute((key.as_str(), value.as_str()));
    }

    Some(out)
}

// ============================================================================
// Extraction for JSON collections
// ============================================================================

/// Extracts the inner markup and intrinsic dimensions of an SVG document.
///
/// `body` is the content between the root tags with surrounding whitespace
/// trimmed. Width and height come from the third and fourth viewBox tokens;
/// a missing viewBox defaults to `0 0 24 24`.
pub fn parse_icon(svg: &str, icon: &IconId) -> Result<ParsedIcon, Error> {
    extract(svg, icon).ok_or_else(|| Error::MalformedSvg {
        icon: icon.to_string(),
    })
}

fn extract(svg: &str, icon: &IconId) -> Option<ParsedIcon> {
    let mut reader = Reader::from_str(svg);

    loop {
        match reader.read_event().ok()? {
            Event::Start(e) if e.local_name().as_ref() == b"svg" => {
                let view_box = attribute_value(&e, "viewBox")?;
                let body = read_inner(&mut reader)?;
                return Some(build_icon(icon, body.trim(), view_box.as_deref()));
            }
            Event::Empty(e) if e.local_name().as_ref() == b"svg" => {
                let view_box = attribute_value(&e, "viewBox")?;
                return Some(build_icon(icon, "", view_box.as_deref()));
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}

fn build_icon(icon: &IconId, body: &str, view_box: Option<&str>) -> ParsedIcon {
    let (width, height) = parse_view_box(icon, view_box);
    ParsedIcon {
        prefix: icon.prefix().to_string(),
        name: icon.name().to_string(),
        body: body.to_string(),
        width,
        height,
    }
}

/// Reads the decoded value of one attribute, `None` propagating attribute
/// parse errors, `Some(None)` meaning the attribute is absent.
fn attribute_value(element: &BytesStart<'_>, name: &str) -> Option<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == name.as_bytes() {
            return Some(Some(attr.unescape_value().ok()?.into_owned()));
        }
    }
    Some(None)
}

/// Copies events through until the end tag matching the already-consumed
/// root start tag, reproducing the inner markup from the raw buffers.
fn read_inner(reader: &mut Reader<&[u8]>) -> Option<String> {
    let mut writer = Writer::new(Vec::new());
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().ok()?;
        match event {
            Event::Start(_) => {
                depth += 1;
                writer.write_event(event).ok()?;
            }
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                writer.write_event(event).ok()?;
            }
            Event::Eof => return None,
            _ => writer.write_event(event).ok()?,
        }
    }

    String::from_utf8(writer.into_inner()).ok()
}

fn parse_view_box(icon: &IconId, raw: Option<&str>) -> (f64, f64) {
    let Some(raw) = raw else {
        return DEFAULT_VIEW_BOX;
    };
    let tokens: Vec<f64> = raw
        .split_whitespace()
        .filter_map(|t| t.parse().ok())
        .collect();
    if tokens.len() == 4 {
        (tokens[2], tokens[3])
    } else {
        warn!("{icon}: unparseable viewBox {raw:?}, assuming 0 0 24 24");
        DEFAULT_VIEW_BOX
    }
}
