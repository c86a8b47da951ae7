//! Generation of a provider source file registering exported collections.
//!
//! The provider is a small React module that imports every `*.json`
//! collection in a directory and registers it with `@iconify/react`'s
//! `addCollection` at startup, so a host app can render the exported icons
//! by identifier without further setup.

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::info;

use crate::error::Error;

/// Emits `IconProvider.tsx` (or `.jsx`) into `gen_dir`, importing every
/// JSON collection file found in `icon_dir`.
///
/// Fails with [`Error::DirectoryNotFound`] when `icon_dir` does not exist
/// and [`Error::NoCollections`] when it holds no `*.json` files; nothing is
/// written in either case. Collections are imported in filename order so
/// regeneration is deterministic.
pub fn generate_provider(
    icon_dir: &Path,
    gen_dir: &Path,
    typescript: bool,
) -> Result<PathBuf, Error> {
    if !icon_dir.is_dir() {
        return Err(Error::DirectoryNotFound(icon_dir.to_path_buf()));
    }

    let mut files: Vec<String> = fs::read_dir(icon_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(Error::NoCollections(icon_dir.to_path_buf()));
    }

    let import_dir = relative_import_path(gen_dir, icon_dir);
    let mut imports = String::new();
    let mut variables = Vec::with_capacity(files.len());
    for file in &files {
        let variable = variable_name(file);
        imports.push_str(&format!("import {variable} from \"{import_dir}/{file}\";\n"));
        variables.push(variable);
    }

    let output = format!(
        "\"use client\";\nimport {{ addCollection }} from \"@iconify/react\";\n{imports}[{}].forEach(icons=>addCollection(icons))\n",
        variables.join(", ")
    );

    fs::create_dir_all(gen_dir)?;
    let output_path = gen_dir.join(format!(
        "IconProvider.{}",
        if typescript { "tsx" } else { "jsx" }
    ));
    fs::write(&output_path, output)?;
    info!(
        "registered {} collections in {}",
        files.len(),
        output_path.display()
    );
    Ok(output_path)
}

/// Identifier-safe variable name: basename minus `.json`, with `-` and
/// whitespace replaced by `_`.
fn variable_name(file: &str) -> String {
    let stem = file.strip_suffix(".json").unwrap_or(file);
    stem.chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Import path of `icon_dir` as seen from `gen_dir`: `/`-separated and
/// `./`-prefixed unless it already starts with `.`.
fn relative_import_path(gen_dir: &Path, icon_dir: &Path) -> String {
    let from = normalize(gen_dir);
    let to = normalize(icon_dir);

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat_n("..".to_string(), from.len() - common)
        .chain(to[common..].iter().cloned())
        .collect();
    if parts.is_empty() {
        parts.push(".".to_string());
    }

    let joined = parts.join("/");
    if joined.starts_with('.') {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Flattens a path to its logical components, resolving relative paths
/// against the working directory so both sides diff on the same base.
fn normalize(path: &Path) -> Vec<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().unwrap_or_default().join(path)
    };

    let mut out = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Normal(c) => out.push(c.to_string_lossy().into_owned()),
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_typed_provider_with_sorted_imports() {
        let dir = tempfile::tempdir().unwrap();
        let collections = dir.path().join("collections");
        fs::create_dir(&collections).unwrap();
        fs::write(collections.join("my-set.json"), "{}").unwrap();
        fs::write(collections.join("mdi.json"), "{}").unwrap();
        fs::write(collections.join("notes.txt"), "ignored").unwrap();

        let gen_dir = dir.path().join("generated");
        let path = generate_provider(&collections, &gen_dir, true).unwrap();

        assert_eq!(path, gen_dir.join("IconProvider.tsx"));
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "\"use client\";\n\
             import { addCollection } from \"@iconify/react\";\n\
             import mdi from \"../collections/mdi.json\";\n\
             import my_set from \"../collections/my-set.json\";\n\
             [mdi, my_set].forEach(icons=>addCollection(icons))\n"
        );
    }

    #[test]
    fn generates_plain_variant_without_typescript() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("logos.json"), "{}").unwrap();

        let path = generate_provider(dir.path(), dir.path(), false).unwrap();
        assert_eq!(path, dir.path().join("IconProvider.jsx"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("import logos from \"./logos.json\";"), "{content}");
    }

    #[test]
    fn missing_directory_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let gen_dir = dir.path().join("generated");
        let err =
            generate_provider(&dir.path().join("nope"), &gen_dir, true).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
        assert!(!gen_dir.exists());
    }

    #[test]
    fn empty_directory_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let icons = dir.path().join("collections");
        fs::create_dir(&icons).unwrap();
        let gen_dir = dir.path().join("generated");

        let err = generate_provider(&icons, &gen_dir, true).unwrap_err();
        assert!(matches!(err, Error::NoCollections(_)));
        assert!(!gen_dir.exists());
    }

    #[test]
    fn variable_names_are_identifier_safe() {
        assert_eq!(variable_name("my-set.json"), "my_set");
        assert_eq!(variable_name("brand icons.json"), "brand_icons");
        assert_eq!(variable_name("mdi.json"), "mdi");
    }

    #[test]
    fn import_path_for_nested_icon_dir() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        assert_eq!(
            relative_import_path(base, &base.join("collections")),
            "./collections"
        );
        assert_eq!(relative_import_path(base, base), ".");
        assert_eq!(
            relative_import_path(&base.join("a").join("b"), &base.join("collections")),
            "../../collections"
        );
    }
}
