//! Zip archive assembly for exported files.
//!
//! Entries are named by their path relative to the export base directory,
//! always `/`-separated, and compressed with deflate at maximum level. The
//! archive is written to a `.part` sibling and renamed into place only once
//! every entry has been streamed, so a failed run never leaves a partial
//! file at the destination path.

use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use log::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

use crate::error::Error;

/// Packages `files` into a zip archive at `dest`.
///
/// Every input path must live under `base_dir`; its archive entry name is
/// the relative remainder. Any read or stream failure aborts the archive as
/// a whole and surfaces as [`Error::Archive`].
pub fn write_archive(files: &[PathBuf], base_dir: &Path, dest: &Path) -> Result<(), Error> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut partial = dest.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    match stream_entries(files, base_dir, &partial) {
        Ok(()) => {
            fs::rename(&partial, dest)?;
            debug!("archived {} files into {}", files.len(), dest.display());
            Ok(())
        }
        Err(source) => {
            let _ = fs::remove_file(&partial);
            Err(Error::Archive {
                path: dest.to_path_buf(),
                source,
            })
        }
    }
}

fn stream_entries(files: &[PathBuf], base_dir: &Path, partial: &Path) -> Result<(), ZipError> {
    let mut zip = ZipWriter::new(File::create(partial)?);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    for path in files {
        zip.start_file(entry_name(path, base_dir)?, options)?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

/// Archive-relative entry name with `/` separators on every platform.
fn entry_name(path: &Path, base_dir: &Path) -> Result<String, io::Error> {
    let relative = path.strip_prefix(base_dir).map_err(|_| {
        io::Error::new(
            ErrorKind::InvalidInput,
            format!("{} is outside {}", path.display(), base_dir.display()),
        )
    })?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn archives_files_with_relative_slash_names() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        fs::create_dir(base.join("mdi")).unwrap();
        fs::write(base.join("top.svg"), "<svg>top</svg>").unwrap();
        fs::write(base.join("mdi").join("nested.svg"), "<svg>nested</svg>").unwrap();

        let dest = base.join("icons.zip");
        let files = vec![base.join("top.svg"), base.join("mdi").join("nested.svg")];
        write_archive(&files, base, &dest).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, ["top.svg", "mdi/nested.svg"]);

        let mut content = String::new();
        archive
            .by_name("mdi/nested.svg")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<svg>nested</svg>");
    }

    #[test]
    fn unreadable_entry_fails_without_leaving_destination() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        fs::write(base.join("a.svg"), "a").unwrap();

        let dest = base.join("out.zip");
        let files = vec![base.join("a.svg"), base.join("missing.svg")];
        let err = write_archive(&files, base, &dest).unwrap_err();

        assert!(matches!(err, Error::Archive { .. }));
        assert!(!dest.exists());
        let mut leftover = dest.as_os_str().to_owned();
        leftover.push(".part");
        assert!(!PathBuf::from(leftover).exists());
    }

    #[test]
    fn rejects_files_outside_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("stray.svg"), "x").unwrap();

        let dest = dir.path().join("out.zip");
        let err = write_archive(
            &[outside.path().join("stray.svg")],
            dir.path(),
            &dest,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Archive { .. }));
        assert!(!dest.exists());
    }
}
