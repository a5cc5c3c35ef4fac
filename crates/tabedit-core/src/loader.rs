//! Loading a table from a source file

use crate::codec::Encoding;
use crate::error::{Error, Result, Role};
use crate::table::Table;
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Load a table from `path`, picking the decoder from the file suffix
///
/// Checks run in order: the path must be an existing regular file, it must not
/// be empty, and its suffix must be a supported encoding.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(Error::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let metadata = fs::metadata(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    if metadata.len() == 0 {
        return Err(Error::SourceEmpty {
            path: path.to_path_buf(),
        });
    }

    let encoding = Encoding::for_path(path, Role::Source)?;

    let bytes = fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let table = encoding.decode(&bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        encoding,
        source,
    })?;

    debug!(
        path = %path.display(),
        %encoding,
        rows = table.row_count(),
        "loaded table"
    );

    Ok(table)
}

/// List the regular files that sit next to `path`, sorted by name
///
/// A bare file name is resolved against the current directory.
pub fn list_sibling_files<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let dir = match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(names)
}

/// Create an empty file at `path`; fails if something already exists there
pub fn create_placeholder<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    OpenOptions::new().write(true).create_new(true).open(path)?;
    debug!(path = %path.display(), "created placeholder");
    Ok(())
}
