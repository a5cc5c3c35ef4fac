//! Writing a table to a destination file

use crate::codec::Encoding;
use crate::error::{Error, Result, Role};
use crate::table::Table;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Serialize `table` into the encoding named by the suffix of `path`
///
/// The table is fully encoded before the destination is opened, so an
/// unsupported suffix or an encoding failure never creates or truncates a file.
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let encoding = Encoding::for_path(path, Role::Destination)?;

    let bytes = encoding
        .encode(table)
        .map_err(|source| Error::Encode { encoding, source })?;

    write_bytes(path, &bytes).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(
        path = %path.display(),
        %encoding,
        bytes = bytes.len(),
        "wrote table"
    );

    Ok(())
}

fn write_bytes(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()
}
