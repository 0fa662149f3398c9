//! Pretty-printed JSON dumps to uniquely named files.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;

use super::{PersistError, PersistResult};

/// File name prefix of every dump.
pub const DUMP_PREFIX: &str = "quietlog-dump-";

/// Writes `value` as indented JSON to a fresh `*.json` file under `dir`.
///
/// The file is kept after return; removing it is the caller's business.
pub fn dump_value<T>(dir: &Path, value: &T) -> PersistResult<PathBuf>
where
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string_pretty(value)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(DUMP_PREFIX)
        .suffix(".json")
        .tempfile_in(dir)
        .map_err(|err| PersistError::from_io(err, dir))?;
    tmp.write_all(text.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|err| PersistError::from_io(err, tmp.path()))?;

    let (_, path) = tmp
        .keep()
        .map_err(|err| PersistError::from_io(err.error, dir))?;
    Ok(path)
}
