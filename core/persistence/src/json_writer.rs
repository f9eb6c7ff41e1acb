//! FILENAME: core/persistence/src/json_writer.rs

use crate::PersistenceError;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the serde representation of `value` as pretty-printed JSON.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), PersistenceError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    info!(target: "EXPORT", "saved JSON to {}", path.display());
    Ok(())
}
