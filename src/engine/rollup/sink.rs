use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::engine::errors::RollupError;

/// Reads one JSON value per line. Blank lines are skipped; a line that is not
/// valid JSON is kept as `null` so the decoder drops and counts it.
pub fn read_json_lines(path: &Path) -> Result<Vec<JsonValue>, RollupError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(value) => records.push(value),
            Err(e) => {
                debug!(target: "clients_daily::sink", line = idx + 1, err = %e, "Unparseable input line");
                records.push(JsonValue::Null);
            }
        }
    }
    info!(target: "clients_daily::sink", path = %path.display(), records = records.len(), "Read input");
    Ok(records)
}

/// Writes rows as JSON lines. The target only appears once every row has been
/// written and flushed; on error nothing is published.
pub fn write_json_lines_atomically<T: Serialize>(
    path: &Path,
    rows: &[T],
) -> Result<(), RollupError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        for row in rows {
            serde_json::to_writer(&mut writer, row)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| RollupError::Io(e.error))?;

    info!(target: "clients_daily::sink", path = %path.display(), rows = rows.len(), "Wrote output");
    Ok(())
}
