//! JSON-lines persistence for interaction events.
//!
//! One serialized `InteractionEvent` per line. A missing journal is an empty
//! history, not an error.

use crate::store::StoreError;
use crate::types::InteractionEvent;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::Path;
use tracing::{info, warn};

/// Read every event from the journal at `path`.
///
/// Blank lines are skipped; a line that fails to decode is an error.
pub fn load_journal(path: &Path) -> Result<Vec<InteractionEvent>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("No journal at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut events = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line)?);
    }

    info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Append `event` to the journal at `path`, creating it if needed
pub fn append_to_journal(path: &Path, event: &InteractionEvent) -> Result<(), StoreError> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}
