//! Reading resolved files for display.

use crate::error::Result;
use crate::fs::ResolvedPath;

/// Reads the whole file and closes it before returning. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn read_source(file: &ResolvedPath) -> Result<String> {
    let bytes = std::fs::read(&file.absolute)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!("Lossy decode for {}", file.logical);
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    })
}
