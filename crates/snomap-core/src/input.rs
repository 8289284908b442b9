//! Reading the list of codes to map.

use std::path::Path;

use snomap_model::SnomedCode;

use crate::error::{CoreError, Result};

/// Read newline-delimited codes from a file.
///
/// Blank lines are ignored; any other line that is not a digit string aborts
/// the read with its line number.
pub fn read_codes(path: &Path) -> Result<Vec<SnomedCode>> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_codes(&text, path)
}

/// Parse newline-delimited codes; `origin` is used in error messages only.
pub fn parse_codes(text: &str, origin: &Path) -> Result<Vec<SnomedCode>> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_matches('\u{feff}').trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_no, line)| {
            SnomedCode::new(line).map_err(|source| CoreError::InvalidCode {
                path: origin.to_path_buf(),
                line: line_no,
                source,
            })
        })
        .collect()
}
