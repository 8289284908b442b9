//! Success and failure tables, and the set of codes they already record.
//!
//! Both tables are append-only CSV files. Together they form the ledger used
//! to skip codes on later runs: a code found in either table counts as
//! processed. A full refresh truncates both tables to their header row.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer, WriterBuilder};
use tracing::{debug, info, warn};
use uuid::Uuid;

use snomap_model::{MappingOutcome, MappingRecord, SnomedCode};

use crate::error::{CoreError, Result};
use crate::layout::OutputLayout;

/// Header row of the success table.
pub const SUCCESS_HEADERS: [&str; 4] = ["id", "snomed_code", "icd10_code", "timestamp"];

/// Header row of the failure table.
pub const FAILURE_HEADERS: [&str; 4] = ["id", "snomed_code", "error_message", "timestamp"];

/// Column names accepted as the code column when reading a table.
const CODE_COLUMNS: [&str; 2] = ["snomed_code", "snomed"];

/// Which of the two output tables a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Success,
    Failure,
}

impl TableKind {
    pub fn headers(self) -> [&'static str; 4] {
        match self {
            Self::Success => SUCCESS_HEADERS,
            Self::Failure => FAILURE_HEADERS,
        }
    }

    pub fn for_outcome(outcome: &MappingOutcome) -> Self {
        match outcome {
            MappingOutcome::Success { .. } => Self::Success,
            MappingOutcome::Failure { .. } => Self::Failure,
        }
    }
}

/// An open, append-only output table.
struct OutputTable {
    path: PathBuf,
    writer: Writer<File>,
}

impl OutputTable {
    /// Open for appending, writing the header if the file is new or empty.
    ///
    /// An existing table whose last row lacks a line terminator gets one
    /// first, so the next row starts on its own line.
    fn open(path: &Path, kind: TableKind, truncate: bool) -> Result<Self> {
        let write_err = |source: io::Error| CoreError::LedgerWrite {
            path: path.to_path_buf(),
            source: source.into(),
        };
        let needs_header = truncate
            || std::fs::metadata(path)
                .map(|meta| meta.len() == 0)
                .unwrap_or(true);
        let needs_terminator = !truncate && missing_final_newline(path).map_err(write_err)?;

        let mut file = if truncate {
            File::create(path)
        } else {
            OpenOptions::new().create(true).append(true).open(path)
        }
        .map_err(write_err)?;
        if needs_terminator {
            warn!(path = %path.display(), "table ends mid-row, terminating it");
            file.write_all(b"\n").map_err(write_err)?;
        }

        let mut table = Self {
            path: path.to_path_buf(),
            writer: WriterBuilder::new().has_headers(false).from_writer(file),
        };
        if needs_header {
            table.write_row(kind.headers())?;
        }
        Ok(table)
    }

    /// Write and flush one row, so an interrupted run keeps every completed code.
    fn write_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(row)
            .and_then(|()| self.writer.flush().map_err(csv::Error::from))
            .map_err(|source| CoreError::LedgerWrite {
                path: self.path.clone(),
                source,
            })
    }
}

/// True if the file exists, is non-empty and its last byte is not `\n`.
fn missing_final_newline(path: &Path) -> io::Result<bool> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(error) => return Err(error),
    };
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// The two output tables plus the in-memory set of processed codes.
pub struct Ledger {
    success: OutputTable,
    failure: OutputTable,
    processed: HashSet<SnomedCode>,
}

impl Ledger {
    /// Open both tables under `layout`.
    ///
    /// With `full_refresh` both tables are truncated and the processed set
    /// starts empty; otherwise the existing rows are loaded once.
    pub fn open(layout: &OutputLayout, full_refresh: bool) -> Result<Self> {
        let root = layout.root();
        if !root.as_os_str().is_empty() {
            std::fs::create_dir_all(root).map_err(|source| CoreError::CreateDir {
                path: root.to_path_buf(),
                source,
            })?;
        }

        let success_path = layout.success_table();
        let failure_path = layout.failure_table();

        let processed = if full_refresh {
            info!("full refresh: clearing output tables");
            HashSet::new()
        } else {
            let mut codes = read_processed_codes(&success_path)?;
            codes.extend(read_processed_codes(&failure_path)?);
            info!(processed = codes.len(), "loaded existing ledger");
            codes
        };

        Ok(Self {
            success: OutputTable::open(&success_path, TableKind::Success, full_refresh)?,
            failure: OutputTable::open(&failure_path, TableKind::Failure, full_refresh)?,
            processed,
        })
    }

    /// True if the code already has a row in either table.
    pub fn contains(&self, code: &SnomedCode) -> bool {
        self.processed.contains(code)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Append a record to its table under a fresh id, returning the id.
    pub fn append(&mut self, record: &MappingRecord) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let timestamp = record.formatted_timestamp();
        let detail = match &record.outcome {
            MappingOutcome::Success { icd10_code } => icd10_code,
            MappingOutcome::Failure { reason } => reason,
        };
        let table = match TableKind::for_outcome(&record.outcome) {
            TableKind::Success => &mut self.success,
            TableKind::Failure => &mut self.failure,
        };
        table.write_row([
            id.as_str(),
            record.code.as_str(),
            detail.as_str(),
            timestamp.as_str(),
        ])?;
        debug!(%id, code = %record.code, "ledger row appended");
        self.processed.insert(record.code.clone());
        Ok(id)
    }
}

/// Collect the codes recorded in one output table.
///
/// A missing file is an empty ledger. Rows whose code cell is not a valid
/// code are skipped with a warning.
pub fn read_processed_codes(path: &Path) -> Result<HashSet<SnomedCode>> {
    let mut codes = HashSet::new();
    if !path.exists() {
        return Ok(codes);
    }

    let read_err = |source: csv::Error| CoreError::LedgerRead {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let headers = reader.headers().map_err(read_err)?.clone();
    if headers.is_empty() {
        return Ok(codes);
    }
    let column = headers
        .iter()
        .position(|h| {
            let h = h.trim_matches('\u{feff}').trim();
            CODE_COLUMNS.iter().any(|c| h.eq_ignore_ascii_case(c))
        })
        .ok_or_else(|| CoreError::LedgerFormat {
            path: path.to_path_buf(),
        })?;

    for record in reader.records() {
        let record = record.map_err(read_err)?;
        let Some(cell) = record.get(column) else {
            continue;
        };
        match SnomedCode::new(cell) {
            Ok(code) => {
                codes.insert(code);
            }
            Err(error) => warn!(path = %path.display(), %error, "ignoring ledger row"),
        }
    }
    Ok(codes)
}
