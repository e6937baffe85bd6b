//! Reader for galaxy-type count files.
//!
//! The first three lines are a header: number of unique sequences, total
//! number of molecules, and an empty line. Every following line with exactly
//! two whitespace-separated fields is a `sequence abundance` record; any
//! other shape is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::catalog::Catalog;
use crate::error::{ClusterError, Result};

const HEADER_LINES: usize = 3;

/// Parsed content of a count file.
#[derive(Clone, Debug, Default)]
pub struct CountTable {
    /// `(sequence, abundance)` in file order.
    pub records: Vec<(String, u64)>,
    /// Unique-sequence count declared in the header, if readable.
    pub declared_unique: Option<u64>,
    /// Molecule count declared in the header, if readable.
    pub declared_total: Option<u64>,
    /// Lines after the header that did not have two fields.
    pub skipped_lines: usize,
}

impl CountTable {
    pub fn total_abundance(&self) -> u64 {
        self.records.iter().map(|(_, a)| a).sum()
    }

    /// Build a catalog from the records; the total is recomputed from them.
    pub fn into_catalog(self) -> Result<Catalog> {
        Catalog::from_pairs(self.records)
    }
}

/// Load a count file from disk.
pub fn load_counts(path: &Path) -> Result<CountTable> {
    let file = File::open(path).map_err(|e| ClusterError::io(path, "open", e))?;
    read_counts(BufReader::new(file)).map_err(|e| match e {
        ClusterError::Io {
            operation, source, ..
        } => ClusterError::io(path, operation, source),
        other => other,
    })
}

/// Parse a count table from any buffered reader.
pub fn read_counts<R: BufRead>(reader: R) -> Result<CountTable> {
    let mut table = CountTable::default();
    let mut n_lines = 0;

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ClusterError::io("<input>", "read", e))?;
        let line_no = i + 1;
        n_lines = line_no;

        match line_no {
            1 => table.declared_unique = last_integer(&line),
            2 => table.declared_total = last_integer(&line),
            3 => {}
            _ => {
                let mut fields = line.split_whitespace();
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(seq), Some(abd), None) => {
                        let abundance = abd.parse::<u64>().map_err(|_| {
                            ClusterError::parse(
                                line_no,
                                format!("abundance '{}' is not an unsigned integer", abd),
                            )
                        })?;
                        table.records.push((seq.to_string(), abundance));
                    }
                    _ => {
                        debug!("Skipping line {}: expected 2 fields", line_no);
                        table.skipped_lines += 1;
                    }
                }
            }
        }
    }

    if n_lines < HEADER_LINES {
        return Err(ClusterError::MissingHeader { lines: n_lines });
    }

    if let Some(unique) = table.declared_unique {
        if unique != table.records.len() as u64 {
            warn!(
                "Header declares {} unique sequences, found {}",
                unique,
                table.records.len()
            );
        }
    }
    if let Some(total) = table.declared_total {
        let found = table.total_abundance();
        if total != found {
            warn!("Header declares {} molecules, found {}", total, found);
        }
    }

    Ok(table)
}

fn last_integer(line: &str) -> Option<u64> {
    line.split(|c: char| c.is_whitespace() || c == '=' || c == ':')
        .filter(|t| !t.is_empty())
        .last()
        .and_then(|t| t.parse().ok())
}
