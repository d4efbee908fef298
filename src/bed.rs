//! Streaming BED / BedGraph reader and the crate error type.

use crate::interval::BedEntry;
use crate::streaming::parsing::{extra_fields, parse_bed3_bytes_with_rest, should_skip_line};
use std::io::{self, BufRead, BufReader, Read};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while reading, windowing or writing records.
#[derive(Error, Debug)]
pub enum BedError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid BED format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, BedError>;

/// A BED record whose payload is the raw columns after the third.
pub type FlatBedEntry = BedEntry<Vec<String>>;

/// A streaming BED file reader.
pub struct BedReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: String,
}

impl<R: Read> BedReader<R> {
    /// Create a new BED reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::with_capacity(1024),
        }
    }

    /// Create a BED reader with custom buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buffer: String::with_capacity(1024),
        }
    }

    /// Line number of the most recently read line (1-based).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next BED record.
    pub fn read_record(&mut self) -> Result<Option<FlatBedEntry>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_end_matches(&['\n', '\r'][..]);
            if should_skip_line(line.as_bytes()) || line.trim().is_empty() {
                continue;
            }

            return parse_line(line, self.line_number).map(Some);
        }
    }

    /// Read the next record and convert extra column `column` to a float.
    ///
    /// Strict mode fails on a missing or unparseable value; lenient mode
    /// substitutes NaN and logs a warning.
    pub fn read_value_record(
        &mut self,
        column: usize,
        strict: bool,
    ) -> Result<Option<BedEntry<f64>>> {
        let Some(record) = self.read_record()? else {
            return Ok(None);
        };
        if strict {
            column_value(record, column, self.line_number).map(Some)
        } else {
            Ok(Some(lenient_column_value(record, column)))
        }
    }

    /// Get an iterator over all records.
    pub fn records(self) -> BedRecordIter<R> {
        BedRecordIter { reader: self }
    }

    /// Get an iterator over `(coordinates, value)` records.
    pub fn values(self, column: usize, strict: bool) -> BedValueIter<R> {
        BedValueIter {
            reader: self,
            column,
            strict,
        }
    }
}

fn parse_line(line: &str, line_number: usize) -> Result<FlatBedEntry> {
    let bytes = line.as_bytes();
    let Some((chrom, start, end, rest_start)) = parse_bed3_bytes_with_rest(bytes) else {
        let columns = bytes.split(|&b| b == b'\t').count();
        let message = if columns < 3 {
            format!("Expected at least 3 fields, got {}", columns)
        } else {
            format!("Invalid coordinates in '{}'", line)
        };
        return Err(BedError::Parse {
            line: line_number,
            message,
        });
    };

    if start > end {
        return Err(BedError::Parse {
            line: line_number,
            message: format!("Start ({}) > end ({})", start, end),
        });
    }

    // The line came from a &str and we only split on ASCII tabs.
    let chrom = String::from_utf8_lossy(chrom).into_owned();
    let fields = extra_fields(bytes, rest_start)
        .map(|f| String::from_utf8_lossy(f).into_owned())
        .collect();

    Ok(BedEntry::new(chrom, start, end, fields))
}

fn column_value(record: FlatBedEntry, column: usize, line: usize) -> Result<BedEntry<f64>> {
    let value = match record.fields.get(column) {
        Some(raw) => raw.trim().parse::<f64>().map_err(|_| BedError::Parse {
            line,
            message: format!("Invalid value '{}' in column {}", raw, column + 4),
        })?,
        None => {
            return Err(BedError::Parse {
                line,
                message: format!(
                    "Missing value column {}; record has {} columns",
                    column + 4,
                    record.fields.len() + 3
                ),
            })
        }
    };
    Ok(BedEntry::from_chr_span(record.chr_span, value))
}

fn lenient_column_value(record: FlatBedEntry, column: usize) -> BedEntry<f64> {
    let value = match record.fields.get(column) {
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                warn!(
                    "value '{}' at {} not parsed; using NaN",
                    raw, record.chr_span
                );
                f64::NAN
            }
        },
        None => {
            warn!("no value column at {}; using NaN", record.chr_span);
            f64::NAN
        }
    };
    BedEntry::from_chr_span(record.chr_span, value)
}

/// Convert the first extra column to a float, using NaN when it is missing
/// or unparseable.
pub fn flat_to_float(record: FlatBedEntry) -> BedEntry<f64> {
    lenient_column_value(record, 0)
}

/// Iterator over BED records.
pub struct BedRecordIter<R: Read> {
    reader: BedReader<R>,
}

impl<R: Read> Iterator for BedRecordIter<R> {
    type Item = Result<FlatBedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// Iterator over single-value (BedGraph-like) records.
pub struct BedValueIter<R: Read> {
    reader: BedReader<R>,
    column: usize,
    strict: bool,
}

impl<R: Read> Iterator for BedValueIter<R> {
    type Item = Result<BedEntry<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader
            .read_value_record(self.column, self.strict)
            .transpose()
    }
}

/// Parse flat records from a string (useful for testing).
pub fn parse_records(content: &str) -> Result<Vec<FlatBedEntry>> {
    BedReader::new(content.as_bytes()).records().collect()
}

/// Parse BedGraph records (value in the fourth column) from a string.
pub fn parse_bedgraph(content: &str) -> Result<Vec<BedEntry<f64>>> {
    BedReader::new(content.as_bytes()).values(0, true).collect()
}
