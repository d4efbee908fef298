//! Sort helper and command.
//!
//! Sort order (matches `LC_ALL=C sort -k1,1 -k2,2n -k3,3n`):
//! 1. Primary: chromosome (lexicographic)
//! 2. Secondary: start coordinate (ascending, numeric)
//! 3. Tertiary: end coordinate (ascending, numeric)
//! 4. Ties: input order preserved (stable sort)

use crate::bed::{BedError, BedReader};
use crate::interval::{cmp_chr_span, ChrSpanner};
use crate::streaming::BedWriter;
use std::io::{Read, Write};
use tracing::debug;

/// Stable in-place sort by chromosome, start, end.
pub fn sort_records<B: ChrSpanner>(records: &mut [B]) {
    records.sort_by(cmp_chr_span);
}

/// Fully materialized, sorted record stream.
///
/// Produced by [`sorted_bed`]. If the upstream failed, the error is the
/// only item.
pub struct SortedBed<B, E> {
    records: std::vec::IntoIter<B>,
    error: Option<E>,
}

impl<B, E> Iterator for SortedBed<B, E> {
    type Item = Result<B, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.error.take() {
            return Some(Err(e));
        }
        self.records.next().map(Ok)
    }
}

/// Consume a whole stream, stopping at the first error, and re-yield the
/// records in sorted order.
pub fn sorted_bed<S, B, E>(input: S) -> SortedBed<B, E>
where
    S: IntoIterator<Item = Result<B, E>>,
    B: ChrSpanner,
{
    match input.into_iter().collect::<Result<Vec<B>, E>>() {
        Ok(mut records) => {
            sort_records(&mut records);
            debug!("sorted {} records in memory", records.len());
            SortedBed {
                records: records.into_iter(),
                error: None,
            }
        }
        Err(e) => SortedBed {
            records: Vec::new().into_iter(),
            error: Some(e),
        },
    }
}

/// Sort command configuration.
#[derive(Debug, Clone, Default)]
pub struct SortCommand {
    /// Reverse the sort order
    pub reverse: bool,
}

impl SortCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort records, stable for ties.
    pub fn sort<B: ChrSpanner>(&self, mut records: Vec<B>) -> Vec<B> {
        sort_records(&mut records);
        if self.reverse {
            records.reverse();
        }
        records
    }

    /// Read all records, sort them and write them back with their extra columns.
    pub fn run<R: Read, W: Write>(
        &self,
        reader: BedReader<R>,
        output: &mut W,
    ) -> Result<SortStats, BedError> {
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        let mut stats = SortStats {
            records: records.len(),
            ..Default::default()
        };

        let sorted = self.sort(records);
        stats.chromosomes = count_chrom_blocks(&sorted);

        let mut writer = BedWriter::new(output);
        for record in &sorted {
            writer.write_fields(record)?;
        }
        writer.flush()?;
        Ok(stats)
    }
}

fn count_chrom_blocks<B: ChrSpanner>(records: &[B]) -> usize {
    if records.is_empty() {
        return 0;
    }
    1 + records
        .windows(2)
        .filter(|w| w[0].chrom() != w[1].chrom())
        .count()
}

/// Statistics from a sort run.
#[derive(Debug, Default, Clone)]
pub struct SortStats {
    pub records: usize,
    pub chromosomes: usize,
}

impl std::fmt::Display for SortStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Records: {}, Chromosomes: {}",
            self.records, self.chromosomes
        )
    }
}
