//! Materialized windowing into an ordered map.
//!
//! Windows start at multiples of `step`. Unlike the streaming engines, the
//! input does not have to be sorted; every record lands in every window it
//! overlaps.

use crate::config::WindowConfig;
use crate::interval::{ChrSpan, ChrSpanner, Span};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

pub type BinnedWindows<B> = BTreeMap<ChrSpan, Vec<B>>;

/// First aligned window start that can overlap a record starting at `start`.
///
/// This reaches back past `floor(start / step) * step`: with `size > step`
/// the windows starting before the record's own bin still cover `start`, and
/// the record is placed in those too rather than only from its own bin on.
#[inline]
fn first_overlapping_start(start: u64, config: &WindowConfig) -> u64 {
    let lowest = (start + 1).saturating_sub(config.size());
    lowest.div_ceil(config.step()) * config.step()
}

/// Bin records into windows covering the given chromosome extents.
///
/// Windows exist for every `i = k * step` with `floor(start / step) * step
/// <= i < end` of each extent. Records outside all windows are dropped.
pub fn bin_windows_with_chroms<C, B, IC, IB>(
    chroms: IC,
    records: IB,
    config: WindowConfig,
) -> BinnedWindows<B>
where
    C: ChrSpanner,
    B: ChrSpanner + Clone,
    IC: IntoIterator<Item = C>,
    IB: IntoIterator<Item = B>,
{
    let size = config.size();
    let step = config.step();
    let mut bins: BinnedWindows<B> = BTreeMap::new();

    for chrom in chroms {
        let mut i = (chrom.start() / step) * step;
        while i < chrom.end() {
            bins.insert(ChrSpan::new(chrom.chrom(), i, i + size), Vec::new());
            i += step;
        }
    }

    for record in records {
        let mut i = first_overlapping_start(record.start(), &config);
        while i < record.end() {
            let key = ChrSpan::new(record.chrom(), i, i + size);
            if let Some(window) = bins.get_mut(&key) {
                window.push(record.clone());
            }
            i += step;
        }
    }

    bins
}

/// Bin records, inferring each chromosome's extent as the smallest start and
/// largest end seen on it.
pub fn bin_windows_implicit<B>(records: &[B], config: WindowConfig) -> BinnedWindows<B>
where
    B: ChrSpanner + Clone,
{
    let mut extents: FxHashMap<&str, Span> = FxHashMap::default();
    for record in records {
        extents
            .entry(record.chrom())
            .and_modify(|s| {
                s.start = s.start.min(record.start());
                s.end = s.end.max(record.end());
            })
            .or_insert_with(|| Span::new(record.start(), record.end()));
    }

    let chroms: Vec<ChrSpan> = extents
        .into_iter()
        .map(|(chrom, span)| ChrSpan::new(chrom, span.start, span.end))
        .collect();

    bin_windows_with_chroms(chroms, records.iter().cloned(), config)
}
