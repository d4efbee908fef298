//! Mean-per-bp windows over a BedGraph-like signal.
//!
//! For every window the finite values of the overlapping records are summed
//! and divided by the summed span length of those same records. Records
//! whose value is NaN or infinite contribute to neither side, so a window
//! with no finite records reports NaN.
//!
//! # Memory Complexity
//!
//! O(k) with `--sorted`, where k = records buffered by the window engine.
//! Without it the whole input is sorted in memory first.

use super::window_input;
use crate::bed::{BedError, BedReader};
use crate::config::WindowConfig;
use crate::interval::{BedEnter, BedEntry};
use crate::stats::is_nan_or_inf;
use crate::streaming::BedWriter;
use crate::window::sorted::{SortedWindowStats, SortedWindows};
use std::io::{Read, Write};

/// Sum of finite values divided by the summed length of their records.
pub fn mean_bed_per_bp<B: BedEnter<Fields = f64>>(bed: &[B]) -> f64 {
    let mut sum = 0.0;
    let mut bp = 0.0;
    for b in bed {
        let v = *b.fields();
        if !is_nan_or_inf(v) {
            sum += v;
            bp += (b.end() - b.start()) as f64;
        }
    }
    sum / bp
}

/// Mean-per-bp of every window produced by the sorted window engine.
pub struct MeanWindowCounts<I, B> {
    windows: SortedWindows<I, B>,
}

impl<I, B> MeanWindowCounts<I, B> {
    pub fn new<T, E>(input: T, config: WindowConfig) -> Self
    where
        T: IntoIterator<IntoIter = I, Item = Result<B, E>>,
    {
        Self {
            windows: SortedWindows::new(input, config),
        }
    }

    pub fn stats(&self) -> &SortedWindowStats {
        self.windows.stats()
    }
}

impl<I, B, E> Iterator for MeanWindowCounts<I, B>
where
    I: Iterator<Item = Result<B, E>>,
    B: BedEnter<Fields = f64> + Clone,
{
    type Item = Result<BedEntry<f64>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let win = match self.windows.next()? {
            Ok(win) => win,
            Err(e) => return Some(Err(e)),
        };
        let value = mean_bed_per_bp(&win.fields);
        Some(Ok(BedEntry::from_chr_span(win.chr_span, value)))
    }
}

/// Mean-per-bp window command configuration.
#[derive(Debug, Clone, Default)]
pub struct MeanWinCommand {
    pub config: WindowConfig,
    /// Input already sorted; validate inline instead of sorting in memory
    pub sorted: bool,
}

impl MeanWinCommand {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            sorted: false,
        }
    }

    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Window the first value column and write one line per window.
    ///
    /// Missing or unparseable values become NaN with a warning.
    pub fn run<R: Read, W: Write>(
        &self,
        reader: BedReader<R>,
        output: &mut W,
    ) -> Result<SortedWindowStats, BedError> {
        let input = window_input(reader.values(0, false), self.sorted);
        let mut wins = MeanWindowCounts::new(input, self.config);
        let mut writer = BedWriter::new(output);

        for win in wins.by_ref() {
            writer.write_entry(&win?)?;
        }
        writer.flush()?;
        Ok(wins.stats().clone())
    }
}
