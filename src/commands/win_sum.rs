//! Window sums, optionally normalized by window length.

use super::window_input;
use crate::bed::{BedError, BedReader};
use crate::config::WindowConfig;
use crate::interval::{BedEnter, BedEntry};
use crate::stats::sum;
use crate::streaming::BedWriter;
use crate::window::sorted::{SortedWindowStats, SortedWindows};
use std::io::{Read, Write};

/// Window sums over the sorted window engine.
///
/// Empty windows yield NaN. With `per_bp` the sum is divided by the
/// window length (the configured size), not by the covered bases.
pub struct WinSum<I, B> {
    windows: SortedWindows<I, B>,
    per_bp: bool,
}

impl<I, B> WinSum<I, B> {
    pub fn new<T, E>(input: T, config: WindowConfig, per_bp: bool) -> Self
    where
        T: IntoIterator<IntoIter = I, Item = Result<B, E>>,
    {
        Self {
            windows: SortedWindows::new(input, config),
            per_bp,
        }
    }

    pub fn stats(&self) -> &SortedWindowStats {
        self.windows.stats()
    }
}

impl<I, B, E> Iterator for WinSum<I, B>
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
        let vals: Vec<f64> = win.fields.iter().map(|b| *b.fields()).collect();
        let mut total = sum(&vals).unwrap_or(f64::NAN);
        if self.per_bp {
            total /= win.chr_span.len() as f64;
        }
        Some(Ok(BedEntry::from_chr_span(win.chr_span, total)))
    }
}

/// Window sum command configuration.
#[derive(Debug, Clone, Default)]
pub struct WinSumCommand {
    pub config: WindowConfig,
    /// Divide each sum by the window length
    pub per_bp: bool,
    /// Input already sorted; validate inline instead of sorting in memory
    pub sorted: bool,
}

impl WinSumCommand {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            per_bp: false,
            sorted: false,
        }
    }

    pub fn with_per_bp(mut self, per_bp: bool) -> Self {
        self.per_bp = per_bp;
        self
    }

    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Sum the BedGraph value column per window.
    pub fn run<R: Read, W: Write>(
        &self,
        reader: BedReader<R>,
        output: &mut W,
    ) -> Result<SortedWindowStats, BedError> {
        let input = window_input(reader.values(0, true), self.sorted);
        let mut wins = WinSum::new(input, self.config, self.per_bp);
        let mut writer = BedWriter::new(output);

        for win in wins.by_ref() {
            writer.write_entry(&win?)?;
        }
        writer.flush()?;
        Ok(wins.stats().clone())
    }
}
