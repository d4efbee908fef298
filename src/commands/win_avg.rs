//! Plain arithmetic mean of the values overlapping each window.

use super::window_input;
use crate::bed::{BedError, BedReader};
use crate::config::WindowConfig;
use crate::interval::{BedEnter, BedEntry};
use crate::stats::mean;
use crate::streaming::BedWriter;
use crate::window::sorted::{SortedWindowStats, SortedWindows};
use std::io::{Read, Write};
use tracing::debug;

/// Window means over the sorted window engine. Empty windows yield NaN.
pub struct WinAvg<I, B> {
    windows: SortedWindows<I, B>,
}

impl<I, B> WinAvg<I, B> {
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

impl<I, B, E> Iterator for WinAvg<I, B>
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
        let avg = mean(&vals).unwrap_or_else(|| {
            debug!("no values in window {}", win.chr_span);
            f64::NAN
        });
        Some(Ok(BedEntry::from_chr_span(win.chr_span, avg)))
    }
}

/// Window mean command configuration.
#[derive(Debug, Clone, Default)]
pub struct WinAvgCommand {
    pub config: WindowConfig,
    /// Input already sorted; validate inline instead of sorting in memory
    pub sorted: bool,
}

impl WinAvgCommand {
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

    /// Average the BedGraph value column per window.
    pub fn run<R: Read, W: Write>(
        &self,
        reader: BedReader<R>,
        output: &mut W,
    ) -> Result<SortedWindowStats, BedError> {
        let input = window_input(reader.values(0, true), self.sorted);
        let mut wins = WinAvg::new(input, self.config);
        let mut writer = BedWriter::new(output);

        for win in wins.by_ref() {
            writer.write_entry(&win?)?;
        }
        writer.flush()?;
        Ok(wins.stats().clone())
    }
}
