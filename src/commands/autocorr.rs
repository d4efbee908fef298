//! Lag autocorrelation over per-base spread windows.
//!
//! Records are spread to one value per base pair, windowed per chromosome
//! and each window is reduced to the Pearson autocorrelation coefficients of
//! its finite values at lags `1..=lags`, written tab-separated in lag order.
//!
//! # Memory Complexity
//!
//! O(n): the spreading windower partitions the whole input by chromosome.

use super::window_input;
use crate::bed::{BedError, BedReader};
use crate::config::WindowConfig;
use crate::interval::{BedEnter, BedEntry};
use crate::stats::{autocorrelations, no_nans};
use crate::streaming::BedWriter;
use crate::window::spread::WindowBed;
use std::io::{Read, Write};

/// Default lag, window size and step of the autocorrelation command.
pub const DEFAULT_LAG: usize = 1;
pub const DEFAULT_AUTOCORR_SIZE: u64 = 10;
pub const DEFAULT_AUTOCORR_STEP: u64 = 1;

/// Autocorrelation coefficients at lags `1..=lags` for every non-empty
/// spread window.
pub struct AutoCorrelationWindows<I, B: BedEnter> {
    windows: WindowBed<I, B>,
    lags: usize,
    stats: AutoCorrStats,
}

impl<I, B: BedEnter> AutoCorrelationWindows<I, B> {
    pub fn new<T, E>(input: T, lags: usize, config: WindowConfig) -> Self
    where
        T: IntoIterator<IntoIter = I, Item = Result<B, E>>,
    {
        Self {
            windows: WindowBed::new(input, config),
            lags,
            stats: AutoCorrStats::default(),
        }
    }

    pub fn stats(&self) -> &AutoCorrStats {
        &self.stats
    }
}

impl<I, B, E> Iterator for AutoCorrelationWindows<I, B>
where
    I: Iterator<Item = Result<B, E>>,
    B: BedEnter<Fields = f64>,
{
    type Item = Result<BedEntry<Vec<f64>>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let win = match self.windows.next()? {
                Ok(win) => win,
                Err(e) => return Some(Err(e)),
            };
            if win.fields.is_empty() {
                self.stats.skipped += 1;
                continue;
            }
            let corrs = autocorrelations(&no_nans(&win.fields), self.lags);
            if corrs.iter().any(|c| c.is_nan()) {
                self.stats.undefined += 1;
            }
            self.stats.windows += 1;
            return Some(Ok(BedEntry::from_chr_span(win.chr_span, corrs)));
        }
    }
}

/// Autocorrelation command configuration.
#[derive(Debug, Clone)]
pub struct AutoCorrCommand {
    pub config: WindowConfig,
    /// Highest lag; one coefficient is written per lag from 1
    pub lag: usize,
    /// Value column, counted from the first column after `end`
    pub column: usize,
    /// Input already sorted; validate inline instead of sorting in memory
    pub sorted: bool,
}

impl Default for AutoCorrCommand {
    fn default() -> Self {
        Self {
            config: WindowConfig::new(DEFAULT_AUTOCORR_SIZE, DEFAULT_AUTOCORR_STEP)
                .unwrap_or_default(),
            lag: DEFAULT_LAG,
            column: 0,
            sorted: false,
        }
    }
}

impl AutoCorrCommand {
    pub fn new(config: WindowConfig, lag: usize) -> Self {
        Self {
            config,
            lag,
            ..Default::default()
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Correlate the chosen value column and write one line per window.
    pub fn run<R: Read, W: Write>(
        &self,
        reader: BedReader<R>,
        output: &mut W,
    ) -> Result<AutoCorrStats, BedError> {
        let input = window_input(reader.values(self.column, true), self.sorted);
        let mut wins = AutoCorrelationWindows::new(input, self.lag, self.config);
        let mut writer = BedWriter::new(output);

        for win in wins.by_ref() {
            let win = win?;
            writer.write_values(&win, &win.fields)?;
        }
        writer.flush()?;
        Ok(wins.stats().clone())
    }
}

/// Statistics from an autocorrelation run.
#[derive(Debug, Default, Clone)]
pub struct AutoCorrStats {
    /// Windows written
    pub windows: usize,
    /// Windows without records, not written
    pub skipped: usize,
    /// Written windows with at least one NaN coefficient
    pub undefined: usize,
}

impl std::fmt::Display for AutoCorrStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Windows: {}, Skipped: {}, Undefined: {}",
            self.windows, self.skipped, self.undefined
        )
    }
}
