//! Command implementations for fastats.

pub mod autocorr;
pub mod mean_win;
pub mod sort;
pub mod win_avg;
pub mod win_sum;

pub use autocorr::{AutoCorrCommand, AutoCorrStats, AutoCorrelationWindows};
pub use mean_win::{mean_bed_per_bp, MeanWinCommand, MeanWindowCounts};
pub use sort::{sort_records, sorted_bed, SortCommand, SortStats, SortedBed};
pub use win_avg::{WinAvg, WinAvgCommand};
pub use win_sum::{WinSum, WinSumCommand};

use crate::bed::BedError;
use crate::interval::ChrSpanner;
use crate::streaming::validation::CheckSorted;

/// Record stream handed to a window engine: either validated inline
/// (input claimed sorted) or sorted in memory.
pub enum WindowInput<I, B> {
    Checked(CheckSorted<I>),
    Sorted(SortedBed<B, BedError>),
}

impl<I, B> Iterator for WindowInput<I, B>
where
    I: Iterator<Item = Result<B, BedError>>,
    B: ChrSpanner,
{
    type Item = Result<B, BedError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            WindowInput::Checked(it) => it.next(),
            WindowInput::Sorted(it) => it.next(),
        }
    }
}

/// Prepare a record stream for windowing.
///
/// With `presorted` the records stream through with inline sort
/// validation; otherwise the whole input is sorted in memory first.
pub fn window_input<S, B>(records: S, presorted: bool) -> WindowInput<S::IntoIter, B>
where
    S: IntoIterator<Item = Result<B, BedError>>,
    B: ChrSpanner,
{
    if presorted {
        WindowInput::Checked(CheckSorted::new(records))
    } else {
        WindowInput::Sorted(sorted_bed(records))
    }
}
