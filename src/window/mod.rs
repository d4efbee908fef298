//! Windowing engines over interval records.
//!
//! - [`sorted`]: streaming sliding windows with a bounded record buffer
//! - [`spread`]: per-base spreading, grouped into fixed-count runs
//! - [`binned`]: materialized aligned bins in an ordered map

pub mod binned;
pub mod runs;
pub mod sorted;
pub mod spread;

pub use binned::{bin_windows_implicit, bin_windows_with_chroms, BinnedWindows};
pub use runs::Runs;
pub use sorted::{window_sorted_bed, SortedWindowStats, SortedWindows, Window};
pub use spread::{split_chrs, spread_bed, window_bed, ChromPartition, Spread, WindowBed, WindowBedWeak};
