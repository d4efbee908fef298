// Clippy allows for the whole crate
#![allow(clippy::type_complexity)]

//! fastats: streaming window statistics over sorted genomic intervals.
//!
//! # Features
//!
//! - **Streaming windows**: sliding, tumbling and gapped windows over sorted
//!   BED/BedGraph input with a bounded ring-buffer of in-flight records
//! - **Per-base windows**: records spread to single base pairs and grouped
//!   into fixed-count runs
//! - **Window statistics**: mean-per-bp, mean, sum and lag autocorrelation
//!
//! # Example
//!
//! ```rust
//! use fastats::bed::parse_bedgraph;
//! use fastats::commands::MeanWindowCounts;
//! use fastats::config::WindowConfig;
//!
//! let records = parse_bedgraph("chr1\t0\t2\t2.0\nchr1\t5\t6\t4.0\n").unwrap();
//! let config = WindowConfig::new(5, 5).unwrap();
//! let wins: Vec<_> = MeanWindowCounts::new(records.into_iter().map(Ok::<_, ()>), config)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(wins.len(), 2);
//! assert_eq!(wins[0].fields, 1.0);
//! ```

pub mod bed;
pub mod commands;
pub mod config;
pub mod deque;
pub mod interval;
pub mod stats;
pub mod streaming;
pub mod window;

// Re-export commonly used types
pub use bed::{BedError, BedReader};
pub use config::WindowConfig;
pub use deque::RingDeque;
pub use interval::{BedEnter, BedEntry, ChrSpan, ChrSpanner, Span};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bed::{BedError, BedReader};
    pub use crate::commands::{
        AutoCorrCommand, MeanWinCommand, SortCommand, WinAvgCommand, WinSumCommand,
    };
    pub use crate::config::WindowConfig;
    pub use crate::interval::{BedEnter, BedEntry, ChrSpan, ChrSpanner};
    pub use crate::window::{window_bed, window_sorted_bed};
}
