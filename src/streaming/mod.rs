//! Shared streaming utilities: byte-level BED parsing, sort validation and
//! allocation-free output formatting.

pub mod buffers;
pub mod output;
pub mod parsing;
pub mod validation;

pub use output::BedWriter;
pub use parsing::{parse_bed3_bytes, parse_bed3_bytes_with_rest, parse_u64_fast, should_skip_line};
pub use validation::{check_sorted, CheckSorted, SortValidator};
