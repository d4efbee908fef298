//! Buffer size constants for streaming input and output.

/// Default output buffer size (2 MB).
pub const DEFAULT_OUTPUT_BUFFER: usize = 2 * 1024 * 1024;

/// Default input buffer size (256 KB).
/// Good balance for reading sorted BED files.
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;
