//! Window configuration shared by every windowing command.

use crate::bed::BedError;

/// Default window size and step (one base pair), matching the CLI defaults.
pub const DEFAULT_WINDOW_SIZE: u64 = 1;
pub const DEFAULT_WINDOW_STEP: u64 = 1;

/// Validated window geometry.
///
/// Size and step are both positive. `step > size` is allowed and produces
/// gapped windows; `step < size` produces overlapping windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    size: u64,
    step: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
            step: DEFAULT_WINDOW_STEP,
        }
    }
}

impl WindowConfig {
    /// Create a window configuration, rejecting a zero size or step.
    ///
    /// # Example
    ///
    /// ```
    /// use fastats::config::WindowConfig;
    ///
    /// let cfg = WindowConfig::new(5, 2).unwrap();
    /// assert_eq!(cfg.size(), 5);
    /// assert!(WindowConfig::new(0, 1).is_err());
    /// ```
    pub fn new(size: u64, step: u64) -> Result<Self, BedError> {
        if size == 0 {
            return Err(BedError::InvalidFormat(
                "window size must be positive".to_string(),
            ));
        }
        if step == 0 {
            return Err(BedError::InvalidFormat(
                "window step must be positive".to_string(),
            ));
        }
        Ok(Self { size, step })
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// True when consecutive windows leave uncovered positions between them.
    #[inline]
    pub fn is_gapped(&self) -> bool {
        self.step > self.size
    }
}
