//! Sort validation for streaming operations.
//!
//! The window engines only move forward, so they need input where:
//! 1. All records for a chromosome are contiguous (no interleaving)
//! 2. Within a chromosome, start positions are non-decreasing
//! 3. Records sharing a start have non-decreasing ends
//!
//! Any consistent chromosome order is accepted.

use crate::bed::BedError;
use crate::interval::ChrSpanner;
use rustc_hash::FxHashSet;

/// Inline sort validator for use within streaming loops.
#[derive(Debug, Default)]
pub struct SortValidator {
    prev_chrom: Option<String>,
    prev_start: u64,
    prev_end: u64,
    seen_chroms: FxHashSet<String>,
    record_count: usize,
}

impl SortValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that the given record maintains sort order.
    #[inline]
    pub fn validate(&mut self, chrom: &str, start: u64, end: u64) -> Result<(), BedError> {
        self.record_count += 1;

        match &self.prev_chrom {
            Some(pc) if pc == chrom => {
                if start < self.prev_start {
                    return Err(BedError::InvalidFormat(format!(
                        "File not sorted: position {} at record {} comes after {} on {}",
                        start, self.record_count, self.prev_start, chrom
                    )));
                }
                if start == self.prev_start && end < self.prev_end {
                    return Err(BedError::InvalidFormat(format!(
                        "File not sorted: end {} at record {} comes after {} at {}:{}",
                        end, self.record_count, self.prev_end, chrom, start
                    )));
                }
                self.prev_start = start;
                self.prev_end = end;
            }
            prev => {
                // Switching chromosomes - check we haven't seen this one before
                if self.seen_chroms.contains(chrom) {
                    return Err(BedError::InvalidFormat(format!(
                        "File not sorted: chromosome '{}' at record {} was seen earlier (chromosomes must be contiguous)",
                        chrom, self.record_count
                    )));
                }
                if let Some(pc) = prev {
                    self.seen_chroms.insert(pc.clone());
                }
                self.prev_chrom = Some(chrom.to_string());
                self.prev_start = start;
                self.prev_end = end;
            }
        }

        Ok(())
    }

    /// Get the number of records validated.
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}

/// Stream adaptor that validates sort order as records pass through.
///
/// The first out-of-order record is replaced by a
/// [`BedError::InvalidFormat`] and the stream ends.
pub struct CheckSorted<I> {
    input: I,
    validator: SortValidator,
    done: bool,
}

impl<I> CheckSorted<I> {
    pub fn new<S>(input: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            input: input.into_iter(),
            validator: SortValidator::new(),
            done: false,
        }
    }

    pub fn record_count(&self) -> usize {
        self.validator.record_count()
    }
}

impl<I, B> Iterator for CheckSorted<I>
where
    I: Iterator<Item = Result<B, BedError>>,
    B: ChrSpanner,
{
    type Item = Result<B, BedError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.input.next() {
            Some(Ok(record)) => match self.validator.validate(record.chrom(), record.start(), record.end()) {
                Ok(()) => Ok(record),
                Err(e) => Err(e),
            },
            Some(Err(e)) => Err(e),
            None => {
                self.done = true;
                return None;
            }
        };
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

/// Wrap a record stream with inline sort validation.
pub fn check_sorted<S, B>(input: S) -> CheckSorted<S::IntoIter>
where
    S: IntoIterator<Item = Result<B, BedError>>,
    B: ChrSpanner,
{
    CheckSorted::new(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::parse_bedgraph;
    use crate::interval::BedEntry;

    fn stream(content: &str) -> Vec<Result<BedEntry<f64>, BedError>> {
        parse_bedgraph(content).unwrap().into_iter().map(Ok).collect()
    }

    #[test]
    fn test_sort_validator() {
        let mut v = SortValidator::new();
        assert!(v.validate("chr1", 100, 150).is_ok());
        assert!(v.validate("chr1", 100, 150).is_ok());
        assert!(v.validate("chr1", 200, 210).is_ok());
        assert!(v.validate("chr2", 50, 60).is_ok());
        assert!(v.validate("chr2", 40, 60).is_err());
        assert_eq!(v.record_count(), 5);
    }

    #[test]
    fn test_sort_validator_ends_at_same_start() {
        let mut v = SortValidator::new();
        assert!(v.validate("chr1", 10, 20).is_ok());
        assert!(v.validate("chr1", 10, 30).is_ok());
        let err = v.validate("chr1", 10, 15).unwrap_err();
        assert!(err.to_string().contains("not sorted"));

        // A smaller end is fine once the start moves on.
        let mut v = SortValidator::new();
        assert!(v.validate("chr1", 10, 30).is_ok());
        assert!(v.validate("chr1", 11, 12).is_ok());
        assert!(v.validate("chr2", 0, 1).is_ok());
    }

    #[test]
    fn test_sort_validator_interleaved_chroms() {
        let mut v = SortValidator::new();
        assert!(v.validate("chr1", 100, 101).is_ok());
        assert!(v.validate("chr2", 100, 101).is_ok());
        let err = v.validate("chr1", 300, 301).unwrap_err();
        assert!(err.to_string().contains("contiguous"));
    }

    #[test]
    fn test_any_consistent_chrom_order() {
        let mut v = SortValidator::new();
        assert!(v.validate("chr2", 0, 1).is_ok());
        assert!(v.validate("chr10", 0, 1).is_ok());
        assert!(v.validate("chr1", 5, 6).is_ok());
    }

    #[test]
    fn test_check_sorted_passes_sorted_input() {
        let input = stream("chr1\t0\t5\t1\nchr1\t3\t8\t2\nchr2\t0\t1\t3\n");
        let out: Vec<_> = check_sorted(input).collect::<Result<_, _>>().unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_check_sorted_stops_at_first_violation() {
        let input = stream("chr1\t10\t15\t1\nchr1\t3\t8\t2\nchr1\t20\t21\t3\n");
        let mut checked = CheckSorted::new(input);
        assert!(checked.next().unwrap().is_ok());
        match checked.next() {
            Some(Err(BedError::InvalidFormat(msg))) => assert!(msg.contains("not sorted")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(checked.next().is_none());
        assert_eq!(checked.record_count(), 2);
    }

    #[test]
    fn test_check_sorted_forwards_upstream_error() {
        let input: Vec<Result<BedEntry<f64>, BedError>> = vec![
            Ok(BedEntry::new("chr1", 0, 1, 1.0)),
            Err(BedError::InvalidFormat("upstream".to_string())),
            Ok(BedEntry::new("chr1", 5, 6, 1.0)),
        ];
        let out: Vec<_> = check_sorted(input).collect();
        assert_eq!(out.len(), 2);
        assert!(out[1].is_err());
    }
}
