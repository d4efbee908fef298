//! Sliding-window engine over sorted interval records.
//!
//! Input must be sorted by chromosome, then start, then end. The engine only
//! ever moves forward: records are pushed onto a ring-buffer deque as they
//! arrive and popped from its front once no later window can reach them.
//!
//! # Memory Complexity
//!
//! O(k) where k = maximum number of records buffered between two window
//! emissions (roughly the records overlapping one window plus one step).

use crate::config::WindowConfig;
use crate::deque::RingDeque;
use crate::interval::{BedEntry, ChrSpan, ChrSpanner};
use tracing::{debug, trace};

/// A window together with the records overlapping it.
pub type Window<B> = BedEntry<Vec<B>>;

/// True when `win` no longer contains `next`: other chromosome, or `next`
/// starts at or after the window end.
#[inline]
pub fn should_update_win<C: ChrSpanner + ?Sized>(win: &ChrSpan, next: &C) -> bool {
    win.chrom != next.chrom() || win.end() <= next.start()
}

/// Advance `win` towards `chrom`: restart at 0 on a new chromosome,
/// otherwise slide by `step`.
#[inline]
pub fn update_win(win: &ChrSpan, chrom: &str, config: &WindowConfig) -> ChrSpan {
    let start = if win.chrom != chrom {
        0
    } else {
        win.start() + config.step()
    };
    ChrSpan::new(chrom, start, start + config.size())
}

/// Streaming window iterator over a sorted, fallible record stream.
///
/// Emits every window from position 0 of each chromosome up to the window
/// holding that chromosome's last record, including windows with no
/// records. An upstream error is forwarded once and ends the stream.
pub struct SortedWindows<I, B> {
    input: I,
    config: WindowConfig,
    /// Current window; `None` until the first record arrives.
    win: Option<ChrSpan>,
    buffered: RingDeque<B>,
    /// Record that forced the last emission, not yet pushed.
    pending: Option<B>,
    done: bool,
    stats: SortedWindowStats,
}

impl<I, B> SortedWindows<I, B> {
    pub fn new<T, E>(input: T, config: WindowConfig) -> Self
    where
        T: IntoIterator<IntoIter = I, Item = Result<B, E>>,
    {
        if config.is_gapped() {
            debug!(
                "gapped windows: step {} > size {}, positions between windows are skipped",
                config.step(),
                config.size()
            );
        }
        Self {
            input: input.into_iter(),
            config,
            win: None,
            buffered: RingDeque::new(),
            pending: None,
            done: false,
            stats: SortedWindowStats::default(),
        }
    }

    /// Statistics accumulated so far.
    pub fn stats(&self) -> &SortedWindowStats {
        &self.stats
    }

    fn push(&mut self, record: B) {
        self.buffered.push_back(record);
        self.stats.max_buffered = self.stats.max_buffered.max(self.buffered.len());
    }

    fn abort(&mut self) {
        self.done = true;
        self.win = None;
        self.pending = None;
        self.buffered.clear();
    }
}

impl<I, B> SortedWindows<I, B>
where
    B: ChrSpanner + Clone,
{
    /// Evict records left of `win`, then collect the buffered records that
    /// overlap it.
    fn emit(&mut self, win: ChrSpan) -> Window<B> {
        let evicted = self.buffered.pop_front_while(|r| win.is_past(r));
        // Front eviction is monotone only for equal-length records; a long
        // record at the front can shelter shorter ones that already ended.
        let fields: Vec<B> = self
            .buffered
            .iter()
            .filter(|r| win.overlaps(*r))
            .cloned()
            .collect();
        trace!(
            "window {} holds {} records ({} evicted, {} buffered)",
            win,
            fields.len(),
            evicted,
            self.buffered.len()
        );
        self.stats.windows += 1;
        BedEntry::from_chr_span(win, fields)
    }
}

impl<I, B, E> Iterator for SortedWindows<I, B>
where
    I: Iterator<Item = Result<B, E>>,
    B: ChrSpanner + Clone,
{
    type Item = Result<Window<B>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let record = match self.pending.take() {
                Some(r) => r,
                None => match self.input.next() {
                    Some(Ok(r)) => {
                        self.stats.records += 1;
                        r
                    }
                    Some(Err(e)) => {
                        self.abort();
                        return Some(Err(e));
                    }
                    None => {
                        self.done = true;
                        let last = self.win.take()?;
                        let out = self.emit(last);
                        self.buffered.clear();
                        return Some(Ok(out));
                    }
                },
            };

            let advance = match &self.win {
                None => true,
                Some(win) => should_update_win(win, &record),
            };
            if !advance {
                self.push(record);
                continue;
            }

            match self.win.take() {
                None => {
                    debug!("first window on {}", record.chrom());
                    self.win = Some(ChrSpan::new(record.chrom(), 0, self.config.size()));
                    self.pending = Some(record);
                }
                Some(win) => {
                    let next = update_win(&win, record.chrom(), &self.config);
                    if next.chrom != win.chrom {
                        debug!("chromosome {} -> {}", win.chrom, next.chrom);
                    }
                    self.win = Some(next);
                    self.pending = Some(record);
                    return Some(Ok(self.emit(win)));
                }
            }
        }
    }
}

/// Window a sorted record stream with the eviction-based engine.
pub fn window_sorted_bed<T, B, E>(input: T, config: WindowConfig) -> SortedWindows<T::IntoIter, B>
where
    T: IntoIterator<Item = Result<B, E>>,
    B: ChrSpanner + Clone,
{
    SortedWindows::new(input, config)
}

/// Statistics from a sorted-window run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortedWindowStats {
    pub records: usize,
    pub windows: usize,
    pub max_buffered: usize,
}

impl std::fmt::Display for SortedWindowStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Records: {}, Windows: {}, Max buffered: {}",
            self.records, self.windows, self.max_buffered
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::convert::Infallible;

    type Rec = BedEntry<usize>;

    fn ok_stream(records: &[Rec]) -> Vec<Result<Rec, Infallible>> {
        records.iter().cloned().map(Ok).collect()
    }

    fn run(records: &[Rec], size: u64, step: u64) -> Vec<Window<Rec>> {
        let cfg = WindowConfig::new(size, step).unwrap();
        SortedWindows::new(ok_stream(records), cfg)
            .map(|w| w.unwrap())
            .collect()
    }

    /// Direct recomputation: every window from 0 up to the first window
    /// ending past the chromosome's last start, with all overlapping records.
    fn brute_force(records: &[Rec], size: u64, step: u64) -> Vec<Window<Rec>> {
        let mut chroms: Vec<&str> = Vec::new();
        for r in records {
            if chroms.last() != Some(&r.chrom()) {
                chroms.push(r.chrom());
            }
        }
        let mut out = Vec::new();
        for chrom in chroms {
            let on_chrom: Vec<&Rec> = records.iter().filter(|r| r.chrom() == chrom).collect();
            let last_start = on_chrom.iter().map(|r| r.start()).max().unwrap();
            let mut start = 0;
            loop {
                let win = ChrSpan::new(chrom, start, start + size);
                let fields = on_chrom
                    .iter()
                    .filter(|r| r.end() > win.start() && r.start() < win.end())
                    .map(|r| (*r).clone())
                    .collect();
                out.push(BedEntry::from_chr_span(win, fields));
                if start + size > last_start {
                    break;
                }
                start += step;
            }
        }
        out
    }

    fn unit_records(chrom: &str, n: u64) -> Vec<Rec> {
        (0..n)
            .map(|i| BedEntry::new(chrom, i, i + 1, i as usize))
            .collect()
    }

    #[test]
    fn test_single_window() {
        let records = vec![
            BedEntry::new("chr1", 1, 3, 0),
            BedEntry::new("chr1", 2, 4, 1),
        ];
        let wins = run(&records, 10, 10);
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0].chr_span, ChrSpan::new("chr1", 0, 10));
        assert_eq!(wins[0].fields.len(), 2);
    }

    #[test]
    fn test_overlapping_windows_share_records() {
        let records = vec![BedEntry::new("chr1", 4, 6, 0), BedEntry::new("chr1", 9, 10, 1)];
        let wins = run(&records, 5, 2);
        let spans: Vec<(u64, u64)> = wins.iter().map(|w| (w.start(), w.end())).collect();
        assert_eq!(spans, vec![(0, 5), (2, 7), (4, 9), (6, 11)]);
        // [4,6) overlaps the first three windows and is evicted before the last.
        let ids: Vec<Vec<usize>> = wins
            .iter()
            .map(|w| w.fields.iter().map(|r| r.fields).collect())
            .collect();
        assert_eq!(ids, vec![vec![0], vec![0], vec![0], vec![1]]);
    }

    #[test]
    fn test_stream_ends_at_window_holding_last_record() {
        let records = vec![BedEntry::new("chr1", 4, 6, 0)];
        let wins = run(&records, 5, 2);
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0].chr_span, ChrSpan::new("chr1", 0, 5));
    }

    #[test]
    fn test_empty_windows_are_emitted() {
        let records = vec![
            BedEntry::new("chr1", 0, 1, 0),
            BedEntry::new("chr1", 35, 36, 1),
        ];
        let wins = run(&records, 10, 10);
        let counts: Vec<usize> = wins.iter().map(|w| w.fields.len()).collect();
        assert_eq!(counts, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_gapped_windows_skip_uncovered_records() {
        let records = vec![
            BedEntry::new("chr1", 0, 1, 0),
            BedEntry::new("chr1", 3, 4, 1), // falls in the gap [2,5)
            BedEntry::new("chr1", 5, 6, 2),
        ];
        let wins = run(&records, 2, 5);
        assert_eq!(wins.len(), 2);
        assert_eq!(wins[0].chr_span, ChrSpan::new("chr1", 0, 2));
        assert_eq!(wins[1].chr_span, ChrSpan::new("chr1", 5, 7));
        assert_eq!(wins[0].fields[0].fields, 0);
        assert_eq!(wins[1].fields.len(), 1);
        assert_eq!(wins[1].fields[0].fields, 2);
    }

    #[test]
    fn test_chromosome_boundary_resets_start() {
        let records = vec![
            BedEntry::new("chr1", 50, 60, 0),
            BedEntry::new("chr2", 5, 8, 1),
        ];
        let wins = run(&records, 20, 20);
        let spans: Vec<String> = wins.iter().map(|w| w.chr_span.to_string()).collect();
        assert_eq!(
            spans,
            vec!["chr1\t0\t20", "chr1\t20\t40", "chr1\t40\t60", "chr2\t0\t20"]
        );
        for w in &wins {
            assert!(w.fields.iter().all(|r| r.chrom() == w.chrom()));
        }
    }

    #[test]
    fn test_nested_records_not_attributed_after_end() {
        // A long record in front must not drag a short finished one along.
        let records = vec![
            BedEntry::new("chr1", 0, 100, 0),
            BedEntry::new("chr1", 1, 2, 1),
            BedEntry::new("chr1", 55, 56, 2),
        ];
        let wins = run(&records, 10, 10);
        let last = wins.last().unwrap();
        assert_eq!(last.chr_span, ChrSpan::new("chr1", 50, 60));
        let ids: Vec<usize> = last.fields.iter().map(|r| r.fields).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_zero_length_records() {
        let records = vec![
            BedEntry::new("chr1", 0, 0, 0), // touches no window
            BedEntry::new("chr1", 3, 3, 1),
        ];
        let wins = run(&records, 5, 5);
        assert_eq!(wins.len(), 1);
        let ids: Vec<usize> = wins[0].fields.iter().map(|r| r.fields).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_empty_input() {
        assert!(run(&[], 5, 1).is_empty());
    }

    #[test]
    fn test_error_is_forwarded_and_stops() {
        let input: Vec<Result<Rec, String>> = vec![
            Ok(BedEntry::new("chr1", 0, 1, 0)),
            Ok(BedEntry::new("chr1", 12, 13, 1)),
            Err("bad line".to_string()),
            Ok(BedEntry::new("chr1", 40, 41, 2)),
        ];
        let cfg = WindowConfig::new(10, 10).unwrap();
        let out: Vec<Result<Window<Rec>, String>> = SortedWindows::new(input, cfg).collect();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].as_ref().unwrap().chr_span, ChrSpan::new("chr1", 0, 10));
        // The partially filled [10,20) window is discarded.
        assert_eq!(out[1].as_ref().unwrap_err(), "bad line");
    }

    #[test]
    fn test_unit_coverage_matches_brute_force() {
        for (size, step) in [(1, 1), (5, 2), (5, 5), (7, 3), (10, 1), (4, 4)] {
            let records = unit_records("chr1", 50);
            assert_eq!(
                run(&records, size, step),
                brute_force(&records, size, step),
                "size {} step {}",
                size,
                step
            );
        }
    }

    #[test]
    fn test_each_position_in_expected_number_of_windows() {
        let (size, step) = (6u64, 2u64);
        let records = unit_records("chr1", 40);
        let wins = run(&records, size, step);
        for pos in (size as usize)..30 {
            let hits = wins
                .iter()
                .filter(|w| w.fields.iter().any(|r| r.fields == pos))
                .count();
            assert_eq!(hits as u64, size / step, "position {}", pos);
        }
    }

    #[test]
    fn test_random_records_match_brute_force() {
        for seed in 0..50u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut records = Vec::new();
            for chrom in ["chr1", "chr2", "chrX"] {
                if rng.gen_bool(0.2) {
                    continue;
                }
                for _ in 0..rng.gen_range(1..40) {
                    let start = rng.gen_range(0..200u64);
                    let len = match rng.gen_range(0..10) {
                        0 => 0,
                        1 => rng.gen_range(30..120),
                        _ => rng.gen_range(1..8),
                    };
                    records.push(BedEntry::new(chrom, start, start + len, 0));
                }
            }
            records.sort_by(|a, b| a.chr_span.cmp(&b.chr_span));
            for (i, r) in records.iter_mut().enumerate() {
                r.fields = i;
            }

            let size = rng.gen_range(1..30);
            let step = rng.gen_range(1..40);
            assert_eq!(
                run(&records, size, step),
                brute_force(&records, size, step),
                "seed {} size {} step {}",
                seed,
                size,
                step
            );
        }
    }

    #[test]
    fn test_windows_non_decreasing() {
        let mut records = unit_records("chr1", 30);
        records.extend(unit_records("chr2", 30));
        let wins = run(&records, 8, 3);
        for pair in wins.windows(2) {
            assert!(pair[0].chr_span <= pair[1].chr_span);
        }
    }

    #[test]
    fn test_buffer_stays_bounded() {
        let records = unit_records("chr1", 10_000);
        let cfg = WindowConfig::new(10, 5).unwrap();
        let mut wins = SortedWindows::new(ok_stream(&records), cfg);
        let count = wins.by_ref().count();
        let stats = wins.stats();
        assert_eq!(count, stats.windows);
        assert_eq!(stats.records, 10_000);
        assert!(stats.max_buffered <= 15, "max buffered {}", stats.max_buffered);
    }

    #[test]
    fn test_stops_early_when_dropped() {
        let records = unit_records("chr1", 1000);
        let cfg = WindowConfig::new(10, 10).unwrap();
        let mut wins = SortedWindows::new(ok_stream(&records), cfg);
        let first: Vec<_> = wins.by_ref().take(2).collect();
        assert_eq!(first.len(), 2);
        // Only the records needed to close two windows were pulled.
        assert_eq!(wins.stats().records, 21);
    }
}
