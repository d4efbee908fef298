//! Per-base spreading and regrouping windower.
//!
//! Every record is expanded into one record per base pair, which makes all
//! records unit-length and strictly ordered. Windows are then plain runs of
//! `size` positions every `step` positions, with no eviction bookkeeping.
//!
//! [`WindowBed`] first partitions the whole input by chromosome, so memory
//! is proportional to the input rather than to one window as with
//! [`SortedWindows`](super::sorted::SortedWindows).

use super::runs::Runs;
use crate::config::WindowConfig;
use crate::interval::{BedEnter, BedEntry, ChrSpan, ChrSpanner};
use rustc_hash::FxHashMap;
use std::convert::Infallible;
use tracing::debug;

/// Expands each record into single-base records carrying a clone of its payload.
pub struct Spread<I, B> {
    input: I,
    current: Option<B>,
    pos: u64,
    done: bool,
}

impl<I, B> Spread<I, B> {
    pub fn new<S, E>(input: S) -> Self
    where
        S: IntoIterator<IntoIter = I, Item = Result<B, E>>,
    {
        Self {
            input: input.into_iter(),
            current: None,
            pos: 0,
            done: false,
        }
    }
}

impl<I, B, E> Iterator for Spread<I, B>
where
    I: Iterator<Item = Result<B, E>>,
    B: BedEnter,
    B::Fields: Clone,
{
    type Item = Result<BedEntry<B::Fields>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some(cur) = &self.current {
                if self.pos < cur.end() {
                    let out = BedEntry::new(cur.chrom(), self.pos, self.pos + 1, cur.fields().clone());
                    self.pos += 1;
                    return Some(Ok(out));
                }
            }
            match self.input.next() {
                Some(Ok(b)) => {
                    self.pos = b.start();
                    self.current = Some(b);
                }
                Some(Err(e)) => {
                    self.done = true;
                    self.current = None;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    self.current = None;
                    return None;
                }
            }
        }
    }
}

/// Spread a record stream to single base pairs.
pub fn spread_bed<S, B, E>(input: S) -> Spread<S::IntoIter, B>
where
    S: IntoIterator<Item = Result<B, E>>,
    B: BedEnter,
    B::Fields: Clone,
{
    Spread::new(input)
}

/// Windows over a stream already restricted to one chromosome.
///
/// Each window spans from its first position's start to its last
/// position's end and carries the per-position payloads in order.
pub struct WindowBedWeak<I, B: BedEnter> {
    runs: Runs<Spread<I, B>, BedEntry<B::Fields>>,
}

impl<I, B: BedEnter> WindowBedWeak<I, B> {
    pub fn new<S, E>(input: S, config: WindowConfig) -> Self
    where
        S: IntoIterator<IntoIter = I, Item = Result<B, E>>,
        I: Iterator<Item = Result<B, E>>,
        B::Fields: Clone,
    {
        Self {
            runs: Runs::new(
                Spread::new(input),
                config.size() as usize,
                config.step() as usize,
            ),
        }
    }
}

impl<I, B, E> Iterator for WindowBedWeak<I, B>
where
    I: Iterator<Item = Result<B, E>>,
    B: BedEnter,
    B::Fields: Clone,
{
    type Item = Result<BedEntry<Vec<B::Fields>>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let run = match self.runs.next()? {
            Ok(run) => run,
            Err(e) => return Some(Err(e)),
        };
        // Runs are never empty.
        let first = &run[0];
        let last = &run[run.len() - 1];
        let chr_span = ChrSpan::new(first.chrom(), first.start(), last.end());
        let fields = run.into_iter().map(|b| b.fields).collect();
        Some(Ok(BedEntry::from_chr_span(chr_span, fields)))
    }
}

/// Records grouped per chromosome, chromosomes kept in first-seen order.
#[derive(Debug)]
pub struct ChromPartition<B> {
    order: Vec<String>,
    groups: FxHashMap<String, Vec<B>>,
}

impl<B> Default for ChromPartition<B> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            groups: FxHashMap::default(),
        }
    }
}

impl<B: ChrSpanner> ChromPartition<B> {
    pub fn push(&mut self, record: B) {
        match self.groups.get_mut(record.chrom()) {
            Some(group) => group.push(record),
            None => {
                let chrom = record.chrom().to_string();
                self.order.push(chrom.clone());
                self.groups.insert(chrom, vec![record]);
            }
        }
    }
}

impl<B> ChromPartition<B> {
    /// Chromosome names in first-seen order.
    pub fn chroms(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|c| c.as_str())
    }

    pub fn get(&self, chrom: &str) -> Option<&[B]> {
        self.groups.get(chrom).map(|g| g.as_slice())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consume the partition, yielding each chromosome's records in order.
    pub fn into_groups(mut self) -> Vec<(String, Vec<B>)> {
        self.order
            .into_iter()
            .map(|chrom| {
                let group = self.groups.remove(&chrom).unwrap_or_default();
                (chrom, group)
            })
            .collect()
    }
}

/// Materialize a stream into per-chromosome lists, stopping at the first error.
pub fn split_chrs<S, B, E>(input: S) -> Result<ChromPartition<B>, E>
where
    S: IntoIterator<Item = Result<B, E>>,
    B: ChrSpanner,
{
    let mut partition = ChromPartition::default();
    for record in input {
        partition.push(record?);
    }
    Ok(partition)
}

type ChromIter<B> = std::iter::Map<std::vec::IntoIter<B>, fn(B) -> Result<B, Infallible>>;

enum WindowBedState<I, B: BedEnter> {
    Pending(I),
    Running {
        chroms: std::vec::IntoIter<(String, Vec<B>)>,
        current: Option<WindowBedWeak<ChromIter<B>, B>>,
    },
    Done,
}

/// Per-chromosome spread windows over a sorted stream.
///
/// The whole input is materialized on the first call to `next`; an
/// upstream error at that point is returned once and ends the stream.
pub struct WindowBed<I, B: BedEnter> {
    state: WindowBedState<I, B>,
    config: WindowConfig,
}

impl<I, B: BedEnter> WindowBed<I, B> {
    pub fn new<S, E>(input: S, config: WindowConfig) -> Self
    where
        S: IntoIterator<IntoIter = I, Item = Result<B, E>>,
    {
        Self {
            state: WindowBedState::Pending(input.into_iter()),
            config,
        }
    }
}

impl<I, B, E> Iterator for WindowBed<I, B>
where
    I: Iterator<Item = Result<B, E>>,
    B: BedEnter,
    B::Fields: Clone,
{
    type Item = Result<BedEntry<Vec<B::Fields>>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                WindowBedState::Done => return None,
                WindowBedState::Pending(_) => {
                    let state = std::mem::replace(&mut self.state, WindowBedState::Done);
                    if let WindowBedState::Pending(input) = state {
                        match split_chrs(input) {
                            Ok(partition) => {
                                debug!("partitioned input into {} chromosomes", partition.len());
                                self.state = WindowBedState::Running {
                                    chroms: partition.into_groups().into_iter(),
                                    current: None,
                                };
                            }
                            Err(e) => return Some(Err(e)),
                        }
                    }
                }
                WindowBedState::Running { chroms, current } => {
                    if let Some(wins) = current {
                        match wins.next() {
                            Some(Ok(w)) => return Some(Ok(w)),
                            Some(Err(never)) => match never {},
                            None => *current = None,
                        }
                    }
                    match chroms.next() {
                        Some((_, records)) => {
                            let ok: fn(B) -> Result<B, Infallible> = Ok;
                            *current = Some(WindowBedWeak::new(records.into_iter().map(ok), self.config));
                        }
                        None => self.state = WindowBedState::Done,
                    }
                }
            }
        }
    }
}

/// Spread-window a sorted stream, chromosome by chromosome.
pub fn window_bed<S, B, E>(input: S, config: WindowConfig) -> WindowBed<S::IntoIter, B>
where
    S: IntoIterator<Item = Result<B, E>>,
    B: BedEnter,
    B::Fields: Clone,
{
    WindowBed::new(input, config)
}
