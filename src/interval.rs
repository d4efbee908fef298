//! Core interval types for genomic region representation.
//!
//! All coordinates are 0-based, half-open (BED convention).

use std::cmp::Ordering;
use std::fmt;

/// A half-open `[start, end)` span on a single sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    #[inline]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A chromosome name plus a half-open span.
///
/// Ordered by chromosome (lexicographic), then start, then end. This is the
/// sort order every windowing component expects from its input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChrSpan {
    pub chrom: String,
    pub span: Span,
}

impl ChrSpan {
    /// Create a new chromosome span.
    #[inline]
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            span: Span::new(start, end),
        }
    }

    #[inline]
    pub fn start(&self) -> u64 {
        self.span.start
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.span.end
    }

    /// Returns the length of the span.
    #[inline]
    pub fn len(&self) -> u64 {
        self.span.len()
    }

    /// Returns true if the span has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Check if `other` overlaps this span.
    ///
    /// Uses `other.end > self.start && other.start < self.end`, so a
    /// zero-length `other` strictly inside `self` counts as overlapping.
    #[inline]
    pub fn overlaps<C: ChrSpanner + ?Sized>(&self, other: &C) -> bool {
        self.chrom == other.chrom() && other.end() > self.start() && other.start() < self.end()
    }

    /// True if `other` lies entirely before this span, or on another chromosome.
    #[inline]
    pub fn is_past<C: ChrSpanner + ?Sized>(&self, other: &C) -> bool {
        other.chrom() != self.chrom || other.end() <= self.start()
    }
}

impl fmt::Display for ChrSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chrom, self.span.start, self.span.end)
    }
}

impl Ord for ChrSpan {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chrom
            .cmp(&other.chrom)
            .then(self.span.start.cmp(&other.span.start))
            .then(self.span.end.cmp(&other.span.end))
    }
}

impl PartialOrd for ChrSpan {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Anything addressable by chromosome and span.
pub trait ChrSpanner {
    fn chrom(&self) -> &str;
    fn start(&self) -> u64;
    fn end(&self) -> u64;

    /// Copy out the coordinates as an owned [`ChrSpan`].
    fn to_chr_span(&self) -> ChrSpan {
        ChrSpan::new(self.chrom(), self.start(), self.end())
    }
}

/// A [`ChrSpanner`] that also carries a payload.
pub trait BedEnter: ChrSpanner {
    type Fields;

    fn fields(&self) -> &Self::Fields;
}

impl ChrSpanner for ChrSpan {
    #[inline]
    fn chrom(&self) -> &str {
        &self.chrom
    }

    #[inline]
    fn start(&self) -> u64 {
        self.span.start
    }

    #[inline]
    fn end(&self) -> u64 {
        self.span.end
    }

    fn to_chr_span(&self) -> ChrSpan {
        self.clone()
    }
}

/// An interval record: coordinates plus an arbitrary payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BedEntry<T> {
    pub chr_span: ChrSpan,
    pub fields: T,
}

impl<T> BedEntry<T> {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64, fields: T) -> Self {
        Self {
            chr_span: ChrSpan::new(chrom, start, end),
            fields,
        }
    }

    pub fn from_chr_span(chr_span: ChrSpan, fields: T) -> Self {
        Self { chr_span, fields }
    }
}

impl<T> ChrSpanner for BedEntry<T> {
    #[inline]
    fn chrom(&self) -> &str {
        &self.chr_span.chrom
    }

    #[inline]
    fn start(&self) -> u64 {
        self.chr_span.span.start
    }

    #[inline]
    fn end(&self) -> u64 {
        self.chr_span.span.end
    }

    fn to_chr_span(&self) -> ChrSpan {
        self.chr_span.clone()
    }
}

impl<T> BedEnter for BedEntry<T> {
    type Fields = T;

    #[inline]
    fn fields(&self) -> &T {
        &self.fields
    }
}

/// Compare two records by the [`ChrSpan`] total order without allocating.
#[inline]
pub fn cmp_chr_span<A: ChrSpanner + ?Sized, B: ChrSpanner + ?Sized>(a: &A, b: &B) -> Ordering {
    a.chrom()
        .cmp(b.chrom())
        .then(a.start().cmp(&b.start()))
        .then(a.end().cmp(&b.end()))
}
