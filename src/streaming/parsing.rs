//! Zero-allocation BED parsing utilities.
//!
//! These functions locate the first three BED columns without any heap
//! allocation; callers decide what to do with the remaining columns.

use memchr::memchr;

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty, contains non-digit characters, or
/// overflows.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Parse BED3 fields using memchr - zero allocation.
///
/// Returns (chrom_bytes, start, end) or None if parsing fails.
#[inline(always)]
pub fn parse_bed3_bytes(line: &[u8]) -> Option<(&[u8], u64, u64)> {
    parse_bed3_bytes_with_rest(line).map(|(chrom, start, end, _)| (chrom, start, end))
}

/// Parse BED3 fields and return the offset where the rest of the line begins.
///
/// Returns (chrom_bytes, start, end, rest_start) where `rest_start` is the
/// byte offset just past the end column: either `line.len()` or the index
/// of the tab that introduces the fourth column.
#[inline(always)]
pub fn parse_bed3_bytes_with_rest(line: &[u8]) -> Option<(&[u8], u64, u64, usize)> {
    let tab1 = memchr(b'\t', line)?;
    let chrom = &line[..tab1];

    let rest1 = &line[tab1 + 1..];
    let tab2 = memchr(b'\t', rest1)?;
    let start = parse_u64_fast(&rest1[..tab2])?;

    let rest2 = &rest1[tab2 + 1..];
    let end_len = memchr(b'\t', rest2).unwrap_or(rest2.len());
    let end_len_trimmed = memchr(b'\n', &rest2[..end_len]).unwrap_or(end_len);
    let end = parse_u64_fast(&rest2[..end_len_trimmed])?;

    let rest_start = tab1 + 1 + tab2 + 1 + end_len;

    Some((chrom, start, end, rest_start))
}

/// Split the columns after the end coordinate.
///
/// `rest_start` is the offset returned by [`parse_bed3_bytes_with_rest`].
#[inline]
pub fn extra_fields(line: &[u8], rest_start: usize) -> impl Iterator<Item = &[u8]> {
    let rest: &[u8] = if rest_start < line.len() {
        &line[rest_start + 1..]
    } else {
        &[]
    };
    let present = rest_start < line.len();
    rest.split(|&b| b == b'\t').filter(move |_| present)
}

/// Check if a line should be skipped (empty, comment, or header).
#[inline(always)]
pub fn should_skip_line(line: &[u8]) -> bool {
    line.is_empty() || line[0] == b'#' || line.starts_with(b"track") || line.starts_with(b"browser")
}
