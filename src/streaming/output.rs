//! Efficient output formatting for window results.
//!
//! Uses itoa for integer formatting and ryu for float formatting
//! to avoid allocation in the hot path.

use crate::bed::BedError;
use crate::interval::{BedEntry, ChrSpanner};
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use std::io::{BufWriter, Write};

/// High-performance BED output writer.
///
/// Every value line is `chrom\tstart\tend\tvalue`. Non-finite values are
/// written as ryu renders them (`NaN`, `inf`, `-inf`).
pub struct BedWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    ryu_buf: ryu::Buffer,
}

impl<W: Write> BedWriter<W> {
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            ryu_buf: ryu::Buffer::new(),
        }
    }

    /// Write a BED3 record (chrom, start, end) without newline.
    #[inline]
    pub fn write_bed3(&mut self, chrom: &[u8], start: u64, end: u64) -> Result<(), BedError> {
        self.writer.write_all(chrom)?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(end).as_bytes())?;
        Ok(())
    }

    /// Write a float using ryu.
    #[inline]
    pub fn write_float(&mut self, f: f64) -> Result<(), BedError> {
        self.writer.write_all(self.ryu_buf.format(f).as_bytes())?;
        Ok(())
    }

    /// Write one `chrom\tstart\tend\tvalue` line.
    #[inline]
    pub fn write_value<C: ChrSpanner + ?Sized>(
        &mut self,
        span: &C,
        value: f64,
    ) -> Result<(), BedError> {
        self.write_bed3(span.chrom().as_bytes(), span.start(), span.end())?;
        self.writer.write_all(b"\t")?;
        self.write_float(value)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write a reduced window record.
    #[inline]
    pub fn write_entry(&mut self, entry: &BedEntry<f64>) -> Result<(), BedError> {
        self.write_value(entry, entry.fields)
    }

    /// Write one `chrom\tstart\tend\tv1\tv2...` line.
    pub fn write_values<C: ChrSpanner + ?Sized>(
        &mut self,
        span: &C,
        values: &[f64],
    ) -> Result<(), BedError> {
        self.write_bed3(span.chrom().as_bytes(), span.start(), span.end())?;
        for &value in values {
            self.writer.write_all(b"\t")?;
            self.write_float(value)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write a record with its extra columns tab-joined after the coordinates.
    pub fn write_fields<S: AsRef<str>>(&mut self, entry: &BedEntry<Vec<S>>) -> Result<(), BedError> {
        self.write_bed3(entry.chrom().as_bytes(), entry.start(), entry.end())?;
        for field in &entry.fields {
            self.writer.write_all(b"\t")?;
            self.writer.write_all(field.as_ref().as_bytes())?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), BedError> {
        self.writer.flush()?;
        Ok(())
    }
}
