//! Line-delimited JSON sample protocol.
//!
//! Every sample is one JSON object with a single `distance` field (metres),
//! terminated by `\n` and flushed before the next tick:
//!
//! ```text
//! {"distance":0.020000001234}
//! {"distance":0.019999998766}
//! ```
//!
//! The reading side tolerates noise on the stream: blank lines, non-JSON
//! lines and JSON values that are not objects with a numeric `distance` are
//! skipped.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, OutputError, Result};

/// One distance reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Measured distance in metres.
    pub distance: f64,
}

impl Sample {
    /// Create a new sample.
    #[inline]
    pub const fn new(distance: f64) -> Self {
        Self { distance }
    }

    /// Copy of this sample rounded to `decimals` places.
    pub fn rounded(self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        Self {
            distance: (self.distance * factor).round() / factor,
        }
    }
}

/// Destination for emitted samples.
pub trait SampleSink {
    /// Deliver one sample.
    ///
    /// # Errors
    ///
    /// Returns an `OutputError` if the sample could not be delivered.
    fn emit(&mut self, sample: Sample) -> Result<()>;
}

/// In-memory capture, used by tests and embedding code.
impl SampleSink for Vec<Sample> {
    fn emit(&mut self, sample: Sample) -> Result<()> {
        self.push(sample);
        Ok(())
    }
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn emit(&mut self, sample: Sample) -> Result<()> {
        (**self).emit(sample)
    }
}

/// Writes samples as JSON lines, flushing after each one.
#[derive(Debug)]
pub struct JsonLineWriter<W: Write> {
    writer: W,
    precision: u32,
    line: Vec<u8>,
    lines_written: u64,
}

impl<W: Write> JsonLineWriter<W> {
    /// Create a writer rounding distances to `precision` decimals.
    pub fn new(writer: W, precision: u32) -> Self {
        Self {
            writer,
            precision,
            line: Vec::with_capacity(48),
            lines_written: 0,
        }
    }

    /// Number of complete lines written.
    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Get a reference to the underlying writer.
    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLineWriter<std::io::Stdout> {
    /// Writer on the process's standard output.
    pub fn stdout(precision: u32) -> Self {
        Self::new(std::io::stdout(), precision)
    }
}

impl<W: Write> SampleSink for JsonLineWriter<W> {
    fn emit(&mut self, sample: Sample) -> Result<()> {
        // The line is built in full before touching the stream so a failed
        // encode never leaves a fragment behind.
        self.line.clear();
        serde_json::to_writer(&mut self.line, &sample.rounded(self.precision))
            .map_err(|e| OutputError::Encode(e.to_string()))?;
        self.line.push(b'\n');

        self.writer.write_all(&self.line).map_err(OutputError::from)?;
        self.writer.flush().map_err(OutputError::from)?;
        self.lines_written += 1;
        Ok(())
    }
}

/// Decode one line of the stream.
///
/// Returns `None` for anything that is not a JSON object carrying a numeric
/// `distance`.
pub fn decode_line(line: &str) -> Option<Sample> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    let distance = value.as_object()?.get("distance")?.as_f64()?;
    Some(Sample::new(distance))
}

/// Iterator over the samples of a line-delimited stream.
#[derive(Debug)]
pub struct SampleReader<R: BufRead> {
    reader: R,
    buf: String,
    skipped: u64,
}

impl<R: BufRead> SampleReader<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            skipped: 0,
        }
    }

    /// Lines dropped because they did not decode.
    #[inline]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Read lines until one decodes with `decode`, or the stream ends.
    pub(crate) fn next_with<F>(&mut self, mut decode: F) -> Option<Result<Sample>>
    where
        F: FnMut(&str) -> Option<Sample>,
    {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    if let Some(sample) = decode(&self.buf) {
                        return Some(Ok(sample));
                    }
                    if !self.buf.trim().is_empty() {
                        self.skipped += 1;
                    }
                }
                // The offending line is consumed; treat it as malformed
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => self.skipped += 1,
                Err(e) => return Some(Err(DeviceError::Read(e.to_string()).into())),
            }
        }
    }
}

impl<R: BufRead> Iterator for SampleReader<R> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_with(decode_line)
    }
}
