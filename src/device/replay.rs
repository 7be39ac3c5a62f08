//! Replay of a recorded distance stream.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::{DeviceError, Result};
use crate::output::{decode_line, Sample, SampleReader};

use super::{Locator, Sensor};

/// Serves one reading per line of a recording.
///
/// Lines may be bare numbers or `{"distance": ...}` objects, so both a raw
/// sensor dump and the emulator's own output can be replayed. Blank and
/// malformed lines are skipped.
#[derive(Debug)]
pub struct ReplaySensor<R: BufRead = BufReader<File>> {
    reader: SampleReader<R>,
    reads: u64,
}

impl<R: BufRead> ReplaySensor<R> {
    /// Replay from any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: SampleReader::new(reader),
            reads: 0,
        }
    }

    /// Readings served so far.
    #[inline]
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Lines skipped as unreadable.
    #[inline]
    pub fn skipped(&self) -> u64 {
        self.reader.skipped()
    }

    /// Next reading, or `DeviceError::EndOfStream` once the recording is
    /// exhausted.
    pub fn next_reading(&mut self) -> Result<f64> {
        match self.reader.next_with(decode_reading) {
            Some(sample) => {
                let sample = sample?;
                self.reads += 1;
                Ok(sample.distance)
            }
            None => Err(DeviceError::EndOfStream.into()),
        }
    }
}

fn decode_reading(line: &str) -> Option<Sample> {
    match line.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(Sample::new(v)),
        _ => decode_line(line),
    }
}

impl Sensor for ReplaySensor {
    fn open(locator: &Locator) -> Result<Self> {
        let Locator::Replay(path) = locator else {
            return Err(DeviceError::Open {
                locator: locator.to_string(),
                reason: "not a replay locator".to_string(),
            }
            .into());
        };

        let file = File::open(path).map_err(|e| DeviceError::Open {
            locator: locator.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }

    fn read_distance(&mut self) -> Result<f64> {
        self.next_reading()
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}
