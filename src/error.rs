//! Error types for picoscale-emu.
//!
//! Provides unified error handling across configuration, sample output and
//! device access. Cancellation is modelled as an error so that it unwinds the
//! tick loops through `?` like every other stop condition.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all picoscale-emu operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration validation error
    Config(ConfigError),
    /// Sample output error
    Output(OutputError),
    /// Sensor device error
    Device(DeviceError),
    /// The run was stopped by an external cancellation request
    Cancelled,
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Point spacing must be > 0
    InvalidStep(f64),
    /// Campaign range is empty or reversed
    InvalidRange {
        /// Start of the range
        start: f64,
        /// End of the range
        end: f64,
    },
    /// Feed rate must be > 0
    InvalidFeedRate(f64),
    /// Sample rate must be > 0
    InvalidSampleRate(f64),
    /// At least one approach cycle per point is required
    InvalidCycles(u32),
    /// Truncated normal parameters are inconsistent
    InvalidNoise {
        /// Standard deviation
        sigma: f64,
        /// Lower clipping bound
        low: f64,
        /// Upper clipping bound
        high: f64,
    },
    /// Duration is negative or not finite
    InvalidDuration(f64),
    /// Sensor locator could not be parsed
    InvalidLocator(String),
    /// A required builder part was not supplied
    Missing(&'static str),
}

/// Sample output errors.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputError {
    /// Writing or flushing the stream failed
    Io(String),
    /// The reading end of the stream went away
    Closed,
    /// A sample could not be encoded
    Encode(String),
}

/// Sensor device errors.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceError {
    /// Device could not be opened
    Open {
        /// Locator that was opened
        locator: String,
        /// Underlying reason
        reason: String,
    },
    /// A reading could not be obtained
    Read(String),
    /// Device could not be released cleanly
    Close(String),
    /// A recorded source has no more readings
    EndOfStream,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Output(e) => write!(f, "Output error: {}", e),
            Error::Device(e) => write!(f, "Device error: {}", e),
            Error::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidStep(v) => write!(f, "Invalid step: {}. Must be > 0", v),
            ConfigError::InvalidRange { start, end } => {
                write!(f, "Invalid range: start ({}) must be <= end ({})", start, end)
            }
            ConfigError::InvalidFeedRate(v) => write!(f, "Invalid feed rate: {}. Must be > 0", v),
            ConfigError::InvalidSampleRate(v) => {
                write!(f, "Invalid sample rate: {}. Must be > 0", v)
            }
            ConfigError::InvalidCycles(v) => {
                write!(f, "Invalid cycles per point: {}. Must be >= 1", v)
            }
            ConfigError::InvalidNoise { sigma, low, high } => write!(
                f,
                "Invalid noise: sigma {} must be >= 0 and low ({}) <= high ({})",
                sigma, low, high
            ),
            ConfigError::InvalidDuration(v) => {
                write!(f, "Invalid duration: {} s. Must be finite and >= 0", v)
            }
            ConfigError::InvalidLocator(s) => write!(f, "Invalid sensor locator: '{}'", s),
            ConfigError::Missing(what) => write!(f, "{} is required", what),
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Io(msg) => write!(f, "I/O error: {}", msg),
            OutputError::Closed => write!(f, "Output stream closed by reader"),
            OutputError::Encode(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Open { locator, reason } => {
                write!(f, "Failed to open '{}': {}", locator, reason)
            }
            DeviceError::Read(msg) => write!(f, "Read failed: {}", msg),
            DeviceError::Close(msg) => write!(f, "Close failed: {}", msg),
            DeviceError::EndOfStream => write!(f, "End of stream"),
        }
    }
}

impl Error {
    /// Whether this error represents a clean stop rather than a failure.
    ///
    /// Cancellation and a reader hanging up on stdout both end the process
    /// with a zero exit status.
    pub fn is_clean_stop(&self) -> bool {
        matches!(self, Error::Cancelled | Error::Output(OutputError::Closed))
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<OutputError> for Error {
    fn from(e: OutputError) -> Self {
        Error::Output(e)
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Error::Device(e)
    }
}

impl From<std::io::Error> for OutputError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::BrokenPipe {
            OutputError::Closed
        } else {
            OutputError::Io(e.to_string())
        }
    }
}

impl std::error::Error for Error {}

impl std::error::Error for ConfigError {}

impl std::error::Error for OutputError {}

impl std::error::Error for DeviceError {}
