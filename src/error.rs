use core::fmt;

/// Possible errors from the DHT11 driver.
///
/// Every variant is recoverable by starting a new read.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// Timed out waiting for a pin state change.
    Timeout,
    /// The sensor's acknowledgment pulses were out of bounds.
    InvalidHandshake,
    /// A data pulse matched neither the 0 nor the 1 width.
    InvalidBitTiming,
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhtError::Timeout => write!(f, "timed out waiting for a level change"),
            DhtError::InvalidHandshake => write!(f, "sensor acknowledgment out of bounds"),
            DhtError::InvalidBitTiming => write!(f, "data pulse width matched no bit value"),
            DhtError::ChecksumMismatch => write!(f, "checksum validation failed"),
            DhtError::PinError(e) => write!(f, "pin error: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for DhtError<E> {}
