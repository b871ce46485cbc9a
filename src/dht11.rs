use embedded_hal::{delay::DelayNs, digital::PinState};

use crate::error::DhtError;
use crate::hal::{DataLine, Direction, MicroTimer, Ticks};

/// How long (in milliseconds) the host holds the line low to request a reading.
const START_SIGNAL_MS: u32 = 18;

/// Maximum time to wait for the pin to change state.
///
/// Used to detect timeouts when waiting for the DHT11 to respond.
const TIMEOUT: Ticks = Ticks(500);

/// Accepted width of each of the two acknowledgment pulses.
const ACK_PULSE: Band = Band::new(60, 100);
/// High pulse width of a 0 bit.
const ZERO_PULSE: Band = Band::new(20, 30);
/// High pulse width of a 1 bit.
const ONE_PULSE: Band = Band::new(60, 80);

/// Humidity, humidity fraction, temperature, temperature fraction, parity.
const FRAME_BITS: usize = 40;

/// A pulse width window. Both bounds are exclusive.
struct Band {
    above: u32,
    below: u32,
}

impl Band {
    const fn new(above: u32, below: u32) -> Self {
        Band { above, below }
    }

    fn contains(&self, width: Ticks) -> bool {
        width.0 > self.above && width.0 < self.below
    }
}

/// Keeps the timer counting for as long as it is alive.
struct Running<'a, T: MicroTimer>(&'a mut T);

impl<'a, T: MicroTimer> Running<'a, T> {
    fn start(timer: &'a mut T) -> Self {
        timer.start();
        Running(timer)
    }
}

impl<T: MicroTimer> Drop for Running<'_, T> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Driver for the DHT11 temperature and humidity sensor.
///
/// The driver doubles as the sensor handle: it owns the data line, the
/// timer, the delay provider and the last reading that passed the checksum.
pub struct Dht11<PIN, TIMER, D> {
    pin: PIN,
    timer: TIMER,
    delay: D,
    last: Reading,
}

/// Reading returned by the DHT11 sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reading {
    /// Temperature in whole degrees Celsius.
    pub temperature: u8,
    /// Relative humidity in whole percent.
    pub humidity: u8,
}

impl<PIN, TIMER, DELAY, E> Dht11<PIN, TIMER, DELAY>
where
    PIN: DataLine<Error = E>,
    TIMER: MicroTimer,
    DELAY: DelayNs,
{
    /// Creates a new instance of the DHT11 driver.
    ///
    /// # Arguments
    ///
    /// * `pin` - The GPIO line connected to the DHT11 data pin.
    /// * `timer` - A free-running timer counting microseconds.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(pin: PIN, timer: TIMER, delay: DELAY) -> Self {
        Dht11 {
            pin,
            timer,
            delay,
            last: Reading::default(),
        }
    }

    /// Reads a temperature and humidity measurement from the DHT11 sensor.
    ///
    /// This method performs the complete DHT11 transaction: the start
    /// signal, the sensor's acknowledgment, 40 measured data bits and the
    /// checksum. Everything after the start signal runs in a critical
    /// section with the timer running; both are released on every return.
    ///
    /// Blocks for roughly 20 ms. The caller must not touch the line or the
    /// timer concurrently.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError)` otherwise. The stored reading is left untouched.
    pub fn read(&mut self) -> Result<Reading, DhtError<E>> {
        self.start()?;
        let bits = self.measure()?;
        let reading = decode(&bits)?;
        self.last = reading;
        Ok(reading)
    }

    /// The last reading that passed the checksum.
    ///
    /// Both values are zero until the first successful [`read`](Self::read).
    pub fn last_reading(&self) -> Reading {
        self.last
    }

    /// Releases the line, timer and delay provider.
    pub fn release(self) -> (PIN, TIMER, DELAY) {
        (self.pin, self.timer, self.delay)
    }

    /// Sends the start signal by holding the line low.
    fn start(&mut self) -> Result<(), DhtError<E>> {
        self.pin.set_direction(Direction::Output)?;
        self.pin.set_low()?;
        self.delay.delay_ms(START_SIGNAL_MS);
        Ok(())
    }

    /// Releases the line and samples the sensor's response and data bits.
    fn measure(&mut self) -> Result<[u8; FRAME_BITS], DhtError<E>> {
        let Self { pin, timer, .. } = self;

        critical_section::with(|_cs| -> Result<[u8; FRAME_BITS], DhtError<E>> {
            let running = Running::start(timer);
            let timer = &mut *running.0;

            pin.set_direction(Direction::Input)?;
            Self::await_response(pin, timer)?;
            Self::read_frame(pin, timer)
        })
    }

    /// Waits for the sensor's two acknowledgment pulses and checks their widths.
    fn await_response(pin: &mut PIN, timer: &mut TIMER) -> Result<(), DhtError<E>> {
        // Sensor pulls the line low
        Self::wait_while(pin, timer, PinState::High)?;

        let low = Self::wait_while(pin, timer, PinState::Low)?; // ~80us
        let high = Self::wait_while(pin, timer, PinState::High)?; // ~80us

        if ACK_PULSE.contains(low) && ACK_PULSE.contains(high) {
            Ok(())
        } else {
            Err(DhtError::InvalidHandshake)
        }
    }

    /// Samples all 40 bits, stopping at the first one that fails.
    fn read_frame(pin: &mut PIN, timer: &mut TIMER) -> Result<[u8; FRAME_BITS], DhtError<E>> {
        let mut bits = [0; FRAME_BITS];

        for bit in bits.iter_mut() {
            // ~50us low preamble, then the high pulse carries the value
            Self::wait_while(pin, timer, PinState::Low)?;
            let width = Self::wait_while(pin, timer, PinState::High)?;

            *bit = classify(width).ok_or(DhtError::InvalidBitTiming)?;
        }

        Ok(bits)
    }

    /// Resets the timer and waits for the line to leave `level`.
    ///
    /// # Returns
    ///
    /// * `Ok(Ticks)` with the time the line stayed at `level`
    /// * `Err(DhtError::Timeout)` if it stays longer than the timeout
    fn wait_while(pin: &mut PIN, timer: &mut TIMER, level: PinState) -> Result<Ticks, DhtError<E>> {
        timer.reset();

        while PinState::from(pin.is_high()?) == level {
            if timer.elapsed() > TIMEOUT {
                return Err(DhtError::Timeout);
            }
        }

        Ok(timer.elapsed())
    }
}

/// Maps a high pulse width to its bit value.
fn classify(width: Ticks) -> Option<u8> {
    if ZERO_PULSE.contains(width) {
        Some(0)
    } else if ONE_PULSE.contains(width) {
        Some(1)
    } else {
        None
    }
}

/// Packs bits MSB first.
fn pack(bits: &[u8]) -> u8 {
    bits.iter().fold(0, |byte, bit| (byte << 1) | bit)
}

/// Extracts the integral humidity and temperature bytes and checks parity.
///
/// The fraction bytes (bits 8..16 and 24..32) are not used.
fn decode<E>(bits: &[u8; FRAME_BITS]) -> Result<Reading, DhtError<E>> {
    let humidity = pack(&bits[0..8]);
    let temperature = pack(&bits[16..24]);
    let parity = pack(&bits[32..40]);

    if humidity.wrapping_add(temperature) != parity {
        return Err(DhtError::ChecksumMismatch);
    }

    Ok(Reading {
        temperature,
        humidity,
    })
}
