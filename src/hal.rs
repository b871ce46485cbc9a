//! Capabilities the driver needs from the platform.
//!
//! `embedded-hal` 1.0 has no trait for changing a pin's direction or for
//! reading a free-running counter, so both are defined here.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Direction of the single-wire data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The host drives the line.
    Output,
    /// The line is released and the sensor drives it.
    Input,
}

/// A bidirectional GPIO line.
///
/// `set_low`/`set_high` are only meaningful while the direction is
/// [`Direction::Output`], `is_high`/`is_low` while it is [`Direction::Input`].
pub trait DataLine: InputPin + OutputPin {
    /// Switches the line between driving and sensing.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;
}

impl<T: DataLine + ?Sized> DataLine for &mut T {
    #[inline]
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        T::set_direction(self, direction)
    }
}

/// Adapts an open-drain pin with an external pull-up to [`DataLine`].
///
/// An open-drain pin never needs reconfiguring: releasing it (driving it
/// high) hands the line to the sensor.
pub struct OpenDrain<P> {
    pin: P,
}

impl<P> OpenDrain<P> {
    /// Wraps an open-drain pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: ErrorType> ErrorType for OpenDrain<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputPin for OpenDrain<P> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

impl<P: OutputPin> OutputPin for OpenDrain<P> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl<P: InputPin + OutputPin> DataLine for OpenDrain<P> {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Output => Ok(()),
            Direction::Input => self.pin.set_high(),
        }
    }
}

/// A number of timer ticks.
///
/// One tick is one microsecond on the reference hardware.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticks(pub u32);

/// A free-running counter with microsecond resolution.
pub trait MicroTimer {
    /// Starts counting.
    fn start(&mut self);
    /// Stops counting and releases the timer.
    fn stop(&mut self);
    /// Sets the count back to zero.
    fn reset(&mut self);
    /// Ticks counted since the last [`reset`](MicroTimer::reset).
    fn elapsed(&mut self) -> Ticks;
}

impl<T: MicroTimer + ?Sized> MicroTimer for &mut T {
    #[inline]
    fn start(&mut self) {
        T::start(self)
    }

    #[inline]
    fn stop(&mut self) {
        T::stop(self)
    }

    #[inline]
    fn reset(&mut self) {
        T::reset(self)
    }

    #[inline]
    fn elapsed(&mut self) -> Ticks {
        T::elapsed(self)
    }
}
