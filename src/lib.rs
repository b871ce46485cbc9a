//! DHT11 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT11 temperature
//! and humidity sensor, built on top of the [`embedded-hal`] traits.
//!
//! Unlike sample-after-delay drivers, every pulse the sensor sends is measured
//! against a free-running microsecond timer and classified by its width.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Timing-sensitive span runs inside a [`critical-section`]
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access, plus [`DataLine`] for
//!   switching the line direction ([`OpenDrain`] covers open-drain pins)
//! - [`MicroTimer`] for measuring pulse widths
//! - [`DelayNs`] for the start signal
//!
//! # Exclusive access
//! A read owns the line and the timer for its whole duration. On a
//! multi-threaded host, calls against the same sensor must be serialized by
//! the caller and nothing else may drive the pin meanwhile.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`critical-section`]: https://docs.rs/critical-section
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

pub mod dht11;
pub mod error;
pub mod hal;


pub use dht11::{Dht11, Reading};
pub use error::DhtError;
pub use hal::{DataLine, Direction, MicroTimer, OpenDrain, Ticks};
