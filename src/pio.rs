//! Platform peripheral I/O traits.
//!
//! The driver never touches hardware directly: the host hands it one SPI
//! device and one GPIO interrupt line through these traits, usually resolved
//! by name through [`Peripherals`]. Implementations map onto whatever the
//! host provides (spidev + gpiochip, a vendor SDK, a simulator). Dropping a
//! handle releases the underlying device and unregisters any callback.

use std::io;

/// Callback invoked on every matching interrupt edge.
///
/// Runs on a platform-owned thread and must not block; the driver's callback
/// only enqueues an event for its worker.
pub type EdgeCallback = Box<dyn FnMut() + Send>;

/// SPI clock polarity/phase mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL = 0, CPHA = 0.
    Mode0,
    /// CPOL = 0, CPHA = 1.
    Mode1,
    /// CPOL = 1, CPHA = 0.
    Mode2,
    /// CPOL = 1, CPHA = 1.
    Mode3,
}

/// GPIO line direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Which edges of a GPIO input generate callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeTrigger {
    None,
    Rising,
    Falling,
    Both,
}

/// Logical polarity of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// Full-duplex SPI device handle.
///
/// Handles move to the driver's interrupt worker thread, hence `Send`.
pub trait SpiDevice: Send {
    /// Configures the port parameters. Called once, before any traffic.
    fn configure(
        &mut self,
        frequency_hz: u32,
        mode: SpiMode,
        bits_per_word: u8,
    ) -> io::Result<()>;

    /// Writes `bytes` to the device, discarding whatever it shifts back.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Full-duplex exchange: shifts `words` out while overwriting it in
    /// place with the bytes the device shifts back.
    fn transfer(&mut self, words: &mut [u8]) -> io::Result<()>;
}

/// GPIO line used as an edge-triggered interrupt input.
pub trait InterruptPin {
    fn set_direction(&mut self, direction: Direction) -> io::Result<()>;

    fn set_edge_trigger(&mut self, edge: EdgeTrigger) -> io::Result<()>;

    fn set_active_level(&mut self, level: ActiveLevel) -> io::Result<()>;

    /// Installs `callback` to run on every matching edge, replacing any
    /// previously registered callback.
    fn register_callback(&mut self, callback: EdgeCallback) -> io::Result<()>;

    /// Samples the current logical level of the line.
    fn level(&self) -> io::Result<bool>;
}

/// Access to the host's named peripherals.
pub trait Peripherals {
    type Spi: SpiDevice;
    type Int: InterruptPin;

    /// Opens the SPI device named `bus` (for example `"SPI0.0"`).
    fn open_spi(&mut self, bus: &str) -> io::Result<Self::Spi>;

    /// Opens the GPIO line named `pin` (for example `"BCM25"`).
    fn open_gpio(&mut self, pin: &str) -> io::Result<Self::Int>;
}
