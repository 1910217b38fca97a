//! Inert platform implementation for documentation examples.
//!
//! Behaves like a bus with an idle MCP2515 on it: writes are accepted,
//! exchanges reply with zeroes (so `CANINTF` always reads empty) and the
//! interrupt line idles high.

use std::io;

use crate::pio::{
    ActiveLevel, Direction, EdgeCallback, EdgeTrigger, InterruptPin, Peripherals, SpiDevice,
    SpiMode,
};

/// SPI device that answers every exchange with zeroes.
#[derive(Debug, Default)]
pub struct ExampleSpi;

impl SpiDevice for ExampleSpi {
    fn configure(&mut self, _frequency_hz: u32, _mode: SpiMode, _bits: u8) -> io::Result<()> {
        Ok(())
    }

    fn write(&mut self, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn transfer(&mut self, words: &mut [u8]) -> io::Result<()> {
        words.fill(0);
        Ok(())
    }
}

/// Interrupt line that never fires and idles high.
#[derive(Debug, Default)]
pub struct ExampleInterruptPin;

impl InterruptPin for ExampleInterruptPin {
    fn set_direction(&mut self, _direction: Direction) -> io::Result<()> {
        Ok(())
    }

    fn set_edge_trigger(&mut self, _edge: EdgeTrigger) -> io::Result<()> {
        Ok(())
    }

    fn set_active_level(&mut self, _level: ActiveLevel) -> io::Result<()> {
        Ok(())
    }

    fn register_callback(&mut self, _callback: EdgeCallback) -> io::Result<()> {
        Ok(())
    }

    fn level(&self) -> io::Result<bool> {
        Ok(true)
    }
}

/// Hands out [`ExampleSpi`] and [`ExampleInterruptPin`] for any name.
#[derive(Debug, Default)]
pub struct ExamplePeripherals;

impl Peripherals for ExamplePeripherals {
    type Spi = ExampleSpi;
    type Int = ExampleInterruptPin;

    fn open_spi(&mut self, _bus: &str) -> io::Result<Self::Spi> {
        Ok(ExampleSpi)
    }

    fn open_gpio(&mut self, _pin: &str) -> io::Result<Self::Int> {
        Ok(ExampleInterruptPin)
    }
}
