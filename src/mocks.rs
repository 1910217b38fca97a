//! Mock peripherals and scripted-exchange helpers for tests.

use std::io;

use mockall::{mock, Sequence};

use crate::{
    cmd::Command,
    config::Config,
    controller::Mcp2515,
    pio::{
        ActiveLevel, Direction, EdgeCallback, EdgeTrigger, InterruptPin, Peripherals, SpiDevice,
        SpiMode,
    },
    regs::Register,
};

mock! {
    pub Spi {}

    impl SpiDevice for Spi {
        fn configure(&mut self, frequency_hz: u32, mode: SpiMode, bits_per_word: u8) -> io::Result<()>;
        fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
        fn transfer(&mut self, words: &mut [u8]) -> io::Result<()>;
    }
}

mock! {
    pub IntPin {}

    impl InterruptPin for IntPin {
        fn set_direction(&mut self, direction: Direction) -> io::Result<()>;
        fn set_edge_trigger(&mut self, edge: EdgeTrigger) -> io::Result<()>;
        fn set_active_level(&mut self, level: ActiveLevel) -> io::Result<()>;
        fn register_callback(&mut self, callback: EdgeCallback) -> io::Result<()>;
        fn level(&self) -> io::Result<bool>;
    }
}

/// [`Peripherals`] implementation handing out pre-scripted mocks once.
pub(crate) struct FakePeripherals {
    pub spi: Option<MockSpi>,
    pub pin: Option<MockIntPin>,
}

impl Peripherals for FakePeripherals {
    type Spi = MockSpi;
    type Int = MockIntPin;

    fn open_spi(&mut self, _bus: &str) -> io::Result<MockSpi> {
        self.spi
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such SPI bus"))
    }

    fn open_gpio(&mut self, _pin: &str) -> io::Result<MockIntPin> {
        self.pin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such GPIO pin"))
    }
}

/// Mock pair plus expectation builders asserting exact wire bytes.
pub(crate) struct Mocks {
    pub spi: MockSpi,
    pub pin: MockIntPin,
}

impl Default for Mocks {
    fn default() -> Self {
        Mocks {
            spi: MockSpi::new(),
            pin: MockIntPin::new(),
        }
    }
}

impl Mocks {
    /// Expects one write-only frame with exactly `frame` on the wire.
    pub fn expect_write(&mut self, seq: &mut Sequence, frame: &'static [u8]) {
        self.spi
            .expect_write()
            .times(1)
            .in_sequence(seq)
            .returning(move |bytes| {
                assert_eq!(frame, bytes);
                Ok(())
            });
    }

    /// Expects one full-duplex exchange of `expect`, replying with `reply`.
    pub fn expect_exchange(
        &mut self,
        seq: &mut Sequence,
        expect: &'static [u8],
        reply: &'static [u8],
    ) {
        self.spi
            .expect_transfer()
            .times(1)
            .in_sequence(seq)
            .returning(move |words| {
                assert_eq!(expect, words);
                words.copy_from_slice(reply);
                Ok(())
            });
    }

    /// Expects one register read, replying with `value`.
    pub fn expect_read(&mut self, seq: &mut Sequence, reg: Register, value: u8) {
        self.spi
            .expect_transfer()
            .times(1)
            .in_sequence(seq)
            .returning(move |words| {
                assert_eq!([Command::Read as u8, reg as u8, 0x00], words);
                words[2] = value;
                Ok(())
            });
    }

    /// Expects one register read that fails on the bus.
    pub fn expect_read_error(&mut self, seq: &mut Sequence, reg: Register) {
        self.spi
            .expect_transfer()
            .times(1)
            .in_sequence(seq)
            .returning(move |words| {
                assert_eq!(reg as u8, words[1]);
                Err(io::Error::new(io::ErrorKind::Other, "transfer failed"))
            });
    }

    /// Expects the interrupt pin setup: input, falling edge, active high,
    /// callback registered (and dropped).
    pub fn expect_pin_setup(&mut self) {
        self.pin
            .expect_set_direction()
            .times(1)
            .returning(|direction| {
                assert_eq!(Direction::Input, direction);
                Ok(())
            });
        self.pin.expect_set_edge_trigger().times(1).returning(|edge| {
            assert_eq!(EdgeTrigger::Falling, edge);
            Ok(())
        });
        self.pin
            .expect_set_active_level()
            .times(1)
            .returning(|level| {
                assert_eq!(ActiveLevel::High, level);
                Ok(())
            });
        self.pin
            .expect_register_callback()
            .times(1)
            .returning(|_callback| Ok(()));
    }

    /// Expects the whole default-configuration startup sequence, byte-exact
    /// and in order, including the SPI port parameters and pin setup.
    pub fn expect_startup(&mut self, seq: &mut Sequence) {
        self.spi
            .expect_configure()
            .times(1)
            .in_sequence(seq)
            .returning(|frequency_hz, mode, bits_per_word| {
                assert_eq!(10_000_000, frequency_hz);
                assert_eq!(SpiMode::Mode0, mode);
                assert_eq!(8, bits_per_word);
                Ok(())
            });
        self.expect_pin_setup();

        // RESET, then the §configure writes with the default bytes.
        self.expect_write(seq, &[0xC0]);
        self.expect_write(seq, &[0x02, 0x0F, 0x80]); // CANCTRL: configuration
        self.expect_write(seq, &[0x02, 0x2A, 0x00]); // CFG1
        self.expect_write(seq, &[0x02, 0x29, 0xC9]); // CFG2
        self.expect_write(seq, &[0x02, 0x28, 0x42]); // CFG3
        self.expect_write(seq, &[0x02, 0x60, 0x00]); // RXB0CTRL: filter mode
        self.expect_write(seq, &[0x02, 0x00, 0x00]); // RXF0SIDH
        self.expect_write(seq, &[0x02, 0x01, 0x40]); // RXF0SIDL
        self.expect_write(seq, &[0x02, 0x04, 0x00]); // RXF1SIDH
        self.expect_write(seq, &[0x02, 0x05, 0x60]); // RXF1SIDL
        self.expect_write(seq, &[0x02, 0x20, 0xC7]); // RXM0SIDH
        self.expect_write(seq, &[0x02, 0x21, 0xE0]); // RXM0SIDL
        self.expect_write(seq, &[0x02, 0x24, 0xFF]); // RXM1SIDH
        self.expect_write(seq, &[0x02, 0x25, 0xFF]); // RXM1SIDL
        self.expect_write(seq, &[0x02, 0x2B, 0x01]); // CANINTE: RX0IE
        self.expect_write(seq, &[0x02, 0x0F, 0x00]); // CANCTRL: normal, /1
    }

    /// Expects the unconditional flag clear at the end of a drain.
    pub fn expect_flag_clear(&mut self, seq: &mut Sequence) {
        self.expect_write(seq, &[0x02, 0x2C, 0x00]); // CANINTF
        self.expect_write(seq, &[0x02, 0x2D, 0x00]); // EFLG
    }

    /// Builds a controller on the scripted mocks with the default
    /// configuration.
    pub fn into_controller(self) -> Mcp2515<MockSpi, MockIntPin> {
        Mcp2515::new(self.spi, self.pin, &Config::default()).expect("construction failed")
    }
}
