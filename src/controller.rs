//! MCP2515 controller.
//!
//! Owns one SPI transport and one GPIO interrupt line for its whole
//! lifetime. Edge callbacks never touch the bus: they enqueue an event that
//! a dedicated worker thread turns into a [`process_interrupt`] call, so
//! interrupt handling is serialized regardless of how the platform delivers
//! callbacks.
//!
//! [`process_interrupt`]: Mcp2515::process_interrupt

use std::{
    fmt,
    sync::{mpsc, Arc},
    thread,
};

use log::{debug, error, warn};
use parking_lot::Mutex;

use crate::{
    buffer::{assemble_id, decode_id, RxBuffer, TxBuffer, TxIdent},
    cmd::Command,
    config::Config,
    error::{Error, Result},
    message::CanMessage,
    pio::{ActiveLevel, Direction, EdgeTrigger, InterruptPin, Peripherals, SpiDevice},
    regs::{CanCtrl, CanIntf, ClkPre, OpMode, QuickStatus, RecvBufMode, Register, Rxb0Ctrl},
    transport::Transport,
};

/// Receives every frame drained from the chip.
pub type Listener = Box<dyn FnMut(CanMessage) + Send>;

/// Events consumed by the interrupt worker.
enum Event {
    /// The interrupt line saw a falling edge.
    Edge,
    /// The controller is closing; the worker exits.
    Shutdown,
}

/// State shared between the controller handle and its interrupt worker.
struct Shared<S> {
    /// The SPI transport; `None` once the controller is closed.
    bus: Mutex<Option<Transport<S>>>,
    /// Registered frame listener, replaceable at any time.
    listener: Mutex<Option<Listener>>,
    /// Serializes [`Shared::process_interrupt`] invocations so overlapping
    /// drains can never deliver a frame twice.
    drain: Mutex<()>,
}

impl<S: SpiDevice> Shared<S> {
    /// Reads the interrupt flags and drains any full receive buffer, then
    /// clears `CANINTF` and `EFLG`.
    ///
    /// An I/O failure aborts the drain before the flags are cleared, so the
    /// chip keeps the interrupt line asserted and the next edge retries.
    /// No-op on a closed controller.
    fn process_interrupt(&self) {
        let _serial = self.drain.lock();

        let flags = {
            let mut guard = self.bus.lock();
            let Some(bus) = guard.as_mut() else {
                return;
            };
            let flags = match bus.read_register(Register::CANINTF) {
                Ok(flags) => flags,
                Err(e) => {
                    error!("failed to read CANINTF: {e}");
                    return;
                }
            };
            // Diagnostic only; cleared below together with CANINTF.
            match bus.read_register(Register::EFLG) {
                Ok(eflg) => debug!("CANINTF: {flags:#04x}, EFLG: {eflg:#04x}"),
                Err(e) => {
                    error!("failed to read EFLG: {e}");
                    return;
                }
            }
            CanIntf::from_bytes([flags])
        };

        if flags.rx0if() && !self.drain_buffer(RxBuffer::Rx0) {
            return;
        }
        if flags.rx1if() && !self.drain_buffer(RxBuffer::Rx1) {
            return;
        }

        let mut guard = self.bus.lock();
        let Some(bus) = guard.as_mut() else {
            return;
        };
        let cleared = bus
            .write_register(Register::CANINTF, 0x00)
            .and_then(|()| bus.write_register(Register::EFLG, 0x00));
        if let Err(e) = cleared {
            error!("failed to clear interrupt flags: {e}");
        }
    }

    /// Drains one receive buffer into the listener. Returns `false` on an
    /// I/O failure, which aborts the surrounding drain without clearing
    /// flags; a bad frame is dropped and the drain continues.
    fn drain_buffer(&self, buffer: RxBuffer) -> bool {
        match self.read_message(buffer) {
            Ok(message) => {
                self.deliver(buffer, message);
                true
            }
            Err(Error::BadDataLength(len)) => {
                warn!("dropping frame on {buffer:?} declaring {len} data bytes");
                true
            }
            Err(e) => {
                error!("failed to read {buffer:?}: {e}");
                false
            }
        }
    }

    /// Hands a frame to the listener, with the bus lock released so the
    /// listener may transmit from inside the callback.
    fn deliver(&self, buffer: RxBuffer, message: CanMessage) {
        debug!("received {:#05x} on {buffer:?}", message.raw_id());
        match self.listener.lock().as_mut() {
            Some(listener) => listener(message),
            None => warn!(
                "no listener registered, dropping frame {:#05x}",
                message.raw_id()
            ),
        }
    }

    /// Reads one frame out of a receive buffer.
    fn read_message(&self, buffer: RxBuffer) -> Result<CanMessage> {
        let mut guard = self.bus.lock();
        let bus = guard.as_mut().ok_or(Error::Closed)?;

        let len = bus.read_register(buffer.dlc_register())? & 0x0F;
        if len > 8 {
            return Err(Error::BadDataLength(len));
        }
        let len = len as usize;

        // 1 opcode + 4 identifier bytes + 1 DLC echo + data.
        let mut frame = [0u8; 14];
        frame[0] = buffer.read_opcode() as u8;
        bus.exchange(&mut frame[..6 + len])?;

        let raw = assemble_id([frame[1], frame[2], frame[3], frame[4]]);
        let (id, rtr) = decode_id(raw);
        let mut data = [0u8; 8];
        data[..len].copy_from_slice(&frame[6..6 + len]);
        Ok(CanMessage {
            id,
            rtr,
            dlc: len as u8,
            data,
        })
    }
}

/// Driver for one MCP2515 attached over SPI with its interrupt output on a
/// GPIO line.
pub struct Mcp2515<S, G> {
    shared: Arc<Shared<S>>,
    /// Interrupt line; dropped on close, which unregisters the callback.
    irq: Option<G>,
    worker: Option<thread::JoinHandle<()>>,
    events: mpsc::Sender<Event>,
}

impl<S, G> Mcp2515<S, G>
where
    S: SpiDevice + 'static,
    G: InterruptPin,
{
    /// Opens the named SPI bus and GPIO pin through `peripherals` and
    /// builds a controller on them.
    pub fn open<P>(
        peripherals: &mut P,
        spi_bus: &str,
        int_pin: &str,
        config: &Config,
    ) -> Result<Self>
    where
        P: Peripherals<Spi = S, Int = G>,
    {
        let spi = peripherals.open_spi(spi_bus)?;
        let irq = peripherals.open_gpio(int_pin)?;
        Self::new(spi, irq, config)
    }

    /// Builds a controller on already-opened handles, resetting and
    /// configuring the chip.
    ///
    /// Any I/O failure is fatal: the handles are released and no partial
    /// controller is returned.
    pub fn new(spi: S, mut irq: G, config: &Config) -> Result<Self> {
        let mut bus = Transport::new(spi)?;

        irq.set_direction(Direction::Input)?;
        irq.set_edge_trigger(EdgeTrigger::Falling)?;
        irq.set_active_level(ActiveLevel::High)?;

        configure_chip(&mut bus, config)?;

        let shared = Arc::new(Shared {
            bus: Mutex::new(Some(bus)),
            listener: Mutex::new(None),
            drain: Mutex::new(()),
        });

        let (events, queue) = mpsc::channel();
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("mcp2515-irq".into())
            .spawn(move || {
                for event in queue {
                    match event {
                        Event::Edge => worker_shared.process_interrupt(),
                        Event::Shutdown => break,
                    }
                }
            })?;

        let edge = events.clone();
        let registered = irq.register_callback(Box::new(move || {
            // A send failure means the worker is gone and the controller is
            // closing; the edge can be ignored.
            let _ = edge.send(Event::Edge);
        }));
        if let Err(e) = registered {
            let _ = events.send(Event::Shutdown);
            let _ = worker.join();
            return Err(e.into());
        }

        Ok(Mcp2515 {
            shared,
            irq: Some(irq),
            worker: Some(worker),
            events,
        })
    }

    /// Installs `listener`, replacing any previously registered one.
    /// Subsequent deliveries go only to `listener`; it runs on the
    /// interrupt worker thread and must not block indefinitely.
    pub fn set_listener(&self, listener: impl FnMut(CanMessage) + Send + 'static) {
        *self.shared.listener.lock() = Some(Box::new(listener));
    }

    /// Removes the listener; subsequent frames are dropped after
    /// flag-clearing.
    pub fn clear_listener(&self) {
        *self.shared.listener.lock() = None;
    }

    /// Runs one interrupt-handling pass, as the worker does on every edge.
    ///
    /// Public so the receive path can be driven without a live interrupt
    /// line. Must not be called from inside the listener.
    pub fn process_interrupt(&self) {
        self.shared.process_interrupt();
    }

    /// Reads one frame out of `buffer`.
    ///
    /// Fails with [`Error::BadDataLength`] when the buffer declares more
    /// than 8 data bytes; no truncated frame is ever returned.
    pub fn read_message(&self, buffer: RxBuffer) -> Result<CanMessage> {
        self.shared.read_message(buffer)
    }

    /// Loads `message` into a transmit buffer and requests transmission.
    ///
    /// Returns as soon as arbitration is requested; completion is not
    /// surfaced.
    pub fn send_message(&self, buffer: TxBuffer, message: &CanMessage) -> Result<()> {
        let mut guard = self.shared.bus.lock();
        let bus = guard.as_mut().ok_or(Error::Closed)?;

        // One contiguous block starting at TXBnCTRL: control byte, the
        // five identifier/DLC bytes, then the payload.
        let mut frame = [0u8; 16];
        frame[0] = Command::Write as u8;
        frame[1] = buffer.ctrl_register() as u8;
        frame[2] = 0x00;
        frame[3..8].copy_from_slice(&TxIdent::from_message(message).into_bytes());
        let dlc = message.dlc();
        frame[8..8 + dlc].copy_from_slice(message.data());
        bus.send(&frame[..8 + dlc])?;

        bus.send(&[buffer.rts_opcode() as u8])?;
        Ok(())
    }

    /// Reads the quick-status byte in a single two-byte exchange.
    pub fn read_status(&self) -> Result<QuickStatus> {
        let mut guard = self.shared.bus.lock();
        let bus = guard.as_mut().ok_or(Error::Closed)?;
        let mut frame = [Command::ReadStatus as u8, 0x00];
        bus.exchange(&mut frame)?;
        Ok(QuickStatus::from_bytes([frame[1]]))
    }

    /// Takes a read-only snapshot of the status and error registers and the
    /// interrupt line level. No controller state changes.
    pub fn dump_registers(&self) -> Result<RegisterDump> {
        let int_level = self.irq.as_ref().ok_or(Error::Closed)?.level()?;

        let mut guard = self.shared.bus.lock();
        let bus = guard.as_mut().ok_or(Error::Closed)?;
        let canstat = bus.read_register(Register::CANSTAT)?;
        let eflg = bus.read_register(Register::EFLG)?;
        let tec = bus.read_register(Register::TEC)?;
        let rec = bus.read_register(Register::REC)?;
        let canintf = bus.read_register(Register::CANINTF)?;
        let rxb0dlc = bus.read_register(Register::RXB0DLC)?;
        let rxb0sidh = bus.read_register(Register::RXB0SIDH)?;
        let rxb0sidl = bus.read_register(Register::RXB0SIDL)?;

        // The chip auto-increments the address, so one exchange returns
        // both data bytes.
        let mut data = [Command::Read as u8, Register::RXB0DATA as u8, 0x00, 0x00];
        bus.exchange(&mut data)?;

        Ok(RegisterDump {
            canstat,
            eflg,
            tec,
            rec,
            canintf,
            rxb0dlc,
            rxb0sidh,
            rxb0sidl,
            rxb0data: [data[2], data[3]],
            int_level,
        })
    }

    /// Reads a single register. Bring-up and diagnostics aid.
    pub fn read_register(&self, reg: Register) -> Result<u8> {
        let mut guard = self.shared.bus.lock();
        let bus = guard.as_mut().ok_or(Error::Closed)?;
        Ok(bus.read_register(reg)?)
    }

    /// Writes a single register.
    pub fn write_register(&self, reg: Register, value: u8) -> Result<()> {
        let mut guard = self.shared.bus.lock();
        let bus = guard.as_mut().ok_or(Error::Closed)?;
        Ok(bus.write_register(reg, value)?)
    }

    /// Changes only the bits of `reg` selected by `mask`, atomically in the
    /// chip.
    pub fn modify_register(&self, reg: Register, mask: u8, value: u8) -> Result<()> {
        let mut guard = self.shared.bus.lock();
        let bus = guard.as_mut().ok_or(Error::Closed)?;
        Ok(bus.modify_register(reg, mask, value)?)
    }

    /// Releases the interrupt line and the SPI device. Idempotent; also run
    /// on drop.
    ///
    /// After closing, bus operations fail with [`Error::Closed`] and
    /// [`Mcp2515::process_interrupt`] is a no-op.
    pub fn close(&mut self) {
        self.shutdown();
    }
}

impl<S, G> Mcp2515<S, G> {
    fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.events.send(Event::Shutdown);
            let _ = worker.join();
        }
        // Dropping the pin unregisters the edge callback.
        self.irq = None;
        *self.shared.bus.lock() = None;
        *self.shared.listener.lock() = None;
    }
}

impl<S, G> Drop for Mcp2515<S, G> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs the chip configuration sequence: reset, configuration mode,
/// bit timing, filters and masks, interrupt enables, then the requested
/// operation mode.
fn configure_chip<S: SpiDevice>(bus: &mut Transport<S>, config: &Config) -> Result<()> {
    bus.send(&[Command::Reset as u8])?;

    bus.write_register(
        Register::CANCTRL,
        CanCtrl::new()
            .with_reqop(OpMode::Configuration)
            .into_bytes()[0],
    )?;

    bus.write_register(Register::CFG1, config.bit_timing.cfg1)?;
    bus.write_register(Register::CFG2, config.bit_timing.cfg2)?;
    bus.write_register(Register::CFG3, config.bit_timing.cfg3)?;

    bus.write_register(
        Register::RXB0CTRL,
        Rxb0Ctrl::new().with_rxm(RecvBufMode::FilterOn).into_bytes()[0],
    )?;
    let filters = config.filters;
    for (word, sidh, sidl) in [
        (filters.rxf0, Register::RXF0SIDH, Register::RXF0SIDL),
        (filters.rxf1, Register::RXF1SIDH, Register::RXF1SIDL),
        (filters.rxm0, Register::RXM0SIDH, Register::RXM0SIDL),
        (filters.rxm1, Register::RXM1SIDH, Register::RXM1SIDL),
    ] {
        let [high, low] = word.to_be_bytes();
        bus.write_register(sidh, high)?;
        bus.write_register(sidl, low)?;
    }

    bus.write_register(Register::CANINTE, config.interrupts.into_bytes()[0])?;

    bus.write_register(
        Register::CANCTRL,
        CanCtrl::new()
            .with_reqop(config.mode)
            .with_clkpre(ClkPre::Div1)
            .into_bytes()[0],
    )?;
    Ok(())
}

/// Snapshot returned by [`Mcp2515::dump_registers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDump {
    pub canstat: u8,
    pub eflg: u8,
    pub tec: u8,
    pub rec: u8,
    pub canintf: u8,
    pub rxb0dlc: u8,
    pub rxb0sidh: u8,
    pub rxb0sidl: u8,
    /// First two data bytes of receive buffer 0.
    pub rxb0data: [u8; 2],
    /// Current logical level of the interrupt line.
    pub int_level: bool,
}

impl fmt::Display for RegisterDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CANSTAT:  {:#04x}", self.canstat)?;
        writeln!(f, "EFLG:     {:#04x}", self.eflg)?;
        writeln!(f, "TEC:      {:#04x}", self.tec)?;
        writeln!(f, "REC:      {:#04x}", self.rec)?;
        writeln!(f, "CANINTF:  {:#04x}", self.canintf)?;
        writeln!(f, "RXB0DLC:  {:#04x}", self.rxb0dlc)?;
        writeln!(f, "RXB0SIDH: {:#04x}", self.rxb0sidh)?;
        writeln!(f, "RXB0SIDL: {:#04x}", self.rxb0sidl)?;
        writeln!(f, "DATA0:    {:#04x}", self.rxb0data[0])?;
        writeln!(f, "DATA1:    {:#04x}", self.rxb0data[1])?;
        write!(f, "INT:      {}", if self.int_level { "high" } else { "low" })
    }
}
