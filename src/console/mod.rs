// src/console/mod.rs

//! The serial console: received lines in, dispatched replies out.

pub mod transmit;

pub use transmit::Transmitter;

use crate::command::{CommandResponse, Dispatcher, RegisterTable};
use crate::common::{
    config::ConsoleConfig,
    error::Error,
    frame::{FrameAssembler, LineConsumer, LineProducer},
    hal_traits::{MemoryPeek, SerialPort, Timer},
};

/// Foreground half of the command interpreter.
///
/// Lines arrive through a [`LineConsumer`], normally fed from the receive
/// interrupt; [`Console::poll`] dispatches at most one line per call and sends
/// the reply.
pub struct Console<'q, S, TM, P = RegisterTable<'static>>
where
    S: SerialPort,
    TM: Timer,
    P: MemoryPeek,
{
    transmitter: Transmitter<S, TM>,
    lines: LineConsumer<'q>,
    dispatcher: Dispatcher<P>,
    banner: &'static str,
}

impl<'q, S, TM, P> Console<'q, S, TM, P>
where
    S: SerialPort,
    TM: Timer,
    P: MemoryPeek,
{
    pub fn new(serial: S, timer: TM, lines: LineConsumer<'q>, dispatcher: Dispatcher<P>, config: ConsoleConfig) -> Self {
        Console {
            transmitter: Transmitter::new(serial, timer, &config),
            lines,
            dispatcher,
            banner: config.banner,
        }
    }

    /// Sends the start-up banner.
    pub fn greet(&mut self) -> Result<(), Error<S::Error>> {
        self.transmitter.send(self.banner)
    }

    /// Dispatches the waiting line, if any, and transmits its reply.
    ///
    /// Returns the reply so the caller can act on a halt request.
    pub fn poll(&mut self) -> Result<Option<CommandResponse>, Error<S::Error>> {
        let line = match self.lines.take() {
            Some(line) => line,
            None => return Ok(None),
        };
        let response = self.dispatcher.dispatch(line.as_bytes());
        if response.is_halt() {
            log::warn!("halt requested from console");
        }
        self.transmitter.send(response.as_str())?;
        Ok(Some(response))
    }

    /// Drains the receive register into `assembler` for builds without a receive
    /// interrupt. Returns the number of bytes taken.
    pub fn service_rx(
        &mut self,
        assembler: &mut FrameAssembler,
        producer: &mut LineProducer<'_>,
    ) -> Result<usize, Error<S::Error>> {
        let mut taken = 0;
        loop {
            match self.transmitter.serial().read_byte() {
                Ok(byte) => {
                    assembler.feed(producer, byte);
                    taken += 1;
                }
                Err(nb::Error::WouldBlock) => return Ok(taken),
                Err(nb::Error::Other(e)) => return Err(Error::Io(e)),
            }
        }
    }

    pub fn transmitter(&mut self) -> &mut Transmitter<S, TM> {
        &mut self.transmitter
    }

    pub fn dispatcher(&mut self) -> &mut Dispatcher<P> {
        &mut self.dispatcher
    }
}
