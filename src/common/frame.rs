// src/common/frame.rs

//! Byte-at-a-time assembly of carriage-return terminated command lines, and the
//! single-slot hand-off of completed lines from interrupt to foreground context.

use super::error::Error;
use heapless::spsc::{Consumer, Producer, Queue};
use heapless::Vec;

/// Longest stored line; the byte that would exceed it ends the line instead.
pub const MAX_LINE_LEN: usize = 255;
/// Line terminator (carriage return). Never stored.
pub const LINE_TERMINATOR: u8 = b'\r';

/// One received command line, terminator excluded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine(Vec<u8, MAX_LINE_LEN>);

impl CommandLine {
    pub const fn new() -> Self {
        CommandLine(Vec::new())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error<()>> {
        Vec::from_slice(bytes).map(CommandLine).map_err(|_| Error::BufferOverflow {
            needed: bytes.len(),
            got: MAX_LINE_LEN,
        })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The line as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.0).ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collects received bytes until a terminator or a full buffer completes a line.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: Vec<u8, MAX_LINE_LEN>,
}

impl FrameAssembler {
    pub const fn new() -> Self {
        FrameAssembler { buffer: Vec::new() }
    }

    /// Accepts one received byte. Returns the completed line when `byte` is the
    /// terminator, or when the buffer was already full (that byte is discarded).
    ///
    /// A NUL ends the line's content; anything after it up to the terminator is
    /// received but not kept.
    pub fn push(&mut self, byte: u8) -> Option<CommandLine> {
        if byte != LINE_TERMINATOR && !self.buffer.is_full() {
            // Cannot fail, fullness checked above.
            let _ = self.buffer.push(byte);
            return None;
        }
        let mut line = core::mem::take(&mut self.buffer);
        if let Some(nul) = line.iter().position(|&b| b == 0) {
            line.truncate(nul);
        }
        Some(CommandLine(line))
    }

    /// `push` followed by publishing any completed line. Intended for the receive
    /// interrupt handler; returns `true` if a line was handed off.
    pub fn feed(&mut self, producer: &mut LineProducer<'_>, byte: u8) -> bool {
        match self.push(byte) {
            Some(line) => producer.publish(line).is_ok(),
            None => false,
        }
    }

    /// Bytes collected for the line in progress.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Single-producer single-consumer slot for completed lines.
///
/// Holds at most one unconsumed line. A line completed while the previous one
/// is still waiting is dropped and counted by the producer.
pub struct LineChannel {
    queue: Queue<CommandLine, 2>,
}

impl LineChannel {
    pub const fn new() -> Self {
        LineChannel { queue: Queue::new() }
    }

    pub fn split(&mut self) -> (LineProducer<'_>, LineConsumer<'_>) {
        let (producer, consumer) = self.queue.split();
        (LineProducer { inner: producer, dropped: 0 }, LineConsumer { inner: consumer })
    }
}

impl Default for LineChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side end of a [`LineChannel`].
pub struct LineProducer<'a> {
    inner: Producer<'a, CommandLine, 2>,
    dropped: u32,
}

impl<'a> LineProducer<'a> {
    /// Publishes `line`, or hands it back if the previous line is unconsumed.
    pub fn publish(&mut self, line: CommandLine) -> Result<(), CommandLine> {
        self.inner.enqueue(line).inspect_err(|_| {
            self.dropped = self.dropped.wrapping_add(1);
            log::warn!("command line dropped, previous line not yet consumed");
        })
    }

    /// Lines dropped because the consumer had not caught up.
    pub fn dropped_lines(&self) -> u32 {
        self.dropped
    }
}

/// Foreground end of a [`LineChannel`].
pub struct LineConsumer<'a> {
    inner: Consumer<'a, CommandLine, 2>,
}

impl<'a> LineConsumer<'a> {
    /// Takes the waiting line, if any. Each line is returned exactly once.
    pub fn take(&mut self) -> Option<CommandLine> {
        self.inner.dequeue()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready()
    }
}
