//! # MIDI output sink
//!
//! The controllers in this crate produce [`MidiMessage`] events and push them into a [`MidiSink`]. They never read
//! anything back; MIDI flows in one direction only.
//!
//! [`MidiQueue`] is the provided sink implementation: a fixed capacity queue which buffers events until the serial
//! layer is ready to drain them as raw bytes. Buffering decouples the 1 kHz control loop from the (slow, 31250 baud)
//! MIDI wire without ever blocking the loop. If events are produced faster than they are drained the newest events
//! are dropped, which for a stream of absolute controller values is harmless: the next update supersedes the lost one.

use heapless::Deque;

use midi_convert::{midi_types::MidiMessage, render_slice::MidiRenderSlice};

/// A consumer of MIDI events.
///
/// Implementors decide what "sending" means: queueing for a UART, pushing USB-MIDI packets, or just recording the
/// events in a test.
pub trait MidiSink {
    /// `sink.send(m)` accepts the MIDI message `m` for transmission
    fn send(&mut self, message: MidiMessage);
}

/// A fixed capacity MIDI output queue is represented here.
///
/// # Generic arguments:
///
/// * `CAPACITY` - the maximum number of buffered messages
pub struct MidiQueue<const CAPACITY: usize> {
    queue: Deque<MidiMessage, CAPACITY>,
}

impl<const CAPACITY: usize> MidiQueue<CAPACITY> {
    /// `MidiQueue::new()` is a new, empty MIDI queue
    pub fn new() -> Self {
        Self { queue: Deque::new() }
    }

    /// `mq.pop()` is the oldest queued message, if any
    pub fn pop(&mut self) -> Option<MidiMessage> {
        self.queue.pop_front()
    }

    /// `mq.len()` is the number of messages currently queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// `mq.is_empty()` is true iff no messages are queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// `mq.drain_bytes(w)` renders every queued message to wire bytes, oldest first, feeding each byte to `w`
    ///
    /// The writer is typically a closure pushing into a UART transmit register or DMA buffer.
    pub fn drain_bytes<W: FnMut(u8)>(&mut self, mut write_byte: W) {
        while let Some(message) = self.queue.pop_front() {
            let mut buf = [0_u8; 3];
            let len = message.render_slice(&mut buf);
            for &byte in &buf[..len] {
                write_byte(byte);
            }
        }
    }
}

impl<const CAPACITY: usize> Default for MidiQueue<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAPACITY: usize> MidiSink for MidiQueue<CAPACITY> {
    fn send(&mut self, message: MidiMessage) {
        // drop the newest event when full, the next absolute update supersedes it
        let _ = self.queue.push_back(message);
    }
}

/// A plain `heapless::Vec` also works as a sink, which is handy for inspecting emitted messages in tests.
impl<const CAPACITY: usize> MidiSink for heapless::Vec<MidiMessage, CAPACITY> {
    fn send(&mut self, message: MidiMessage) {
        self.push(message).ok();
    }
}
