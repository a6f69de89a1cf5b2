//! # Flash wear-leveling ring
//!
//! Persisted values (program-change base, bank select) each get one small erasable flash segment. Flash on the sort
//! of microcontroller this targets reads as `0xFF` after an erase, and each byte can be written only once per erase
//! cycle. Erase cycles are the scarce resource: segments are typically rated for a minimum of 10,000 erases.
//!
//! Instead of overwriting a single slot (one erase per save), [`WearRing`] treats the segment as an append-only log
//! of single byte values. The current value is always the most recently appended byte, and the segment only needs an
//! erase once all of its slots have been consumed. A 64 byte segment therefore costs one erase per 64 saves, which
//! multiplies the usable lifetime of the part by the segment size.
//!
//! If power is lost after an erase but before the following write, the segment reads as empty and the owning
//! controller falls back to its default value. That is the intended fail-safe; no recovery is attempted.

use crate::config::SEGMENT_LEN;

/// The value flash reads as after an erase, used to detect unwritten slots
///
/// Stored values must never equal the sentinel; the controllers only ever store 7-bit MIDI values so this holds.
pub const ERASE_SENTINEL: u8 = 0xFF;

/// One erasable, byte-programmable flash segment.
///
/// This is the boundary to the hardware flash driver. Implementations are expected to behave like real flash:
/// `erase` reverts every byte of the segment to [`ERASE_SENTINEL`], and `program` may only be called on a byte that
/// has not been written since the last erase.
pub trait Flash {
    /// `f.erase()` erases the whole segment, every byte reads as the sentinel afterwards
    fn erase(&mut self);

    /// `f.program(i, v)` writes `v` into byte `i` of the segment
    fn program(&mut self, index: usize, value: u8);

    /// `f.read(i)` is the current content of byte `i` of the segment
    fn read(&self, index: usize) -> u8;
}

/// A wear-leveling ring over one flash segment is represented here.
///
/// Holds successive values of a single logical byte-sized quantity.
pub struct WearRing<F: Flash> {
    flash: F,
}

impl<F: Flash> WearRing<F> {
    /// `WearRing::new(f)` is a new wear-leveling ring over the segment `f`
    ///
    /// Whatever the segment already contains is picked up as the ring's history; nothing is erased on construction.
    pub fn new(flash: F) -> Self {
        Self { flash }
    }

    /// `ring.empty()` is true iff nothing has been written since the last erase
    pub fn empty(&self) -> bool {
        self.flash.read(0) == ERASE_SENTINEL
    }

    /// `ring.read()` is the most recently written value, or the sentinel if the ring is empty
    pub fn read(&self) -> u8 {
        if self.empty() {
            return ERASE_SENTINEL;
        }

        match self.find_free() {
            Some(free) => self.flash.read(free - 1),
            None => self.flash.read(SEGMENT_LEN - 1),
        }
    }

    /// `ring.write(v)` appends `v` as the new current value
    ///
    /// When the segment is full it is erased first and `v` lands in slot 0; the ring wraps around. Callers conserve
    /// erase cycles by only writing values that differ from `ring.read()`.
    pub fn write(&mut self, value: u8) {
        match self.find_free() {
            Some(free) => self.flash.program(free, value),
            None => {
                self.flash.erase();
                self.flash.program(0, value);
            }
        }
    }

    /// `ring.find_free()` is the index of the first unwritten slot, or `None` when the segment is full
    fn find_free(&self) -> Option<usize> {
        (0..SEGMENT_LEN).find(|&i| self.flash.read(i) == ERASE_SENTINEL)
    }
}

/// A RAM-backed flash segment with real-flash write semantics.
///
/// Programming can only clear bits, the way NOR flash behaves, so writing to an already-written slot corrupts it
/// rather than silently succeeding. Tests and host-side demos use this in place of a hardware driver; the erase
/// counter makes wear observable.
pub struct RamFlash {
    bytes: [u8; SEGMENT_LEN],
    erase_count: u32,
}

impl RamFlash {
    /// `RamFlash::new()` is a freshly erased RAM-backed segment
    pub fn new() -> Self {
        Self {
            bytes: [ERASE_SENTINEL; SEGMENT_LEN],
            erase_count: 0,
        }
    }

    /// `rf.erase_count()` is the number of erases performed so far
    pub fn erase_count(&self) -> u32 {
        self.erase_count
    }
}

impl Default for RamFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl Flash for RamFlash {
    fn erase(&mut self) {
        self.bytes = [ERASE_SENTINEL; SEGMENT_LEN];
        self.erase_count += 1;
    }

    fn program(&mut self, index: usize, value: u8) {
        // programming flash can only clear bits
        self.bytes[index] &= value;
    }

    fn read(&self, index: usize) -> u8 {
        self.bytes[index]
    }
}
