use crate::hex;
use crate::interfaces::{Console, Flash};
use crate::{CMD_READ, FLASHBOOT, FLASH_IMAGE_OFFSET, SENTINEL, STALL_LIMIT};

/// The byte channel between the protocol loop and the outside world.
///
/// On the input side, [`Channel::get`] polls the console until it has been
/// empty for [`STALL_LIMIT`] polls in a row, then gives up on it for good:
/// it opens a read of the serial flash at [`FLASH_IMAGE_OFFSET`] and serves
/// every later `get` from that stream, one transferred byte per call. The
/// stall counter saturates, so once the hand-over happens no later call so
/// much as glances at the console. Only [`SENTINEL`] ends the stream, and it
/// arrives translated to the protocol's terminating zero byte.
///
/// On the output side, everything is written through to the console until
/// the hand-over, and swallowed after it. The one exception is the
/// [`FLASHBOOT`] announcement itself, which is pushed out just before the
/// latch flips so an attached terminal learns why the loader went quiet.
pub struct Channel<C: Console, F: Flash> {
    console: C,
    flash: F,
    /// Consecutive empty polls. Reset by every live byte, saturated at
    /// `STALL_LIMIT` from the hand-over on.
    pub(crate) stall: u32,
    /// Set at hand-over, cleared only by [`Channel::reset_fallback`].
    pub(crate) fallback: bool,
}

impl<C: Console, F: Flash> Channel<C, F> {
    pub fn new(console: C, flash: F) -> Channel<C, F> {
        Channel {
            console,
            flash,
            stall: 0,
            fallback: false,
        }
    }

    /// Returns the next protocol byte, from the console or from the flash.
    ///
    /// Blocks until a byte is available. A silent console only costs the
    /// polling budget once: the first call after the hand-over finds the
    /// counter already saturated and goes straight to the flash.
    pub fn get(&mut self) -> u8 {
        while self.stall < STALL_LIMIT {
            self.stall += 1;
            if let Some(byte) = self.console.poll() {
                self.stall = 0;
                return byte;
            }
        }

        if !self.fallback {
            // Announce first, while the latch is still clear and output
            // still reaches the console.
            self.puts(FLASHBOOT);
            self.fallback = true;

            self.flash.end();
            self.flash.begin();
            self.flash.transfer(CMD_READ);
            self.flash.transfer((FLASH_IMAGE_OFFSET >> 16) as u8);
            self.flash.transfer((FLASH_IMAGE_OFFSET >> 8) as u8);
            self.flash.transfer(FLASH_IMAGE_OFFSET as u8);
        }

        let byte = self.flash.transfer(0x00);
        if byte == SENTINEL {
            self.flash.end();
            return 0;
        }

        byte
    }

    /// Writes one byte to the console. Swallowed during a flash boot.
    pub fn put(&mut self, byte: u8) {
        if !self.fallback {
            self.console.put(byte);
        }
    }

    /// Writes a string to the console. Swallowed during a flash boot.
    pub fn puts(&mut self, s: &str) {
        for byte in s.bytes() {
            self.put(byte);
        }
    }

    /// Writes `val` as exactly eight lowercase hex digits, most significant
    /// first.
    pub fn put_hex32(&mut self, val: u32) {
        for shift in (0..8).rev() {
            self.put(hex::to_hex((val >> (shift * 4)) as u8));
        }
    }

    /// Reopens console output. The session calls this on normal termination
    /// so the final words are visible even after a flash boot; the stall
    /// counter stays saturated, which no longer matters once the jump is
    /// imminent.
    pub fn reset_fallback(&mut self) {
        self.fallback = false;
    }
}
