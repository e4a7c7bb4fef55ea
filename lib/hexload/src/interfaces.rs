//! Traits describing the hardware the loader drives.
//!
//! The loader only ever touches the board through these four traits. On the
//! real chip they are one volatile access each; on a host they are test
//! doubles with scripts and transcripts.

use crate::session::Phase;

/// Byte-oriented console access.
pub trait Console {
    /// Polls the receiver once, returning `Some(byte)` if one was pending.
    /// Never blocks.
    fn poll(&mut self) -> Option<u8>;

    /// Queues one byte for transmission.
    fn put(&mut self, byte: u8);
}

/// Chip-select plus byte-transfer access to the serial flash.
///
/// There is no framing at this level. Callers bracket a transaction with
/// `begin`/`end` and shift whole command frames through `transfer`
/// themselves; calling `transfer` outside a bracket is a caller bug. The
/// device is assumed present and responsive, so nothing here can fail.
pub trait Flash {
    /// Asserts chip-select, opening a transaction.
    fn begin(&mut self);

    /// Deasserts chip-select, closing the transaction.
    fn end(&mut self);

    /// Shifts `byte` out while shifting the device's next byte in.
    fn transfer(&mut self, byte: u8) -> u8;
}

/// Byte-addressable store for uploaded images.
///
/// Addresses are not validated. The operator aiming an upload is trusted,
/// matching the flat unprotected memory of the target; implementations over
/// real memory put the act of creating one behind `unsafe` instead of
/// checking every store.
pub trait Memory {
    /// Stores `byte` at the absolute address `addr`.
    fn store(&mut self, addr: u32, byte: u8);
}

/// Coarse progress display. Pure output; nothing feeds back into the loader.
pub trait Indicator {
    /// Shows the code for `phase`.
    fn indicate(&mut self, phase: Phase);
}

impl<'a, C: Console> Console for &'a mut C {
    fn poll(&mut self) -> Option<u8> {
        (**self).poll()
    }

    fn put(&mut self, byte: u8) {
        (**self).put(byte)
    }
}

impl<'a, F: Flash> Flash for &'a mut F {
    fn begin(&mut self) {
        (**self).begin()
    }

    fn end(&mut self) {
        (**self).end()
    }

    fn transfer(&mut self, byte: u8) -> u8 {
        (**self).transfer(byte)
    }
}
