#![no_std]

//! The boot ROM's upload protocol, factored out of the firmware so it can be
//! exercised on a host.
//!
//! The protocol is a plain byte stream. An operator (or the `ttyload` tool)
//! drives it with three commands:
//!
//!   * `@` followed by hex digits sets the load cursor. The first non-hex
//!     byte ends the address and is swallowed.
//!   * a pair of hex digits stores one byte at the cursor and advances it.
//!     Whitespace between pairs is ignored.
//!   * a zero byte ends the session; the firmware then jumps to the loaded
//!     image. Anything else is echoed back with a fresh prompt.
//!
//! If the console stays silent for [`STALL_LIMIT`] consecutive polls, the
//! loader gives up on it and streams the same byte protocol out of the
//! serial flash instead, so a board with a programmed flash boots with no
//! host attached. See [`Channel`] for the exact hand-over rules.
//!
//! Everything here is generic over the traits in this crate's root; the
//! `soc` crate implements them over the real registers, and the tests drive
//! them with scripted doubles.

#[cfg(test)]
extern crate std;

pub mod hex;

mod channel;
mod interfaces;
mod session;

#[cfg(test)]
mod tests;

pub use channel::Channel;
pub use interfaces::{Console, Flash, Indicator, Memory};
pub use session::{Phase, Session};

/// Consecutive empty console polls tolerated before the flash fallback
/// engages. The counter survives across calls and saturates here.
pub const STALL_LIMIT: u32 = 1_000_000;

/// Default load cursor, and the address the firmware jumps to when the
/// session ends. Uploads that never send `@` land here.
pub const IMAGE_BASE: u32 = 64 * 1024;

/// Byte offset into the serial flash where the fallback image starts.
pub const FLASH_IMAGE_OFFSET: u32 = 256 * 1024;

/// Flash byte that marks the end of the stored image. Translated to the
/// terminating zero byte so a flash image needs no literal NUL.
pub const SENTINEL: u8 = b'*';

/// Serial flash READ command. A 24-bit big-endian address follows it on
/// the wire.
pub const CMD_READ: u8 = 0x03;

/// The full prompt. The initial prompt skips the leading `".\n"`, the
/// reprint after an echoed byte skips only the `"."`, and the completion
/// report ends with the whole thing.
pub const PROMPT: &str = ".\nBootloader> ";

/// Announced exactly once, just before console output goes quiet for a
/// flash boot.
pub const FLASHBOOT: &str = "FLASHBOOT ";

/// The session's last words before the jump.
pub const RUN: &str = "RUN\n";

/// A `.` progress marker is printed after every this many stored bytes.
pub const PROGRESS_INTERVAL: u32 = 1024;
