use crate::channel::Channel;
use crate::hex;
use crate::interfaces::{Console, Flash, Indicator, Memory};
use crate::{IMAGE_BASE, PROGRESS_INTERVAL, PROMPT, RUN};

/// Where the command loop currently is, as shown on the status indicator.
/// The discriminants are the three-segment patterns on the board.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Session over, jump imminent. LEDs `...`
    Done = 0,
    /// Bring-up finished, first prompt out. LEDs `..O`
    Ready = 1,
    /// Waiting on the next protocol byte. LEDs `.O.`
    Await = 2,
    /// Byte in hand, dispatching. LEDs `.OO`
    Dispatch = 3,
    /// Checking for an upload pair. LEDs `O..`
    Pair = 4,
    /// Checking for whitespace. LEDs `O.O`
    Filter = 5,
    /// Echoing unexpected input. LEDs `OO.`
    Echo = 6,
}

/// One upload session: the load cursor and the number of bytes stored since
/// it was last programmed.
pub struct Session {
    pub(crate) cursor: u32,
    pub(crate) count: u32,
}

impl Session {
    /// Returns a fresh session with the cursor at [`IMAGE_BASE`].
    pub fn new() -> Session {
        Session {
            cursor: IMAGE_BASE,
            count: 0,
        }
    }

    /// Runs the command loop until the terminating zero byte, leaving the
    /// loaded image behind in `mem`. The caller jumps to it afterwards.
    pub fn run<C, F, M, I>(&mut self, chan: &mut Channel<C, F>, mem: &mut M, leds: &mut I)
    where
        C: Console,
        F: Flash,
        M: Memory,
        I: Indicator,
    {
        loop {
            leds.indicate(Phase::Await);
            let ch = chan.get();
            leds.indicate(Phase::Dispatch);

            if ch == 0 || ch == b'@' {
                if self.count > 0 {
                    self.report(chan);
                }

                if ch == 0 {
                    // Reopen the console before the last words: "RUN" is
                    // worth seeing even when the image came from flash.
                    chan.reset_fallback();
                    chan.puts(RUN);
                    break;
                }

                self.cursor = read_address(chan);
                self.count = 0;
                continue;
            }

            leds.indicate(Phase::Pair);

            if let Some(hi) = hex::from_hex(ch) {
                let second = chan.get();
                if let Some(lo) = hex::from_hex(second) {
                    mem.store(self.cursor.wrapping_add(self.count), (hi << 4) | lo);
                    self.count += 1;
                    if self.count % PROGRESS_INTERVAL == 0 {
                        chan.put(b'.');
                    }
                } else {
                    // Not a pair after all. Echo the first byte bare, then
                    // let the second take the unexpected-input path so one
                    // prompt follows both.
                    chan.put(ch);
                    echo_and_reprompt(chan, leds, second);
                }
                continue;
            }

            leds.indicate(Phase::Filter);

            if ch == b' ' || ch == b'\t' || ch == b'\r' || ch == b'\n' {
                continue;
            }

            echo_and_reprompt(chan, leds, ch);
        }

        leds.indicate(Phase::Done);
    }

    /// Emits the completion report for the run of bytes since the last
    /// address-set, followed by a full prompt.
    fn report<C: Console, F: Flash>(&self, chan: &mut Channel<C, F>) {
        chan.puts("\nWritten 0x");
        chan.put_hex32(self.count);
        chan.puts(" bytes at 0x");
        chan.put_hex32(self.cursor);
        chan.puts(PROMPT);
    }
}

/// Accumulates hex digits into an address until the first non-hex byte,
/// which is consumed without an echo. Overlong input keeps the low 32 bits.
fn read_address<C: Console, F: Flash>(chan: &mut Channel<C, F>) -> u32 {
    let mut addr: u32 = 0;
    loop {
        match hex::from_hex(chan.get()) {
            Some(digit) => addr = (addr << 4) | digit as u32,
            None => return addr,
        }
    }
}

/// Echoes one unexpected byte and reprints the prompt on a fresh line.
fn echo_and_reprompt<C, F, I>(chan: &mut Channel<C, F>, leds: &mut I, byte: u8)
where
    C: Console,
    F: Flash,
    I: Indicator,
{
    leds.indicate(Phase::Echo);
    chan.put(byte);
    chan.puts(&PROMPT[1..]);
}
