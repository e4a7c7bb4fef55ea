use std::collections::BTreeMap;
use std::string::String;
use std::vec;
use std::vec::Vec;

use crate::{Channel, Console, Flash, Indicator, Memory, Phase, Session};
use crate::{CMD_READ, IMAGE_BASE, SENTINEL, STALL_LIMIT};

/// Console double driven by a script of poll outcomes. Once the script runs
/// dry, every further poll comes back empty.
struct ScriptConsole {
    script: Vec<Option<u8>>,
    cursor: usize,
    polls: usize,
    sent: Vec<u8>,
}

impl ScriptConsole {
    fn new(script: Vec<Option<u8>>) -> ScriptConsole {
        ScriptConsole {
            script,
            cursor: 0,
            polls: 0,
            sent: Vec::new(),
        }
    }

    /// A console with every byte immediately available.
    fn live(bytes: &[u8]) -> ScriptConsole {
        ScriptConsole::new(bytes.iter().map(|b| Some(*b)).collect())
    }

    /// A console that never produces a byte.
    fn silent() -> ScriptConsole {
        ScriptConsole::new(Vec::new())
    }

    fn output(&self) -> String {
        String::from_utf8(self.sent.clone()).unwrap()
    }
}

impl Console for ScriptConsole {
    fn poll(&mut self) -> Option<u8> {
        self.polls += 1;
        let next = self.script.get(self.cursor).copied().flatten();
        if self.cursor < self.script.len() {
            self.cursor += 1;
        }
        next
    }

    fn put(&mut self, byte: u8) {
        self.sent.push(byte);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlashOp {
    Begin,
    End,
    /// The byte the loader shifted out.
    Transfer(u8),
}

/// Flash double: records the op sequence and answers data shifts from a
/// canned stream. The first four transfers after `begin` carry the command
/// frame and answer zero; an exhausted stream answers the end sentinel.
struct ScriptFlash {
    stream: Vec<u8>,
    pos: usize,
    ops: Vec<FlashOp>,
    since_begin: usize,
}

impl ScriptFlash {
    fn new(stream: Vec<u8>) -> ScriptFlash {
        ScriptFlash {
            stream,
            pos: 0,
            ops: Vec::new(),
            since_begin: 0,
        }
    }
}

impl Flash for ScriptFlash {
    fn begin(&mut self) {
        self.ops.push(FlashOp::Begin);
        self.since_begin = 0;
    }

    fn end(&mut self) {
        self.ops.push(FlashOp::End);
    }

    fn transfer(&mut self, byte: u8) -> u8 {
        self.ops.push(FlashOp::Transfer(byte));
        self.since_begin += 1;
        if self.since_begin <= 4 {
            return 0;
        }
        let out = self.stream.get(self.pos).copied().unwrap_or(SENTINEL);
        self.pos += 1;
        out
    }
}

/// Memory double over a sparse map.
struct SparseRam {
    cells: BTreeMap<u32, u8>,
}

impl SparseRam {
    fn new() -> SparseRam {
        SparseRam {
            cells: BTreeMap::new(),
        }
    }

    fn get(&self, addr: u32) -> Option<u8> {
        self.cells.get(&addr).copied()
    }

    fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Memory for SparseRam {
    fn store(&mut self, addr: u32, byte: u8) {
        self.cells.insert(addr, byte);
    }
}

/// Indicator double that records every phase change.
struct LedLog {
    phases: Vec<Phase>,
}

impl LedLog {
    fn new() -> LedLog {
        LedLog { phases: Vec::new() }
    }
}

impl Indicator for LedLog {
    fn indicate(&mut self, phase: Phase) {
        self.phases.push(phase);
    }
}

/// Runs a whole session over a fully live console.
fn run_live(input: &[u8]) -> (String, SparseRam, Session, Vec<Phase>) {
    let mut con = ScriptConsole::live(input);
    let mut flash = ScriptFlash::new(Vec::new());
    let mut ram = SparseRam::new();
    let mut leds = LedLog::new();
    let mut session = Session::new();
    {
        let mut chan = Channel::new(&mut con, &mut flash);
        session.run(&mut chan, &mut ram, &mut leds);
    }
    (con.output(), ram, session, leds.phases)
}

#[test]
fn live_bytes_reset_the_stall_counter() {
    let mut script = vec![None; (STALL_LIMIT - 1) as usize];
    script.push(Some(b'x'));
    script.extend(vec![None; (STALL_LIMIT - 1) as usize]);
    script.push(Some(b'y'));

    let mut con = ScriptConsole::new(script);
    let mut flash = ScriptFlash::new(Vec::new());
    let mut chan = Channel::new(&mut con, &mut flash);

    // Two runs of limit-minus-one empty polls, each ended by a live byte.
    // Neither run trips the fallback.
    assert_eq!(chan.get(), b'x');
    assert_eq!(chan.stall, 0);
    assert_eq!(chan.get(), b'y');
    assert_eq!(chan.stall, 0);
    assert!(!chan.fallback);

    drop(chan);
    assert_eq!(con.polls, 2 * STALL_LIMIT as usize);
    assert!(flash.ops.is_empty());
}

#[test]
fn fallback_engages_at_the_poll_limit() {
    let mut con = ScriptConsole::silent();
    let mut flash = ScriptFlash::new(vec![0x41]);
    let mut chan = Channel::new(&mut con, &mut flash);

    assert_eq!(chan.get(), 0x41);
    assert!(chan.fallback);
    assert_eq!(chan.stall, STALL_LIMIT);

    drop(chan);
    assert_eq!(con.polls, STALL_LIMIT as usize);
    assert_eq!(con.output(), "FLASHBOOT ");

    // READ at 0x040000, then one data shift.
    assert_eq!(
        flash.ops,
        vec![
            FlashOp::End,
            FlashOp::Begin,
            FlashOp::Transfer(CMD_READ),
            FlashOp::Transfer(0x04),
            FlashOp::Transfer(0x00),
            FlashOp::Transfer(0x00),
            FlashOp::Transfer(0x00),
        ]
    );
}

#[test]
fn fallback_reads_bypass_the_console() {
    let mut con = ScriptConsole::silent();
    let mut flash = ScriptFlash::new(vec![1, 2, 3]);
    let mut chan = Channel::new(&mut con, &mut flash);

    assert_eq!(chan.get(), 1);
    assert_eq!(chan.get(), 2);
    assert_eq!(chan.get(), 3);

    drop(chan);
    // All polling happened before the first byte; the other two cost none.
    assert_eq!(con.polls, STALL_LIMIT as usize);
    assert_eq!(flash.ops.len(), 9);
}

#[test]
fn announcement_happens_once_then_output_is_swallowed() {
    let mut con = ScriptConsole::silent();
    let mut flash = ScriptFlash::new(vec![0x41]);
    let mut chan = Channel::new(&mut con, &mut flash);

    assert_eq!(chan.get(), 0x41);
    chan.put(b'z');
    chan.puts("quiet");
    chan.put_hex32(0xdead_beef);

    // Exhausted stream reads as the sentinel.
    assert_eq!(chan.get(), 0);

    drop(chan);
    assert_eq!(con.output(), "FLASHBOOT ");
}

#[test]
fn sentinel_terminates_and_closes_the_flash() {
    let mut con = ScriptConsole::silent();
    let mut flash = ScriptFlash::new(vec![0x41, SENTINEL]);
    let mut chan = Channel::new(&mut con, &mut flash);

    assert_eq!(chan.get(), 0x41);
    assert_eq!(chan.get(), 0);

    drop(chan);
    assert_eq!(flash.ops.last(), Some(&FlashOp::End));
}

#[test]
fn put_hex32_pads_to_eight_digits() {
    let mut con = ScriptConsole::live(b"");
    let mut flash = ScriptFlash::new(Vec::new());
    let mut chan = Channel::new(&mut con, &mut flash);

    chan.put_hex32(0xdead_beef);
    chan.put_hex32(0x2);

    drop(chan);
    assert_eq!(con.output(), "deadbeef00000002");
}

#[test]
fn upload_lands_at_the_default_cursor() {
    let (out, ram, session, _) = run_live(b"4142\0");

    assert_eq!(ram.get(IMAGE_BASE), Some(0x41));
    assert_eq!(ram.get(IMAGE_BASE + 1), Some(0x42));
    assert_eq!(session.count, 2);
    assert_eq!(
        out,
        "\nWritten 0x00000002 bytes at 0x00010000.\nBootloader> RUN\n"
    );
}

#[test]
fn upload_round_trip_reports_count_and_cursor() {
    // The dot after the address is its terminator, not a progress marker.
    let (out, ram, session, _) = run_live(b"@2000.4142\0");

    assert_eq!(session.cursor, 0x2000);
    assert_eq!(session.count, 2);
    assert_eq!(ram.get(0x2000), Some(0x41));
    assert_eq!(ram.get(0x2001), Some(0x42));
    assert_eq!(
        out,
        "\nWritten 0x00000002 bytes at 0x00002000.\nBootloader> RUN\n"
    );
}

#[test]
fn address_set_moves_the_cursor_and_swallows_the_terminator() {
    let (out, ram, session, _) = run_live(b"@1000Z4142\0");

    assert_eq!(session.cursor, 0x1000);
    assert_eq!(ram.get(0x1000), Some(0x41));
    assert_eq!(ram.get(0x1001), Some(0x42));
    assert!(!out.contains('Z'));
    assert_eq!(
        out,
        "\nWritten 0x00000002 bytes at 0x00001000.\nBootloader> RUN\n"
    );
}

#[test]
fn overlong_address_keeps_the_low_bits() {
    let (out, ram, session, _) = run_live(b"@123456789\n\0");

    assert_eq!(session.cursor, 0x2345_6789);
    assert!(ram.is_empty());
    assert_eq!(out, "RUN\n");
}

#[test]
fn whitespace_separates_pairs() {
    let (out, ram, _, _) = run_live(b" 41\t42\r\n43 \0");

    assert_eq!(ram.get(IMAGE_BASE), Some(0x41));
    assert_eq!(ram.get(IMAGE_BASE + 1), Some(0x42));
    assert_eq!(ram.get(IMAGE_BASE + 2), Some(0x43));
    assert_eq!(
        out,
        "\nWritten 0x00000003 bytes at 0x00010000.\nBootloader> RUN\n"
    );
}

#[test]
fn unexpected_byte_echoes_with_a_fresh_prompt() {
    let (out, ram, session, _) = run_live(b"#\0");

    assert!(ram.is_empty());
    assert_eq!(session.cursor, IMAGE_BASE);
    assert_eq!(session.count, 0);
    assert_eq!(out, "#\nBootloader> RUN\n");
}

#[test]
fn broken_pair_echoes_both_bytes_before_one_prompt() {
    let (out, ram, _, _) = run_live(b"4z\0");

    assert!(ram.is_empty());
    assert_eq!(out, "4z\nBootloader> RUN\n");
}

#[test]
fn bare_terminator_skips_the_report() {
    let (out, ram, _, _) = run_live(b"\0");

    assert!(ram.is_empty());
    assert_eq!(out, "RUN\n");
}

#[test]
fn repositioning_reports_the_finished_run_first() {
    let (out, ram, session, _) = run_live(b"41@2000\n\0");

    assert_eq!(ram.get(IMAGE_BASE), Some(0x41));
    assert_eq!(session.cursor, 0x2000);
    assert_eq!(
        out,
        "\nWritten 0x00000001 bytes at 0x00010000.\nBootloader> RUN\n"
    );
}

#[test]
fn progress_dot_after_each_kibibyte() {
    let mut input = Vec::new();
    input.extend_from_slice(b"@3000.");
    for _ in 0..2049 {
        input.extend_from_slice(b"42");
    }
    input.push(0);

    let (out, ram, session, _) = run_live(&input);

    assert_eq!(session.count, 2049);
    assert_eq!(ram.get(0x3000), Some(0x42));
    assert_eq!(ram.get(0x3000 + 2048), Some(0x42));
    assert_eq!(
        out,
        "..\nWritten 0x00000801 bytes at 0x00003000.\nBootloader> RUN\n"
    );
}

#[test]
fn indicator_tracks_the_loop() {
    let (_, _, _, phases) = run_live(b"#\0");

    assert_eq!(
        phases,
        vec![
            Phase::Await,
            Phase::Dispatch,
            Phase::Pair,
            Phase::Filter,
            Phase::Echo,
            Phase::Await,
            Phase::Dispatch,
            Phase::Done,
        ]
    );
}

#[test]
fn flash_stream_drives_a_whole_session() {
    let mut con = ScriptConsole::silent();
    let mut flash = ScriptFlash::new(b"@4000 4142*".to_vec());
    let mut ram = SparseRam::new();
    let mut leds = LedLog::new();
    let mut session = Session::new();

    let (fallback_after, stall_after) = {
        let mut chan = Channel::new(&mut con, &mut flash);
        session.run(&mut chan, &mut ram, &mut leds);
        (chan.fallback, chan.stall)
    };

    assert_eq!(session.cursor, 0x4000);
    assert_eq!(session.count, 2);
    assert_eq!(ram.get(0x4000), Some(0x41));
    assert_eq!(ram.get(0x4001), Some(0x42));

    // The report is swallowed; the hand-over announcement and the final
    // RUN are not.
    assert_eq!(con.output(), "FLASHBOOT RUN\n");
    assert!(!fallback_after);
    assert_eq!(stall_after, STALL_LIMIT);
    assert_eq!(con.polls, STALL_LIMIT as usize);
}
