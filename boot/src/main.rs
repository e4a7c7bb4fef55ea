#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

//! The boot ROM: wakes the serial flash, prints a prompt, runs one upload
//! session over the console (or, if nobody is talking, straight from
//! flash), then jumps to whatever got loaded.

#[cfg(target_os = "none")]
mod init;

use hexload::{Channel, Indicator, Phase, Session, IMAGE_BASE, PROMPT};
use soc::console::Console;
use soc::delay;
use soc::leds::Leds;
use soc::mem::RawMemory;
use soc::spiflash::SpiFlash;

/// Cycles burned at power-on while the flash chip wakes up. Skipped under
/// the testbench, whose flash model is ready immediately.
const FLASH_WAKE_CYCLES: u32 = 100_000;

cfg_if::cfg_if! {
    if #[cfg(target_os = "none")] {
        /// Branches to the loaded image. No saved state, no way back.
        unsafe fn launch(addr: u32) -> ! {
            core::arch::asm!("jr {0}", in(reg) addr as usize, options(noreturn))
        }
    } else {
        /// The firmware proper only exists for the bare-metal target; a
        /// host build of this crate is a compile check.
        fn main() {}

        unsafe fn launch(addr: u32) -> ! {
            unreachable!("no image to launch at {:#x}", addr)
        }
    }
}

/// Parks the core.
fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[no_mangle]
pub extern "C" fn bmain() -> ! {
    let mut leds = Leds::new();
    let mut flash = SpiFlash::new();

    if !flash.in_simulation() {
        delay::spin_cycles(FLASH_WAKE_CYCLES);
    }
    flash.power_up();
    let simulated = flash.in_simulation();

    let mut chan = Channel::new(Console::new(), flash);

    if simulated {
        // Prove the core came up, then park: the testbench watches the
        // console and never drives a session.
        chan.puts(&PROMPT[2..]);
        chan.puts("TESTBENCH\n");
        halt();
    }

    leds.indicate(Phase::Ready);
    chan.puts(&PROMPT[2..]);

    let mut mem = unsafe { RawMemory::new() };
    let mut session = Session::new();
    session.run(&mut chan, &mut mem, &mut leds);

    unsafe { launch(IMAGE_BASE) }
}
