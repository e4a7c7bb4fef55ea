use core::arch::global_asm;
use core::fmt::Write;
use core::panic::PanicInfo;

use soc::console::Console;

// Reset entry: set the stack to the top of the boot region, then hand off.
// bmain never returns.
global_asm!(
    r#"
    .section .text.start
    .globl _start
_start:
    la sp, __stack_top
    call bmain
1:  j 1b
    "#
);

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    let mut console = Console::new();
    let _ = write!(console, "\n! {}\n", info);
    loop {
        core::hint::spin_loop();
    }
}
