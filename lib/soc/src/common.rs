/// The base address of the system block: status LEDs, then the SPI flash
/// interface directly above them.
pub const SYS_BASE: usize = 0x2000_0000;

/// The base address of the console block.
pub const CONSOLE_BASE: usize = 0x3000_0000;
