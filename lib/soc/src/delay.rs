//! Cycle-burning delay for bring-up waits.

/// Spins for roughly `cycles` loop iterations. Nothing here needs a real
/// timebase; the one caller only wants "long enough".
pub fn spin_cycles(cycles: u32) {
    for _ in 0..cycles {
        unsafe { core::arch::asm!("nop") };
    }
}
