use core::mem::size_of;

use volatile::prelude::*;
use volatile::WriteVolatile;

use crate::common::SYS_BASE;

/// The status LED register sits at the bottom of the system block.
const LED_REG_BASE: usize = SYS_BASE;

#[repr(C)]
#[allow(non_snake_case)]
struct Registers {
    LEDS: WriteVolatile<u32>,
}

const _: () = assert!(size_of::<Registers>() == 4);

/// The board's status LEDs. The low bits drive the segments directly.
pub struct Leds {
    registers: &'static mut Registers,
}

impl Leds {
    /// Returns a new handle to the LED register.
    pub fn new() -> Leds {
        Leds {
            registers: unsafe { &mut *(LED_REG_BASE as *mut Registers) },
        }
    }

    /// Drives the segments with the low bits of `pattern`.
    pub fn set(&mut self, pattern: u32) {
        self.registers.LEDS.write(pattern);
    }
}

mod leds_loader {
    use hexload::{Indicator, Phase};

    use super::Leds;

    impl Indicator for Leds {
        fn indicate(&mut self, phase: Phase) {
            self.set(phase as u32);
        }
    }
}
