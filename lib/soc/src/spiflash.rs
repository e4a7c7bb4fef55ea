use core::mem::size_of;

use volatile::prelude::*;
use volatile::Volatile;

use crate::common::SYS_BASE;

/// Flash interface registers, directly above the LED register.
const SPI_REG_BASE: usize = SYS_BASE + 0x4;

/// Chip-select line in `CTRL`. Active low: cleared while a transaction is
/// open.
const CS_BIT: u32 = 1 << 3;

/// Set in `CTRL` when the design is running under the HDL testbench.
const SIM_BIT: u32 = 1 << 31;

/// Release-from-power-down command.
const CMD_POWER_UP: u8 = 0xab;

#[repr(C)]
#[allow(non_snake_case)]
struct Registers {
    CTRL: Volatile<u32>,
    DATA: Volatile<u32>,
}

const _: () = assert!(size_of::<Registers>() == 8);

/// The bit-banged serial flash interface.
///
/// `begin` and `end` bracket a transaction; `transfer` shifts one byte each
/// way. Framing (command byte, address, payload) is the caller's business.
pub struct SpiFlash {
    registers: &'static mut Registers,
}

impl SpiFlash {
    /// Returns a new handle to the flash interface.
    pub fn new() -> SpiFlash {
        SpiFlash {
            registers: unsafe { &mut *(SPI_REG_BASE as *mut Registers) },
        }
    }

    /// Asserts chip-select, opening a transaction.
    pub fn begin(&mut self) {
        self.registers.CTRL.and_mask(!CS_BIT);
    }

    /// Deasserts chip-select, closing the transaction.
    pub fn end(&mut self) {
        self.registers.CTRL.or_mask(CS_BIT);
    }

    /// Shifts `byte` out while shifting the device's answer in. The write
    /// stalls the core until the exchange is done; only call this inside a
    /// `begin`/`end` bracket.
    pub fn transfer(&mut self, byte: u8) -> u8 {
        self.registers.DATA.write(byte as u32);
        self.registers.DATA.read() as u8
    }

    /// Wakes the chip with the release-from-power-down command. Issued once
    /// at boot; the matching power-down is never sent.
    pub fn power_up(&mut self) {
        self.begin();
        self.transfer(CMD_POWER_UP);
        self.end();
    }

    /// Returns `true` under the HDL testbench, `false` on real hardware.
    pub fn in_simulation(&self) -> bool {
        self.registers.CTRL.has_mask(SIM_BIT)
    }
}

mod flash_loader {
    use hexload::Flash;

    use super::SpiFlash;

    impl Flash for SpiFlash {
        fn begin(&mut self) {
            SpiFlash::begin(self)
        }

        fn end(&mut self) {
            SpiFlash::end(self)
        }

        fn transfer(&mut self, byte: u8) -> u8 {
            SpiFlash::transfer(self, byte)
        }
    }
}
