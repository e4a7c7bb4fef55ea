use core::fmt;
use core::mem::size_of;

use volatile::prelude::*;
use volatile::Volatile;

use crate::common::CONSOLE_BASE;

#[repr(C)]
#[allow(non_snake_case)]
struct Registers {
    DATA: Volatile<u32>,
}

const _: () = assert!(size_of::<Registers>() == 4);

/// The byte console.
///
/// A single register: writes queue one byte for the host, reads dequeue the
/// next pending byte or come back negative when the line is idle.
pub struct Console {
    registers: &'static mut Registers,
}

impl Console {
    /// Returns a new handle to the console register.
    pub fn new() -> Console {
        Console {
            registers: unsafe { &mut *(CONSOLE_BASE as *mut Registers) },
        }
    }

    /// Writes `byte` to the console.
    pub fn write_byte(&mut self, byte: u8) {
        self.registers.DATA.write(byte as u32);
    }

    /// Polls the receiver once, without blocking. `None` when no byte is
    /// pending.
    pub fn try_read_byte(&mut self) -> Option<u8> {
        let raw = self.registers.DATA.read() as i32;
        if raw < 0 {
            None
        } else {
            Some(raw as u8)
        }
    }
}

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

mod console_loader {
    use super::Console;

    impl hexload::Console for Console {
        fn poll(&mut self) -> Option<u8> {
            self.try_read_byte()
        }

        fn put(&mut self, byte: u8) {
            self.write_byte(byte)
        }
    }
}
