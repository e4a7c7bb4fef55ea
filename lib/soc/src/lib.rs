#![no_std]

//! Drivers for the SoC's memory mapped peripherals: the byte console, the
//! status LEDs, and the SPI flash interface. Each driver also implements the
//! matching `hexload` trait, so wiring the loader up is just handing these
//! over.

pub mod common;
pub mod console;
pub mod delay;
pub mod leds;
pub mod mem;
pub mod spiflash;
