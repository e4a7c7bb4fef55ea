#![no_std]

//! Wrapper types that force all access to the wrapped value to be volatile.
//!
//! Memory mapped registers come in four flavors, one per type here: readable
//! and writeable ([`Volatile`]), read-only ([`ReadVolatile`]), write-only
//! ([`WriteVolatile`]), and untouchable ([`Reserved`], for padding between
//! registers in a map). Lay a `#[repr(C)]` struct of these over a peripheral's
//! base address and the compiler can neither elide nor reorder the accesses.

use core::ops::{BitAnd, BitOr};
use core::ptr;

pub mod prelude {
    //! Access traits, intended to be glob-imported by driver code.
    pub use crate::{Readable, ReadableWriteable, Writeable};
}

/// Implemented by cells that can be read.
pub trait Readable<T: Copy> {
    /// Returns a pointer to the wrapped value.
    fn inner(&self) -> *const T;

    /// Reads and returns the wrapped value using volatile semantics.
    #[inline(always)]
    fn read(&self) -> T {
        unsafe { ptr::read_volatile(self.inner()) }
    }

    /// Returns `true` if every bit set in `mask` is set in the value.
    #[inline(always)]
    fn has_mask(&self, mask: T) -> bool
    where
        T: BitAnd<Output = T> + PartialEq,
    {
        self.read() & mask == mask
    }
}

/// Implemented by cells that can be written.
pub trait Writeable<T: Copy> {
    /// Returns a mutable pointer to the wrapped value.
    fn inner_mut(&mut self) -> *mut T;

    /// Writes `val` to the wrapped location using volatile semantics.
    #[inline(always)]
    fn write(&mut self, val: T) {
        unsafe { ptr::write_volatile(self.inner_mut(), val) }
    }
}

/// Implemented by cells that support read-modify-write updates.
pub trait ReadableWriteable<T: Copy>: Readable<T> + Writeable<T>
where
    T: BitAnd<Output = T> + BitOr<Output = T>,
{
    /// Clears every bit not set in `mask`.
    #[inline(always)]
    fn and_mask(&mut self, mask: T) {
        let val = self.read();
        self.write(val & mask);
    }

    /// Sets every bit set in `mask`.
    #[inline(always)]
    fn or_mask(&mut self, mask: T) {
        let val = self.read();
        self.write(val | mask);
    }
}

/// A read/write cell.
#[repr(transparent)]
pub struct Volatile<T>(T);

/// A read-only cell. Writing is statically impossible.
#[repr(transparent)]
pub struct ReadVolatile<T>(T);

/// A write-only cell. Reading is statically impossible.
#[repr(transparent)]
pub struct WriteVolatile<T>(T);

/// A cell that can be neither read nor written.
#[repr(transparent)]
pub struct Reserved<T>(T);

impl<T: Copy> Readable<T> for Volatile<T> {
    fn inner(&self) -> *const T {
        &self.0
    }
}

impl<T: Copy> Writeable<T> for Volatile<T> {
    fn inner_mut(&mut self) -> *mut T {
        &mut self.0
    }
}

impl<T: Copy> ReadableWriteable<T> for Volatile<T> where
    T: BitAnd<Output = T> + BitOr<Output = T>
{
}

impl<T: Copy> Readable<T> for ReadVolatile<T> {
    fn inner(&self) -> *const T {
        &self.0
    }
}

impl<T: Copy> Writeable<T> for WriteVolatile<T> {
    fn inner_mut(&mut self) -> *mut T {
        &mut self.0
    }
}
