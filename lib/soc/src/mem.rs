use hexload::Memory;

/// A write capability over the whole flat address space.
///
/// Upload addresses are deliberately not validated. The target has no memory
/// protection to respect, and the operator aiming an upload is trusted; what
/// keeps this honest is that creating the capability is the one `unsafe`
/// step, and the only thing it exposes afterwards is a single byte store.
pub struct RawMemory {
    _private: (),
}

impl RawMemory {
    /// Creates the capability.
    ///
    /// # Safety
    ///
    /// The caller asserts that volatile byte stores to arbitrary addresses
    /// are acceptable, i.e. that this is the only code running and uploads
    /// are aimed at real RAM.
    pub unsafe fn new() -> RawMemory {
        RawMemory { _private: () }
    }
}

impl Memory for RawMemory {
    fn store(&mut self, addr: u32, byte: u8) {
        unsafe { ((addr as usize) as *mut u8).write_volatile(byte) }
    }
}
