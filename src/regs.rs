//! Register Access Primitives
//!
//! The clock engine never touches memory directly. Every access goes through a
//! [`RegisterFile`], which is [`Mmio`] on real hardware and a mock register map
//! in tests and host simulation.
//!
//! Registers are named by a [`Reg`] (a block plus an offset) and bitfields by a
//! [`Field`]. The chip description supplies the block base addresses.

/// Synchronous, ordered access to 32-bit memory-mapped registers.
///
/// Implementations must not reorder or combine accesses: the clock tree
/// observes every intermediate register state.
pub trait RegisterFile {
    /// Read the register at `address`
    fn read32(&self, address: u32) -> u32;
    /// Write `value` to the register at `address`
    fn write32(&mut self, address: u32, value: u32);
}

impl<T: RegisterFile + ?Sized> RegisterFile for &mut T {
    #[inline(always)]
    fn read32(&self, address: u32) -> u32 {
        (**self).read32(address)
    }

    #[inline(always)]
    fn write32(&mut self, address: u32, value: u32) {
        (**self).write32(address, value)
    }
}

/// Volatile memory-mapped register access
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Create a handle for volatile register access.
    ///
    /// # Safety
    ///
    /// The CCM and analog register blocks of the selected chip must be mapped
    /// at the addresses the chip description names, and nothing else may be
    /// reconfiguring the clock tree concurrently.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterFile for Mmio {
    #[inline(always)]
    fn read32(&self, address: u32) -> u32 {
        // SAFETY: the caller of `Mmio::new` vouched for the mapping
        unsafe { core::ptr::read_volatile(address as usize as *const u32) }
    }

    #[inline(always)]
    fn write32(&mut self, address: u32, value: u32) {
        // SAFETY: the caller of `Mmio::new` vouched for the mapping
        unsafe { core::ptr::write_volatile(address as usize as *mut u32, value) }
    }
}

/// Register block a [`Reg`] offset is relative to
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Block {
    /// Clock Controller Module
    Ccm,
    /// Analog PLL block (ANATOP on i.MX6, ANADIG on Vybrid)
    Analog,
}

/// A 32-bit register inside one of the clock register blocks
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reg {
    /// Block the register lives in
    pub block: Block,
    /// Byte offset from the block base
    pub offset: u16,
}

impl Reg {
    /// A register in the CCM block
    pub const fn ccm(offset: u16) -> Self {
        Self {
            block: Block::Ccm,
            offset,
        }
    }

    /// A register in the analog block
    pub const fn analog(offset: u16) -> Self {
        Self {
            block: Block::Analog,
            offset,
        }
    }
}

/// A bitfield inside a [`Reg`].
///
/// Banked fields repeat once per channel, `stride` bits apart. For example the
/// i.MX6 IPU DI selectors use bits `[8:0]` for channel 0 and `[17:9]` for
/// channel 1 of the same register, which is a field at shift 0 with stride 9.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// Register holding the field
    pub reg: Reg,
    /// Bit offset of channel 0
    pub shift: u8,
    /// Width in bits
    pub width: u8,
    /// Distance in bits between consecutive channels, 0 if not banked
    pub stride: u8,
}

impl Field {
    /// A `width`-bit field at `shift`
    pub const fn new(reg: Reg, shift: u8, width: u8) -> Self {
        Self {
            reg,
            shift,
            width,
            stride: 0,
        }
    }

    /// A single bit
    pub const fn bit(reg: Reg, shift: u8) -> Self {
        Self::new(reg, shift, 1)
    }

    /// The same field, repeated every `stride` bits per channel
    pub const fn banked(self, stride: u8) -> Self {
        Self { stride, ..self }
    }

    /// Resolve a banked field to the concrete bits of `channel`
    pub const fn channel(self, channel: u8) -> Self {
        Self {
            shift: self.shift + self.stride * channel,
            stride: 0,
            ..self
        }
    }

    /// Largest value the field can hold
    pub const fn max(&self) -> u32 {
        ((1u64 << self.width) - 1) as u32
    }

    /// In-register mask of the field
    pub const fn mask(&self) -> u32 {
        self.max() << self.shift
    }

    /// Extract the field from a raw register value
    pub const fn extract(&self, raw: u32) -> u32 {
        (raw & self.mask()) >> self.shift
    }

    /// Replace the field inside a raw register value
    pub const fn insert(&self, raw: u32, value: u32) -> u32 {
        (raw & !self.mask()) | ((value << self.shift) & self.mask())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REG: Reg = Reg::ccm(0x34);

    #[test]
    fn banked_field_resolves_per_channel() {
        let sel = Field::new(REG, 6, 3).banked(9);
        assert_eq!(sel.channel(0).mask(), 0b111 << 6);
        assert_eq!(sel.channel(1).mask(), 0b111 << 15);
        assert_eq!(sel.channel(1).stride, 0);
    }

    #[test]
    fn extract_and_insert() {
        let f = Field::new(REG, 3, 3);
        let raw = 0xFFFF_FFFF;
        assert_eq!(f.extract(raw), 7);
        assert_eq!(f.insert(raw, 2), 0xFFFF_FFD7);
        // Out of range values are truncated to the field width
        assert_eq!(f.extract(f.insert(0, 0x1F)), 7);
    }

    #[test]
    fn full_width_field() {
        let f = Field::new(REG, 0, 32);
        assert_eq!(f.mask(), u32::MAX);
        assert_eq!(f.extract(0x1234_5678), 0x1234_5678);
    }
}
