//! Mock register file for host-side simulation and tests
//!
//! [`MockRegisters`] is a sparse address map that records every write and
//! counts every read. Bits can be pinned high with [`MockRegisters::stick`] to
//! model status flags that never settle (a clock switch that never completes,
//! a PLL that locks immediately).

use core::cell::Cell;
use std::collections::BTreeMap;
use std::vec::Vec;

use embedded_hal_1::delay::DelayNs;

use crate::regs::RegisterFile;

/// Sparse register map with a write log
#[derive(Debug, Default)]
pub struct MockRegisters {
    values: BTreeMap<u32, u32>,
    stuck: BTreeMap<u32, u32>,
    writes: Vec<(u32, u32)>,
    reads: Cell<usize>,
}

impl MockRegisters {
    /// An empty register map, every register reads as zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload `address` without logging a write
    pub fn set(&mut self, address: u32, value: u32) {
        self.values.insert(address, value);
    }

    /// Builder flavour of [`Self::set`]
    pub fn with(mut self, address: u32, value: u32) -> Self {
        self.set(address, value);
        self
    }

    /// Current value of `address`, including stuck bits, without counting a read
    pub fn get(&self, address: u32) -> u32 {
        self.values.get(&address).copied().unwrap_or(0) | self.stuck.get(&address).copied().unwrap_or(0)
    }

    /// Force `bits` of `address` to read back as one, whatever is written
    pub fn stick(&mut self, address: u32, bits: u32) {
        *self.stuck.entry(address).or_insert(0) |= bits;
    }

    /// Release bits previously pinned with [`Self::stick`]
    pub fn unstick(&mut self, address: u32, bits: u32) {
        if let Some(stuck) = self.stuck.get_mut(&address) {
            *stuck &= !bits;
        }
    }

    /// Every `(address, value)` written since creation or the last [`Self::clear_log`]
    pub fn writes(&self) -> &[(u32, u32)] {
        &self.writes
    }

    /// Number of writes since creation or the last [`Self::clear_log`]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Number of reads since creation or the last [`Self::clear_log`]
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    /// Forget the write log and the read counter
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads.set(0);
    }
}

impl RegisterFile for MockRegisters {
    fn read32(&self, address: u32) -> u32 {
        self.reads.set(self.reads.get() + 1);
        self.get(address)
    }

    fn write32(&mut self, address: u32, value: u32) {
        self.writes.push((address, value));
        self.values.insert(address, value);
    }
}

/// A delay provider that never sleeps, it only adds up the requested time
#[derive(Debug, Default, Clone, Copy)]
pub struct MockDelay {
    /// Total requested delay
    pub elapsed_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stuck_bits_survive_writes() {
        let mut regs = MockRegisters::new();
        regs.stick(0x48, 1 << 5);
        regs.write32(0x48, 0);
        assert_eq!(regs.read32(0x48), 1 << 5);
        regs.unstick(0x48, 1 << 5);
        assert_eq!(regs.read32(0x48), 0);
        assert_eq!(regs.read_count(), 2);
        assert_eq!(regs.writes(), &[(0x48, 0)]);
    }

    #[test]
    fn delay_accumulates() {
        let mut delay = MockDelay::default();
        delay.delay_us(3);
        delay.delay_ns(7);
        assert_eq!(delay.elapsed_ns, 3_007);
    }
}
