#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[cfg(any(test, feature = "mock"))]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod clocks;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod regs;

pub use clocks::chips::{ChipDesc, ChipVariant};
pub use clocks::config::{ClockConfig, PfdPolicy, SetOptions, Timeouts, Tolerance};
pub use clocks::{
    ClockError, ClockTree, Consumer, DividerSolution, Ipu, MuxSwitchPlan, SharedClockTree, SourceChoice, SwitchStep,
};
pub use regs::{Block, Field, Mmio, Reg, RegisterFile};
