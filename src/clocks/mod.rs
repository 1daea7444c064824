//! Clock Tree Derivation and Mux Switching
//!
//! [`ClockTree`] answers two questions about a running chip:
//!
//! * forward: what frequency does a consumer (IPU, LDB, LCDIF, uSDHC, ...)
//!   currently receive, derived by walking its selectors and dividers back to
//!   a PLL;
//! * reverse: which PFD fraction or video PLL rate plus divider pair brings a
//!   consumer closest to a requested frequency, and how to move a live
//!   selector without glitching the clock.
//!
//! The registers are the only state. Nothing is cached between calls.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use embedded_hal_1::delay::DelayNs;

use self::chips::ConsumerDesc;
use self::config::ClockConfig;
use self::pll::PllId;
use crate::regs::{Field, Reg, RegisterFile};

pub mod chips;
pub mod config;
pub mod pll;
mod search;
mod show;
mod switch;
pub mod tree;

pub use search::{DividerSolution, SourceChoice};
pub use switch::{MuxSwitchPlan, SwitchStep};

//
// Structs + Enums
//

/// Image Processing Unit instance
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ipu {
    /// IPU1, present on every i.MX6 with an IPU
    Ipu1,
    /// IPU2, i.MX6Quad/Dual only
    Ipu2,
}

/// A clock sink, identified independently of the chip variant
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consumer {
    /// ARM core clock
    Cpu,
    /// AHB root (Vybrid: platform bus)
    Ahb,
    /// IPG root
    Ipg,
    /// UART serial clock
    Uart,
    /// uSDHC/eSDHC instance, numbered as in the reference manual
    Esdhc(u8),
    /// MMDC channel 0 (DDR) clock
    MmdcCh0,
    /// MMDC channel 1 clock
    MmdcCh1,
    /// IPU high speed processor clock
    IpuHsp(Ipu),
    /// IPU display interface clock, channels 0 and 1
    IpuDi(Ipu),
    /// LVDS display bridge pixel clock as seen by the IPU, channels 0 and 1
    Ldb,
    /// LCDIF pixel clock, numbered as in the reference manual
    Lcdif(u8),
    /// Ethernet reference clock
    Fec,
}

/// Clock Configuration related error
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockError {
    /// Neither the dedicated PFD nor the fallback PLL reaches the target
    /// within the accuracy policy. No register was written.
    ToleranceNotMet {
        /// Requested frequency
        target_khz: u32,
        /// Closest frequency found, 0 if no candidate existed
        best_khz: u32,
    },
    /// The clock switch handshake did not complete in time. The consumer's
    /// clock domain may be left half-switched.
    SwitchTimeout,
    /// A reprogrammed PLL did not lock in time
    LockTimeout {
        /// PLL that failed to lock
        pll: PllId,
    },
    /// The consumer or channel does not exist on this chip, or cannot be
    /// driven the requested way
    UnsupportedVariant {
        /// Consumer asked for
        consumer: Consumer,
        /// Channel asked for
        channel: u8,
    },
    /// The requested selector value names a reserved mux branch
    ReservedSelector {
        /// Rejected selector value
        selector: u8,
    },
    /// The requested configuration was impossible or conflicting
    BadConfiguration {
        /// Explanation of error
        reason: &'static str,
    },
    /// A programming error occurred. This should be impossible.
    Programming {
        /// Explanation of error
        reason: &'static str,
    },
    /// Attempted to install a second clock tree into a [`SharedClockTree`]
    AlreadyConfigured,
}

/// The clock engine for one chip, bound to its registers.
///
/// `R` is the register file (see [`crate::regs`]) and `D` the delay provider
/// used to bound every hardware busy-wait.
pub struct ClockTree<'a, R, D> {
    config: &'a ClockConfig,
    regs: R,
    delay: D,
}

/// Serialises every access to the single clock tree of the system
///
/// ```ignore
/// static CLOCKS: SharedClockTree<Mmio, Delay> = SharedClockTree::new();
///
/// CLOCKS.init(ClockTree::new(&CONFIG, unsafe { Mmio::new() }, delay))?;
/// let khz = CLOCKS.with(|tree| tree.get_consumer_clock_khz(Consumer::Ldb, 0));
/// ```
pub struct SharedClockTree<R, D> {
    inner: Mutex<RefCell<Option<ClockTree<'static, R, D>>>>,
}

//
// impls
//

impl ClockError {
    pub(crate) const fn bad_config(reason: &'static str) -> Self {
        Self::BadConfiguration { reason }
    }

    pub(crate) const fn prog_err(reason: &'static str) -> Self {
        Self::Programming { reason }
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToleranceNotMet { target_khz, best_khz } => {
                write!(f, "cannot reach {target_khz} kHz, closest is {best_khz} kHz")
            }
            Self::SwitchTimeout => f.write_str("clock switch handshake timed out"),
            Self::LockTimeout { pll } => write!(f, "{pll:?} failed to lock"),
            Self::UnsupportedVariant { consumer, channel } => {
                write!(f, "{consumer:?} channel {channel} is not available on this chip")
            }
            Self::ReservedSelector { selector } => write!(f, "selector {selector} is reserved"),
            Self::BadConfiguration { reason } => write!(f, "bad configuration: {reason}"),
            Self::Programming { reason } => write!(f, "programming error: {reason}"),
            Self::AlreadyConfigured => f.write_str("clock tree already configured"),
        }
    }
}

impl<'a, R, D> ClockTree<'a, R, D> {
    /// Bind `config` to a register file and a delay provider
    pub const fn new(config: &'a ClockConfig, regs: R, delay: D) -> Self {
        Self { config, regs, delay }
    }

    /// Board configuration in use
    pub fn config(&self) -> &'a ClockConfig {
        self.config
    }

    /// Underlying register file
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Underlying register file, mutably
    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Give back the register file and the delay provider
    pub fn release(self) -> (R, D) {
        (self.regs, self.delay)
    }
}

impl<R: RegisterFile, D> ClockTree<'_, R, D> {
    /// Frequency currently fed to `consumer` on `channel`, in Hz.
    ///
    /// A consumer behind a disabled PLL, a gated PFD or a reserved selector
    /// runs at 0Hz. So does a consumer the chip does not have, in which case
    /// no register is read at all.
    pub fn consumer_frequency(&self, consumer: Consumer, channel: u8) -> u32 {
        match self.try_consumer_frequency(consumer, channel) {
            Ok(hz) => hz,
            Err(e) => {
                warn!("{:?}/{}: {:?}", consumer, channel, e);
                0
            }
        }
    }

    /// Like [`Self::consumer_frequency`], but reports a missing consumer as
    /// [`ClockError::UnsupportedVariant`]
    pub fn try_consumer_frequency(&self, consumer: Consumer, channel: u8) -> Result<u32, ClockError> {
        let desc = self.consumer_desc(consumer, channel)?;
        Ok(self.source_frequency(desc.source, channel))
    }

    /// Frequency currently fed to `consumer` on `channel`, in kHz
    pub fn get_consumer_clock_khz(&self, consumer: Consumer, channel: u8) -> u32 {
        self.consumer_frequency(consumer, channel) / 1000
    }

    pub(crate) fn consumer_desc(&self, consumer: Consumer, channel: u8) -> Result<&'static ConsumerDesc, ClockError> {
        match self.config.chip.consumer(consumer) {
            Some(desc) if channel < desc.channels => Ok(desc),
            _ => Err(ClockError::UnsupportedVariant { consumer, channel }),
        }
    }

    pub(crate) fn read(&self, reg: Reg) -> u32 {
        self.regs.read32(self.config.chip.address(reg))
    }

    pub(crate) fn read_field(&self, field: Field) -> u32 {
        field.extract(self.read(field.reg))
    }

    pub(crate) fn write(&mut self, reg: Reg, value: u32) {
        let address = self.config.chip.address(reg);
        self.regs.write32(address, value);
    }

    /// Read-modify-write of a single field
    pub(crate) fn modify_field(&mut self, field: Field, value: u32) {
        let raw = self.read(field.reg);
        self.write(field.reg, field.insert(raw, value));
    }
}

impl<R: RegisterFile, D: DelayNs> ClockTree<'_, R, D> {
    /// Poll `done` until it holds, giving up after `bound_us`
    pub(crate) fn poll_until(&mut self, bound_us: u32, done: impl Fn(&Self) -> bool) -> bool {
        let step = self.config.timeouts.poll_interval_us.max(1);
        let mut waited = 0u32;
        loop {
            if done(&*self) {
                return true;
            }
            if waited >= bound_us {
                return false;
            }
            self.delay.delay_us(step);
            waited = waited.saturating_add(step);
        }
    }
}

impl<R, D> SharedClockTree<R, D> {
    /// An empty slot, fill it with [`Self::init`]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install the system clock tree.
    ///
    /// This should be called once on startup.
    pub fn init(&self, tree: ClockTree<'static, R, D>) -> Result<(), ClockError> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            if slot.is_some() {
                error!("clock tree installed twice");
                return Err(ClockError::AlreadyConfigured);
            }
            *slot = Some(tree);
            Ok(())
        })
    }

    /// Run `f` on the clock tree *inside of a critical section*, so move with
    /// purpose: a glitch-free switch holds the section for up to two
    /// handshake bounds.
    ///
    /// Returns `None` if [`Self::init`] has not been called yet.
    pub fn with<F: FnOnce(&mut ClockTree<'static, R, D>) -> T, T>(&self, f: F) -> Option<T> {
        critical_section::with(|cs| {
            let mut tree = self.inner.borrow_ref_mut(cs);
            let tree = tree.as_mut()?;
            Some(f(tree))
        })
    }
}

impl<R, D> Default for SharedClockTree<R, D> {
    fn default() -> Self {
        Self::new()
    }
}
