//! Board Clock Configuration

use super::chips::ChipDesc;

//
// structs
//

/// The board-level configuration handed to [`ClockTree::new`](super::ClockTree::new)
#[derive(Clone, Copy, Debug)]
pub struct ClockConfig {
    /// Active chip variant and its clock topology
    pub chip: &'static ChipDesc,
    /// Frequency of the reference oscillator feeding every PLL, in Hz
    pub osc_hz: u32,
    /// Default accuracy policy of [`set_consumer_clock_khz`](super::ClockTree::set_consumer_clock_khz)
    pub tolerance: Tolerance,
    /// Bounds for every hardware busy-wait
    pub timeouts: Timeouts,
}

/// Accuracy policy of the divider search.
///
/// A result is accurate enough when `error / target <= max_error_permille / 1000`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tolerance {
    /// Largest accepted relative error, in thousandths of the target
    pub max_error_permille: u32,
}

/// Busy-wait bounds, in microseconds
///
/// The firmware this engine replaces spun forever on the clock switch
/// handshake. Every wait here gives up after its bound instead.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    /// Bound for each "clock switch complete" handshake wait
    pub switch_us: u32,
    /// Bound for a PLL to report lock after being reprogrammed
    pub pll_lock_us: u32,
    /// Delay between two polls of a status register
    pub poll_interval_us: u32,
}

/// When [`set_consumer_clock_khz`](super::ClockTree::set_consumer_clock_khz)
/// may retune the consumer's PFD
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PfdPolicy {
    /// Never, only the fallback PLL is considered
    Never,
    /// Only if no other consumer of the chip can be fed from that PFD
    #[default]
    Exclusive,
    /// Always. Every other consumer running from the PFD changes rate with it.
    Shared,
}

/// Per-request options of [`set_consumer_clock_khz`](super::ClockTree::set_consumer_clock_khz)
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetOptions {
    /// Whether the consumer's PFD may be retuned
    pub pfd: PfdPolicy,
    /// Override [`ClockConfig::tolerance`] for this request
    pub tolerance: Option<Tolerance>,
}

//
// impls
//

impl ClockConfig {
    /// Every supported board runs from a 24MHz crystal
    pub const DEFAULT_OSC_HZ: u32 = 24_000_000;

    /// Default configuration for `chip`
    pub const fn new(chip: &'static ChipDesc) -> Self {
        Self {
            chip,
            osc_hz: Self::DEFAULT_OSC_HZ,
            tolerance: Tolerance::DEFAULT,
            timeouts: Timeouts::DEFAULT,
        }
    }

    /// Same configuration with another reference oscillator
    pub const fn with_osc_hz(self, osc_hz: u32) -> Self {
        Self { osc_hz, ..self }
    }

    /// Same configuration with another accuracy policy
    pub const fn with_tolerance(self, tolerance: Tolerance) -> Self {
        Self { tolerance, ..self }
    }

    /// Same configuration with other wait bounds
    pub const fn with_timeouts(self, timeouts: Timeouts) -> Self {
        Self { timeouts, ..self }
    }
}

impl Tolerance {
    /// 0.5%, comfortably inside what LVDS and parallel panels accept
    pub const DEFAULT: Self = Self::permille(5);

    /// Accept results within `max_error_permille` thousandths of the target
    pub const fn permille(max_error_permille: u32) -> Self {
        Self { max_error_permille }
    }

    /// Is `error_khz` acceptable for `target_khz`?
    pub const fn accepts(&self, target_khz: u32, error_khz: u32) -> bool {
        (error_khz as u64) * 1000 <= (target_khz as u64) * (self.max_error_permille as u64)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Timeouts {
    /// 1ms per handshake, 10ms for PLL lock, polled every microsecond
    pub const DEFAULT: Self = Self {
        switch_us: 1_000,
        pll_lock_us: 10_000,
        poll_interval_us: 1,
    };
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Default for SetOptions {
    fn default() -> Self {
        Self {
            pfd: PfdPolicy::Exclusive,
            tolerance: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_is_relative() {
        let tol = Tolerance::permille(5);
        assert!(tol.accepts(100_000, 0));
        assert!(tol.accepts(100_000, 500));
        assert!(!tol.accepts(100_000, 501));
        // Small targets get a proportionally small window
        assert!(!tol.accepts(1_000, 6));
    }

    #[test]
    fn tolerance_does_not_overflow() {
        assert!(Tolerance::permille(1000).accepts(u32::MAX, u32::MAX));
    }
}
