//! PLL and PFD frequency model
//!
//! ```text
//!             ┌──────────────────────────┐   ┌──────────┐
//!   osc ─────▶│ x (DIV_SELECT + NUM/DENOM)│──▶│POST_DIV  │──┬──────────────▶ pll
//!       │     └──────────────────────────┘   └──────────┘  │  ┌─────────┐
//!       │                  ▲                               ├─▶│18 / FRAC│──▶ pfd0
//!       │            ENABLE, BYPASS                        │  └─────────┘
//!       │                                                  └─▶   ...     ──▶ pfdN
//!       └──────────── (BYPASS set) ─────────────────────────────────────────▶ pll
//! ```

use embedded_hal_1::delay::DelayNs;

use super::{ClockError, ClockTree};
use crate::regs::{Field, Reg, RegisterFile};

/// Lowest legal PFD fractional divider
pub const PFD_FRAC_MIN: u8 = 12;
/// Highest legal PFD fractional divider
pub const PFD_FRAC_MAX: u8 = 35;
/// A PFD output runs at `parent * PFD_NUMERATOR / frac`
pub const PFD_NUMERATOR: u64 = 18;

/// PLL instance, numbered as in the chip reference manuals
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PllId {
    /// i.MX6: ARM PLL. Vybrid: system PLL
    Pll1,
    /// i.MX6: 528MHz system/bus PLL. Vybrid: 528MHz PLL
    Pll2,
    /// USB1 (i.MX6) / USB0 (Vybrid) 480MHz PLL
    Pll3,
    /// Audio PLL
    Pll4,
    /// i.MX6: video PLL. Vybrid: ENET PLL
    Pll5,
    /// i.MX6: ENET PLL. Vybrid: video PLL
    Pll6,
    /// Second USB PLL
    Pll7,
}

/// One output of a PLL's PFD bank
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PfdRef {
    /// Parent PLL
    pub pll: PllId,
    /// PFD number as printed in the reference manual
    pub index: u8,
}

/// How the integer part of a PLL's multiplier is encoded
#[derive(Clone, Copy, Debug)]
pub enum Multiplier {
    /// `osc * field`
    Field(Field),
    /// `osc * field / 2`
    HalfField(Field),
    /// `osc * values[field]`, any other encoding is reserved
    Select {
        /// Selector bits
        field: Field,
        /// Multiplier for each selector value
        values: &'static [u8],
    },
    /// `osc * n`
    Fixed(u32),
}

/// How the fractional part of a PLL's multiplier is encoded
#[derive(Clone, Copy, Debug)]
pub enum Fraction {
    /// Integer-only PLL
    None,
    /// `osc * num / denom` from two registers
    Registers {
        /// Numerator field
        num: Field,
        /// Denominator field
        denom: Field,
    },
    /// `osc * num / denom` with a fixed ratio
    Constant {
        /// Numerator
        num: u32,
        /// Denominator
        denom: u32,
    },
}

/// Output divider applied after the multiplier
#[derive(Clone, Copy, Debug)]
pub struct PostDiv {
    /// Selector bits
    pub field: Field,
    /// Divisor for each selector value, 0 marks a reserved encoding
    pub divisors: [u8; 4],
}

/// A register packing up to four PFD outputs, eight bits each
///
/// Each byte holds a 6-bit fractional divider and, in bit 7, the clock gate.
#[derive(Clone, Copy, Debug)]
pub struct PfdBank {
    /// Register holding the bank
    pub reg: Reg,
    /// Index of the output in byte 0
    pub first: u8,
    /// Number of outputs
    pub count: u8,
}

/// Parameters for programming a fractional PLL to an arbitrary rate
#[derive(Clone, Copy, Debug)]
pub struct Synth {
    /// Set while the PLL is powered down
    pub powerdown: Field,
    /// Set by hardware once the PLL has locked
    pub lock: Field,
    /// Smallest legal DIV_SELECT
    pub min_mult: u32,
    /// Largest legal DIV_SELECT
    pub max_mult: u32,
    /// Denominator written when programming
    pub denom: u32,
}

/// Static description of one PLL
#[derive(Clone, Copy, Debug)]
pub struct PllDesc {
    /// Which PLL
    pub id: PllId,
    /// Name used by diagnostics
    pub name: &'static str,
    /// Output enable, the PLL counts as off while clear
    pub enable: Field,
    /// Bypass, the reference passes through unchanged while set
    pub bypass: Field,
    /// Integer multiplier encoding
    pub mult: Multiplier,
    /// Fractional multiplier encoding
    pub frac: Fraction,
    /// Output divider, if any
    pub post_div: Option<PostDiv>,
    /// PFD outputs, if any
    pub pfd: Option<PfdBank>,
    /// Present on PLLs the engine may reprogram
    pub synth: Option<Synth>,
}

//
// impls
//

impl PfdBank {
    /// Byte slot of PFD `index`, `None` if the bank has no such output
    pub const fn slot(&self, index: u8) -> Option<u8> {
        match index.checked_sub(self.first) {
            Some(slot) if slot < self.count => Some(slot),
            _ => None,
        }
    }

    /// Fractional divider bits of `slot`
    pub const fn frac(&self, slot: u8) -> Field {
        Field::new(self.reg, slot * 8, 6)
    }

    /// Clock gate bit of `slot`
    pub const fn gate(&self, slot: u8) -> Field {
        Field::bit(self.reg, slot * 8 + 7)
    }
}

impl PostDiv {
    /// Selector encoding of `divisor`
    pub fn encode(&self, divisor: u32) -> Option<u32> {
        self.divisors
            .iter()
            .position(|&d| d != 0 && u32::from(d) == divisor)
            .map(|pos| pos as u32)
    }
}

impl<R: RegisterFile, D> ClockTree<'_, R, D> {
    /// Output frequency of `pll`, in Hz.
    ///
    /// A disabled PLL runs at 0Hz whatever its other fields say, and a
    /// bypassed one at exactly the reference frequency.
    pub fn pll_frequency(&self, pll: PllId) -> u32 {
        match self.config.chip.pll(pll) {
            Some(desc) => self.decode_pll(desc),
            None => {
                warn!("{:?} does not exist on {}", pll, self.config.chip.name);
                0
            }
        }
    }

    /// Output frequency of PFD `index` of `pll`, in Hz.
    ///
    /// PLLs without a PFD bank pass their own frequency through.
    pub fn pfd_frequency(&self, pll: PllId, index: u8) -> u32 {
        let Some(desc) = self.config.chip.pll(pll) else {
            warn!("{:?} does not exist on {}", pll, self.config.chip.name);
            return 0;
        };
        let parent = self.decode_pll(desc);
        let Some(bank) = desc.pfd else {
            return parent;
        };
        let Some(slot) = bank.slot(index) else {
            debug!("{} has no PFD{}", desc.name, index);
            return 0;
        };
        if parent == 0 {
            return 0;
        }

        let raw = self.read(bank.reg);
        if bank.gate(slot).extract(raw) != 0 {
            return 0;
        }
        let frac = bank.frac(slot).extract(raw);
        pfd_output(parent, frac)
    }

    fn decode_pll(&self, desc: &PllDesc) -> u32 {
        let ctrl_reg = desc.enable.reg;
        let ctrl = self.read(ctrl_reg);
        let field = |f: Field| {
            if f.reg == ctrl_reg {
                f.extract(ctrl)
            } else {
                self.read_field(f)
            }
        };

        if field(desc.enable) == 0 {
            return 0;
        }
        let osc = u64::from(self.config.osc_hz);
        if field(desc.bypass) != 0 {
            return self.config.osc_hz;
        }

        let integer = match desc.mult {
            Multiplier::Field(f) => osc * u64::from(field(f)),
            Multiplier::HalfField(f) => osc * u64::from(field(f)) / 2,
            Multiplier::Select { field: f, values } => match values.get(field(f) as usize) {
                Some(&m) => osc * u64::from(m),
                None => {
                    debug!("{}: reserved multiplier selector", desc.name);
                    return 0;
                }
            },
            Multiplier::Fixed(m) => osc * u64::from(m),
        };
        let (num, denom) = match desc.frac {
            Fraction::None => (0, 0),
            Fraction::Registers { num, denom } => (field(num), field(denom)),
            Fraction::Constant { num, denom } => (num, denom),
        };
        // Multiply before dividing, `osc / denom` alone would truncate
        let fractional = if denom == 0 {
            0
        } else {
            osc * u64::from(num) / u64::from(denom)
        };

        let mut freq = integer + fractional;
        if let Some(post) = desc.post_div {
            match post.divisors[(field(post.field) & 0b11) as usize] {
                0 => {
                    debug!("{}: reserved post divider", desc.name);
                    return 0;
                }
                d => freq /= u64::from(d),
            }
        }
        u32::try_from(freq).unwrap_or(u32::MAX)
    }
}

impl<R: RegisterFile, D: DelayNs> ClockTree<'_, R, D> {
    /// Retune a PFD output.
    ///
    /// The output is gated while the fraction changes, so downstream logic
    /// never sees the intermediate divider.
    pub(crate) fn program_pfd(&mut self, pfd: PfdRef, frac: u8) -> Result<(), ClockError> {
        let bank = self
            .config
            .chip
            .pll(pfd.pll)
            .and_then(|desc| desc.pfd)
            .ok_or(ClockError::prog_err("pfd bank missing"))?;
        let slot = bank.slot(pfd.index).ok_or(ClockError::prog_err("pfd index outside bank"))?;
        if !(PFD_FRAC_MIN..=PFD_FRAC_MAX).contains(&frac) {
            return Err(ClockError::bad_config("pfd fraction out of the allowed range"));
        }

        // gate the clock output and update the fraction
        self.modify_field(bank.gate(slot), 1);
        self.modify_field(bank.frac(slot), u32::from(frac));
        // un-gate the clock output
        self.modify_field(bank.gate(slot), 0);
        debug!("{:?} PFD{} frac = {}", pfd.pll, pfd.index, frac);
        Ok(())
    }

    /// Program a fractional PLL to `osc * (mult + num / denom) / post_div` and
    /// enable its output once it reports lock.
    pub(crate) fn program_synth(
        &mut self,
        pll: PllId,
        mult: u32,
        num: u32,
        denom: u32,
        post_div: u32,
    ) -> Result<(), ClockError> {
        let desc = self.config.chip.pll(pll).ok_or(ClockError::prog_err("pll missing"))?;
        let (Some(synth), Multiplier::Field(mult_field), Fraction::Registers { num: num_field, denom: denom_field }) =
            (desc.synth, desc.mult, desc.frac)
        else {
            return Err(ClockError::prog_err("pll is not programmable"));
        };
        let post_sel = match desc.post_div {
            Some(post) => Some((post.field, post.encode(post_div).ok_or(ClockError::bad_config("bad post divider"))?)),
            None if post_div == 1 => None,
            None => return Err(ClockError::bad_config("pll has no post divider")),
        };

        // Power up, leave bypass and clear the old dividers
        let ctrl_reg = desc.enable.reg;
        let mut clear = synth.powerdown.mask() | desc.bypass.mask() | mult_field.mask();
        if let Some((field, _)) = post_sel {
            clear |= field.mask();
        }
        let ctrl = self.read(ctrl_reg);
        self.write(ctrl_reg, ctrl & !clear);

        // Set div, num and denom
        let mut ctrl = mult_field.insert(self.read(ctrl_reg), mult);
        if let Some((field, sel)) = post_sel {
            ctrl = field.insert(ctrl, sel);
        }
        self.write(ctrl_reg, ctrl);
        self.modify_field(num_field, num);
        self.modify_field(denom_field, denom);

        let bound = self.config.timeouts.pll_lock_us;
        if !self.poll_until(bound, |tree| tree.read_field(synth.lock) != 0) {
            error!("{} failed to lock within {} us", desc.name, bound);
            return Err(ClockError::LockTimeout { pll });
        }
        self.modify_field(desc.enable, 1);
        debug!("{} div = {}, num = {}, denom = {}", desc.name, mult, num, denom);
        Ok(())
    }
}

/// `parent * 18 / frac`, 0Hz for an encoding outside `12..=35`
pub(crate) fn pfd_output(parent_hz: u32, frac: u32) -> u32 {
    if !(u32::from(PFD_FRAC_MIN)..=u32::from(PFD_FRAC_MAX)).contains(&frac) {
        return 0;
    }
    (u64::from(parent_hz) * PFD_NUMERATOR / u64::from(frac)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clocks::chips::{mx6, vf610};
    use crate::clocks::config::ClockConfig;
    use crate::mock::{MockDelay, MockRegisters};

    static MX6Q: ClockConfig = ClockConfig::new(&mx6::MX6Q);
    static VF610: ClockConfig = ClockConfig::new(&vf610::VF610);

    fn tree(config: &ClockConfig, regs: MockRegisters) -> ClockTree<'_, MockRegisters, MockDelay> {
        ClockTree::new(config, regs, MockDelay::default())
    }

    #[test]
    fn disabled_pll_is_zero() {
        let chip = &mx6::MX6Q;
        // Multiplier and fraction set, but ENABLE clear
        let regs = MockRegisters::new()
            .with(chip.address(mx6::PLL_VIDEO), 32)
            .with(chip.address(mx6::PLL_VIDEO_NUM), 1)
            .with(chip.address(mx6::PLL_VIDEO_DENOM), 2);
        let t = tree(&MX6Q, regs);
        assert_eq!(t.pll_frequency(PllId::Pll5), 0);
        // Only the control register was read
        assert_eq!(t.registers().read_count(), 1);
    }

    #[test]
    fn bypassed_pll_passes_reference() {
        let chip = &mx6::MX6Q;
        let regs = MockRegisters::new()
            .with(chip.address(mx6::PLL_VIDEO), mx6::PLL_ENABLE | mx6::PLL_BYPASS | 0x2000_0000 | 40)
            .with(chip.address(mx6::PLL_VIDEO_NUM), 0x1234)
            .with(chip.address(mx6::PLL_VIDEO_DENOM), 0x0FFF_FFFF);
        let t = tree(&MX6Q, regs);
        assert_eq!(t.pll_frequency(PllId::Pll5), 24_000_000);
    }

    #[test]
    fn fractional_pll_keeps_precision() {
        let chip = &mx6::MX6Q;
        // 24MHz * (27 + 999_999 / 1_000_000), post divider /1
        let regs = MockRegisters::new()
            .with(chip.address(mx6::PLL_VIDEO), mx6::PLL_ENABLE | (2 << 19) | 27)
            .with(chip.address(mx6::PLL_VIDEO_NUM), 999_999)
            .with(chip.address(mx6::PLL_VIDEO_DENOM), 1_000_000);
        let t = tree(&MX6Q, regs);
        assert_eq!(t.pll_frequency(PllId::Pll5), 648_000_000 + 23_999_976);
    }

    #[test]
    fn video_post_divider() {
        let chip = &mx6::MX6Q;
        let mut regs = MockRegisters::new()
            .with(chip.address(mx6::PLL_VIDEO_NUM), 0)
            .with(chip.address(mx6::PLL_VIDEO_DENOM), 1);
        // POST_DIV_SELECT = 1: divide by 2
        regs.set(chip.address(mx6::PLL_VIDEO), mx6::PLL_ENABLE | (1 << 19) | 40);
        let t = tree(&MX6Q, regs);
        assert_eq!(t.pll_frequency(PllId::Pll5), 480_000_000);

        // POST_DIV_SELECT = 3 is reserved
        let (mut regs, _) = t.release();
        regs.set(chip.address(mx6::PLL_VIDEO), mx6::PLL_ENABLE | (3 << 19) | 40);
        let t = tree(&MX6Q, regs);
        assert_eq!(t.pll_frequency(PllId::Pll5), 0);
    }

    #[test]
    fn selector_multipliers() {
        let chip = &mx6::MX6Q;
        let regs = MockRegisters::new()
            .with(chip.address(mx6::PLL_528), mx6::PLL_ENABLE | 1)
            .with(chip.address(mx6::PLL_USB1), mx6::PLL_ENABLE)
            .with(chip.address(mx6::PLL_ARM), mx6::PLL_ENABLE | 66);
        let t = tree(&MX6Q, regs);
        assert_eq!(t.pll_frequency(PllId::Pll2), 528_000_000);
        assert_eq!(t.pll_frequency(PllId::Pll3), 480_000_000);
        assert_eq!(t.pll_frequency(PllId::Pll1), 792_000_000);
    }

    #[test]
    fn usb_pll_selects_with_one_bit() {
        let chip = &mx6::MX6Q;
        let usb = chip.address(mx6::PLL_USB1);
        let t = tree(&MX6Q, MockRegisters::new().with(usb, mx6::PLL_ENABLE | 1));
        assert_eq!(t.pll_frequency(PllId::Pll3), 528_000_000);
        // Bit 1 is reserved and does not pick a multiplier
        let t = tree(&MX6Q, MockRegisters::new().with(usb, mx6::PLL_ENABLE | 0b10));
        assert_eq!(t.pll_frequency(PllId::Pll3), 480_000_000);
    }

    #[test]
    fn vybrid_pll_select_and_constant_fraction() {
        let chip = &vf610::VF610;
        let regs = MockRegisters::new()
            .with(chip.address(vf610::PLL2_CTRL), vf610::PLL_ENABLE | 1)
            .with(chip.address(vf610::PLL2_NUM), 0)
            .with(chip.address(vf610::PLL2_DENOM), 1)
            .with(chip.address(vf610::PLL5_CTRL), vf610::PLL_ENABLE);
        let t = tree(&VF610, regs);
        assert_eq!(t.pll_frequency(PllId::Pll2), 528_000_000);
        assert_eq!(t.pll_frequency(PllId::Pll5), 500_000_000);
    }

    #[test]
    fn pfd_outputs() {
        let chip = &mx6::MX6Q;
        // PFD0 = 12, PFD1 = 16 (gated), PFD2 = 24
        let regs = MockRegisters::new()
            .with(chip.address(mx6::PLL_528), mx6::PLL_ENABLE | 1)
            .with(chip.address(mx6::PFD_528), 0x0018_900C);
        let t = tree(&MX6Q, regs);
        assert_eq!(t.pfd_frequency(PllId::Pll2, 0), 792_000_000);
        assert_eq!(t.pfd_frequency(PllId::Pll2, 1), 0);
        assert_eq!(t.pfd_frequency(PllId::Pll2, 2), 396_000_000);
        // PLL2 has no PFD3 on the i.MX6Q
        assert_eq!(t.pfd_frequency(PllId::Pll2, 3), 0);
    }

    #[test]
    fn pfd_without_bank_is_identity() {
        let chip = &mx6::MX6Q;
        let regs = MockRegisters::new().with(chip.address(mx6::PLL_ARM), mx6::PLL_ENABLE | 66);
        let t = tree(&MX6Q, regs);
        assert_eq!(t.pfd_frequency(PllId::Pll1, 0), 792_000_000);
    }

    #[test]
    fn pfd_of_disabled_pll_is_zero() {
        let chip = &mx6::MX6Q;
        let regs = MockRegisters::new().with(chip.address(mx6::PFD_480), 0x1311_100C);
        let t = tree(&MX6Q, regs);
        for index in 0..4 {
            assert_eq!(t.pfd_frequency(PllId::Pll3, index), 0);
        }
    }

    #[test]
    fn pfd_rejects_invalid_fraction() {
        assert_eq!(pfd_output(528_000_000, 0), 0);
        assert_eq!(pfd_output(528_000_000, 11), 0);
        assert_eq!(pfd_output(528_000_000, 36), 0);
        assert_eq!(pfd_output(528_000_000, 35), 271_542_857);
    }

    #[test]
    fn pfd_is_programmed_gated() {
        let chip = &mx6::MX6Q;
        let regs = MockRegisters::new().with(chip.address(mx6::PFD_480), 0x1311_100C);
        let mut t = tree(&MX6Q, regs);
        t.program_pfd(
            PfdRef {
                pll: PllId::Pll3,
                index: 1,
            },
            20,
        )
        .unwrap();
        let addr = chip.address(mx6::PFD_480);
        assert_eq!(
            t.registers().writes(),
            &[(addr, 0x1311_900C), (addr, 0x1311_940C), (addr, 0x1311_140C)]
        );
    }

    #[test]
    fn synth_waits_for_lock() {
        let chip = &mx6::MX6Q;
        let ctrl = chip.address(mx6::PLL_VIDEO);
        let mut regs = MockRegisters::new().with(ctrl, mx6::PLL_POWERDOWN | mx6::PLL_BYPASS);
        regs.stick(ctrl, mx6::PLL_LOCK);
        let mut t = tree(&MX6Q, regs);
        t.program_synth(PllId::Pll5, 30, 500_000, 1_000_000, 2).unwrap();
        // 24MHz * 30.5 / 2
        assert_eq!(t.pll_frequency(PllId::Pll5), 366_000_000);
    }

    #[test]
    fn synth_lock_timeout() {
        let chip = &mx6::MX6Q;
        let regs = MockRegisters::new().with(chip.address(mx6::PLL_VIDEO), mx6::PLL_POWERDOWN);
        let mut t = tree(&MX6Q, regs);
        assert_eq!(
            t.program_synth(PllId::Pll5, 30, 0, 1_000_000, 1),
            Err(ClockError::LockTimeout { pll: PllId::Pll5 })
        );
        let (regs, delay) = t.release();
        // Output never enabled, and the wait was bounded
        assert_eq!(regs.get(chip.address(mx6::PLL_VIDEO)) & mx6::PLL_ENABLE, 0);
        assert!(delay.elapsed_ns >= 10_000_000);
    }
}
