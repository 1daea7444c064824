//! Per-chip clock topologies
//!
//! A [`ChipDesc`] is pure data: register block bases, the PLLs, and one
//! [`ConsumerDesc`] per clock the engine knows how to read or program. The
//! engine holds no chip-specific logic beyond what these tables describe.

pub mod mx6;
pub mod vf610;

use super::pll::{PfdRef, PllDesc, PllId};
use super::tree::ClockSource;
use super::Consumer;
use crate::regs::{Block, Field, Reg};

/// Supported SoC variants
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipVariant {
    /// i.MX6 Quad / Dual, two IPUs
    Mx6Quad,
    /// i.MX6 DualLite / Solo, one IPU
    Mx6DualLite,
    /// i.MX6 SoloX, two LCDIFs
    Mx6SoloX,
    /// i.MX6 UltraLite, one LCDIF
    Mx6UltraLite,
    /// Vybrid VF610
    Vf610,
}

/// Clock topology of one chip variant
#[derive(Debug)]
pub struct ChipDesc {
    /// Which variant
    pub variant: ChipVariant,
    /// Name used by diagnostics
    pub name: &'static str,
    /// CCM block base address
    pub ccm_base: u32,
    /// Analog block base address
    pub analog_base: u32,
    /// Every PLL of the chip
    pub plls: &'static [PllDesc],
    /// Every consumer clock the chip exposes
    pub consumers: &'static [ConsumerDesc],
}

/// One consumer clock and how to reach it
#[derive(Debug)]
pub struct ConsumerDesc {
    /// Which consumer
    pub consumer: Consumer,
    /// Name used by diagnostics
    pub name: &'static str,
    /// Number of channels, channel `n` resolves banked fields to bank `n`
    pub channels: u8,
    /// Graph node the consumer is fed from
    pub source: &'static ClockSource,
    /// Present if the consumer frequency can be programmed
    pub tuning: Option<&'static Tuning>,
    /// Present if the consumer's source selector can be switched
    pub switch: Option<MuxSwitch>,
}

/// What [`ClockTree::set_consumer_clock_khz`](super::ClockTree::set_consumer_clock_khz) programs
#[derive(Debug)]
pub struct Tuning {
    /// Outer selector and the value it must hold for the pre-divider chain
    /// to reach the consumer at all
    pub route: Option<(Field, u32)>,
    /// Selector of the pre-divider chain input
    pub pre_mux: Field,
    /// Dedicated PFD and its `pre_mux` selector value
    pub pfd: Option<(PfdRef, u32)>,
    /// Fallback fractional PLL and its `pre_mux` selector value
    pub fallback: Option<(PllId, u32)>,
    /// First divider stage, holds `divisor - 1`
    pub pre_div: Field,
    /// Second divider stage, holds `divisor - 1`. Absent for single-stage chains.
    pub post_div: Option<Field>,
}

/// A consumer selector that [`ClockTree::switch_mux_source`](super::ClockTree::switch_mux_source) may move
#[derive(Debug)]
pub struct MuxSwitch {
    /// Multiplexer node, must be a [`ClockSource::Mux`]
    pub mux: &'static ClockSource,
    /// Hand-off sequence for muxes that may not be switched while running
    pub glitch_free: Option<&'static GlitchFreeMux>,
}

/// Registers involved in moving a running multiplexer without a glitch.
///
/// The clock is parked on an alternate path, its divider bypassed, the
/// selector walked to the new value, and the original path restored, with
/// the CCM's "clock switch complete" handshake gating each hand-off.
#[derive(Debug)]
pub struct GlitchFreeMux {
    /// Enable bit of the PLL whose output feeds the mux during the switch
    pub aux_pll_enable: Field,
    /// Input selector of the parking path
    pub park_input_sel: Field,
    /// Masks the handshake interrupt while set
    pub handshake_mask: Field,
    /// Moves the parked clock onto the parking path
    pub park_sel: Field,
    /// Non-zero while a hand-off is in progress
    pub handshake_busy: Field,
    /// Bypasses the divider behind the mux while set
    pub bypass: Field,
}

impl ChipDesc {
    /// Absolute address of `reg` on this chip
    pub const fn address(&self, reg: Reg) -> u32 {
        let base = match reg.block {
            Block::Ccm => self.ccm_base,
            Block::Analog => self.analog_base,
        };
        base + reg.offset as u32
    }

    /// Description of `pll`, `None` if the chip lacks it
    pub fn pll(&self, pll: PllId) -> Option<&'static PllDesc> {
        self.plls.iter().find(|desc| desc.id == pll)
    }

    /// Description of `consumer`, `None` if the chip lacks it
    pub fn consumer(&self, consumer: Consumer) -> Option<&'static ConsumerDesc> {
        self.consumers.iter().find(|desc| desc.consumer == consumer)
    }

    /// Can `pfd` feed anything other than a single channel of `consumer`?
    ///
    /// Every selector setting counts, not just the current one, and the
    /// channels of a multi-channel consumer share their graph.
    pub fn pfd_shared(&self, pfd: PfdRef, consumer: Consumer) -> bool {
        self.consumers
            .iter()
            .any(|desc| desc.source.can_reach_pfd(pfd) && (desc.consumer != consumer || desc.channels > 1))
    }
}

impl ChipVariant {
    /// Topology of this variant
    pub fn desc(self) -> &'static ChipDesc {
        match self {
            ChipVariant::Mx6Quad => &mx6::MX6Q,
            ChipVariant::Mx6DualLite => &mx6::MX6DL,
            ChipVariant::Mx6SoloX => &mx6::MX6SX,
            ChipVariant::Mx6UltraLite => &mx6::MX6UL,
            ChipVariant::Vf610 => &vf610::VF610,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clocks::Ipu;

    const ALL: [ChipVariant; 5] = [
        ChipVariant::Mx6Quad,
        ChipVariant::Mx6DualLite,
        ChipVariant::Mx6SoloX,
        ChipVariant::Mx6UltraLite,
        ChipVariant::Vf610,
    ];

    #[test]
    fn descriptions_match_variants() {
        for variant in ALL {
            assert_eq!(variant.desc().variant, variant);
        }
    }

    #[test]
    fn switchable_consumers_name_a_mux() {
        for variant in ALL {
            for desc in variant.desc().consumers {
                if let Some(switch) = &desc.switch {
                    assert!(switch.mux.as_mux().is_some(), "{}", desc.name);
                }
            }
        }
    }

    #[test]
    fn tuning_sources_exist() {
        for variant in ALL {
            let chip = variant.desc();
            for desc in chip.consumers {
                let Some(tuning) = desc.tuning else { continue };
                if let Some((pfd, _)) = tuning.pfd {
                    let bank = chip.pll(pfd.pll).and_then(|pll| pll.pfd).unwrap();
                    assert!(bank.slot(pfd.index).is_some(), "{}", desc.name);
                }
                if let Some((pll, _)) = tuning.fallback {
                    assert!(chip.pll(pll).unwrap().synth.is_some(), "{}", desc.name);
                }
            }
        }
    }

    #[test]
    fn pfd_ownership_follows_topology() {
        let pfd = |pll, index| PfdRef { pll, index };
        let di = Consumer::IpuDi(Ipu::Ipu1);
        // Both DI channels and the HSP mux can select PLL3 PFD1
        assert!(ChipVariant::Mx6Quad.desc().pfd_shared(pfd(PllId::Pll3, 1), di));
        assert!(ChipVariant::Mx6DualLite.desc().pfd_shared(pfd(PllId::Pll3, 1), di));
        // LCDIF2's pre-mux can select PLL3 PFD3, nothing but LCDIF2 selects PFD0
        let sx = ChipVariant::Mx6SoloX.desc();
        assert!(sx.pfd_shared(pfd(PllId::Pll3, 3), Consumer::Lcdif(1)));
        assert!(!sx.pfd_shared(pfd(PllId::Pll3, 0), Consumer::Lcdif(2)));
        assert!(!ChipVariant::Mx6UltraLite.desc().pfd_shared(pfd(PllId::Pll3, 3), Consumer::Lcdif(1)));
    }

    #[test]
    fn ipu_count_per_variant() {
        let ipu2 = Consumer::IpuHsp(Ipu::Ipu2);
        assert!(ChipVariant::Mx6Quad.desc().consumer(ipu2).is_some());
        assert!(ChipVariant::Mx6DualLite.desc().consumer(ipu2).is_none());
        assert!(ChipVariant::Mx6SoloX.desc().consumer(Consumer::Lcdif(2)).is_some());
        assert!(ChipVariant::Mx6UltraLite.desc().consumer(Consumer::Lcdif(2)).is_none());
    }
}
