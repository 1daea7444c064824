//! Best-fit divider search
//!
//! Reaching a consumer frequency means choosing a source for its pre-divider
//! chain and the divider pair behind it. Two sources are tried in order:
//!
//! 1. the consumer's dedicated PFD, searched exhaustively over every legal
//!    fraction and divider pair;
//! 2. the video PLL, synthesized to exactly `target * pre * post` (times a
//!    post divider for low targets) when the PFD result is not accurate
//!    enough.
//!
//! Everything is evaluated before the first register write, so a request
//! that cannot be met leaves the hardware untouched.

use embedded_hal_1::delay::DelayNs;

use super::config::{PfdPolicy, SetOptions};
use super::pll::{pfd_output, PfdRef, PllId, Synth, PFD_FRAC_MAX, PFD_FRAC_MIN};
use super::{ClockError, ClockTree, Consumer};
use crate::regs::RegisterFile;

/// Where a [`DividerSolution`] takes its clock from
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceChoice {
    /// Retune the consumer's dedicated PFD
    Pfd {
        /// PFD output
        pfd: PfdRef,
        /// New fractional divider, `12..=35`
        frac: u8,
    },
    /// Reprogram a fractional PLL to `osc * (mult + num / denom) / post_div`
    VideoPll {
        /// PLL to program
        pll: PllId,
        /// Integer multiplier
        mult: u32,
        /// Fraction numerator
        num: u32,
        /// Fraction denominator
        denom: u32,
        /// Output divider: 1, 2 or 4
        post_div: u32,
    },
}

/// Outcome of [`ClockTree::find_best_divider`]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DividerSolution {
    /// Source of the pre-divider chain
    pub source: SourceChoice,
    /// Pre-divider, `1..=8`
    pub pre: u32,
    /// Post-divider, 1 for single-stage chains
    pub post: u32,
    /// Frequency the consumer will run at
    pub resulting_khz: u32,
    /// `|resulting_khz - target_khz|`
    pub error_khz: u32,
}

/// Divider stages of a consumer's chain
#[derive(Clone, Copy, Debug)]
pub(crate) struct Stages {
    pub pre_max: u32,
    /// `None` for single-stage chains
    pub post_max: Option<u32>,
}

/// Best PFD setting found by [`search_pfd`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PfdCandidate {
    pub frac: u8,
    pub pre: u32,
    pub post: u32,
    pub khz: u32,
    pub error_khz: u32,
}

/// Best fallback PLL setting found by [`search_synth`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SynthCandidate {
    pub mult: u32,
    pub num: u32,
    pub denom: u32,
    pub post_div: u32,
    pub pre: u32,
    pub post: u32,
    pub khz: u32,
    pub error_khz: u32,
}

impl Stages {
    /// Visit every divider pair in search order.
    ///
    /// Two-stage chains only visit `pre <= post`: the product is what
    /// matters, and this order decides which of two equal products wins.
    fn for_each(&self, mut f: impl FnMut(u32, u32)) {
        for pre in 1..=self.pre_max {
            match self.post_max {
                Some(post_max) => (pre..=post_max).for_each(|post| f(pre, post)),
                None => f(pre, 1),
            }
        }
    }

    fn max_product(&self) -> u32 {
        self.pre_max * self.post_max.unwrap_or(1)
    }
}

/// Exhaustive search over every PFD fraction and divider pair.
///
/// The first candidate with the smallest error wins.
pub(crate) fn search_pfd(parent_hz: u32, target_khz: u32, stages: Stages) -> Option<PfdCandidate> {
    let mut best: Option<PfdCandidate> = None;
    for frac in PFD_FRAC_MIN..=PFD_FRAC_MAX {
        let pfd_hz = pfd_output(parent_hz, u32::from(frac));
        stages.for_each(|pre, post| {
            let khz = pfd_hz / (pre * post) / 1000;
            let error_khz = khz.abs_diff(target_khz);
            if best.is_none_or(|b| error_khz < b.error_khz) {
                best = Some(PfdCandidate {
                    frac,
                    pre,
                    post,
                    khz,
                    error_khz,
                });
            }
        });
    }
    best
}

/// Pick the lowest VCO rate `target * pre * post * post_div` inside the
/// synthesizer window and derive the PLL settings for it.
///
/// Works in kHz throughout. Targets too low to reach the window even with
/// the largest dividers are first doubled, then quadrupled, through the PLL
/// post divider.
pub(crate) fn search_synth(osc_hz: u32, target_khz: u32, synth: &Synth, stages: Stages) -> Option<SynthCandidate> {
    let ref_khz = u64::from(osc_hz / 1000);
    if ref_khz == 0 || target_khz == 0 {
        return None;
    }
    let min = ref_khz * u64::from(synth.min_mult);
    let max = ref_khz * u64::from(synth.max_mult);

    let mut post_div = 1;
    let reach = u64::from(target_khz) * u64::from(stages.max_product());
    if reach < min {
        post_div = [2, 4].into_iter().find(|&d| reach * d > min)?;
    }
    let freq = u64::from(target_khz) * post_div;

    let mut best: Option<(u64, u32, u32)> = None;
    stages.for_each(|pre, post| {
        let vco = freq * u64::from(pre * post);
        if vco < min || vco > max {
            return;
        }
        if best.is_none_or(|(b, _, _)| vco < b) {
            best = Some((vco, pre, post));
        }
    });
    let (vco, pre, post) = best?;

    let mult = vco / ref_khz;
    let num = (vco - ref_khz * mult) * u64::from(synth.denom) / ref_khz;

    // Same arithmetic the forward walker uses
    let osc = u64::from(osc_hz);
    let pll_hz = (osc * mult + osc * num / u64::from(synth.denom)) / post_div;
    let khz = (pll_hz / u64::from(pre * post) / 1000) as u32;

    Some(SynthCandidate {
        mult: mult as u32,
        num: num as u32,
        denom: synth.denom,
        post_div: post_div as u32,
        pre,
        post,
        khz,
        error_khz: khz.abs_diff(target_khz),
    })
}

impl<R: RegisterFile, D> ClockTree<'_, R, D> {
    /// Choose the source and dividers that bring `consumer` closest to
    /// `target_khz`, without touching any register but reads.
    ///
    /// The consumer's PFD is preferred when `options.pfd` allows retuning it
    /// and its best result is within tolerance. Otherwise the fallback PLL is
    /// tried. The fallback is the display PLL and is reprogrammed whatever
    /// else runs from it.
    pub fn find_best_divider(
        &self,
        consumer: Consumer,
        channel: u8,
        target_khz: u32,
        options: SetOptions,
    ) -> Result<DividerSolution, ClockError> {
        let desc = self.consumer_desc(consumer, channel)?;
        let tuning = desc
            .tuning
            .ok_or(ClockError::UnsupportedVariant { consumer, channel })?;
        if target_khz == 0 {
            return Err(ClockError::bad_config("target frequency is zero"));
        }
        if let Some((route, value)) = tuning.route {
            if self.read_field(route.channel(channel)) != value {
                error!("{}: not routed through its divider chain", desc.name);
                return Err(ClockError::bad_config("consumer not routed through its divider chain"));
            }
        }

        let tolerance = options.tolerance.unwrap_or(self.config.tolerance);
        let stages = Stages {
            pre_max: tuning.pre_div.max() + 1,
            post_max: tuning.post_div.map(|f| f.max() + 1),
        };
        let mut best_khz = 0;

        let pfd = match (options.pfd, tuning.pfd) {
            (PfdPolicy::Never, _) | (_, None) => None,
            (PfdPolicy::Exclusive, Some((pfd, _))) if self.config.chip.pfd_shared(pfd, consumer) => {
                debug!("{}: {:?} feeds other consumers, not retuning it", desc.name, pfd);
                None
            }
            (_, Some((pfd, _))) => Some(pfd),
        };

        if let Some(pfd) = pfd {
            let parent_hz = self.pll_frequency(pfd.pll);
            let candidate = match parent_hz {
                0 => None,
                hz => search_pfd(hz, target_khz, stages),
            };
            if let Some(c) = candidate {
                trace!("{}: pfd frac {} /{} /{} -> {} kHz", desc.name, c.frac, c.pre, c.post, c.khz);
                if tolerance.accepts(target_khz, c.error_khz) {
                    return Ok(DividerSolution {
                        source: SourceChoice::Pfd { pfd, frac: c.frac },
                        pre: c.pre,
                        post: c.post,
                        resulting_khz: c.khz,
                        error_khz: c.error_khz,
                    });
                }
                best_khz = c.khz;
            }
        }

        if let Some((pll, _)) = tuning.fallback {
            let synth = self.config.chip.pll(pll).and_then(|desc| desc.synth);
            let candidate = synth.and_then(|s| search_synth(self.config.osc_hz, target_khz, &s, stages));
            if let Some(c) = candidate {
                trace!("{}: {:?} x{} + {}/{} -> {} kHz", desc.name, pll, c.mult, c.num, c.denom, c.khz);
                if tolerance.accepts(target_khz, c.error_khz) {
                    return Ok(DividerSolution {
                        source: SourceChoice::VideoPll {
                            pll,
                            mult: c.mult,
                            num: c.num,
                            denom: c.denom,
                            post_div: c.post_div,
                        },
                        pre: c.pre,
                        post: c.post,
                        resulting_khz: c.khz,
                        error_khz: c.error_khz,
                    });
                }
                if c.error_khz < best_khz.abs_diff(target_khz) {
                    best_khz = c.khz;
                }
            }
        }

        error!("{}: cannot reach {} kHz, closest {} kHz", desc.name, target_khz, best_khz);
        Err(ClockError::ToleranceNotMet { target_khz, best_khz })
    }
}

impl<R: RegisterFile, D: DelayNs> ClockTree<'_, R, D> {
    /// Program `consumer` to the frequency closest to `target_khz`.
    ///
    /// On success the consumer runs at `resulting_khz` of the returned
    /// solution. On [`ClockError::ToleranceNotMet`] no register was written.
    pub fn set_consumer_clock_khz(
        &mut self,
        consumer: Consumer,
        channel: u8,
        target_khz: u32,
        options: SetOptions,
    ) -> Result<DividerSolution, ClockError> {
        let solution = self.find_best_divider(consumer, channel, target_khz, options)?;
        let desc = self.consumer_desc(consumer, channel)?;
        let tuning = desc.tuning.ok_or(ClockError::prog_err("tuning vanished"))?;

        let selector = match solution.source {
            SourceChoice::Pfd { pfd, frac } => {
                self.program_pfd(pfd, frac)?;
                tuning.pfd.map(|(_, sel)| sel)
            }
            SourceChoice::VideoPll {
                pll,
                mult,
                num,
                denom,
                post_div,
            } => {
                self.program_synth(pll, mult, num, denom, post_div)?;
                tuning.fallback.map(|(_, sel)| sel)
            }
        };
        let selector = selector.ok_or(ClockError::prog_err("source without selector"))?;

        self.modify_field(tuning.pre_mux.channel(channel), selector);
        self.modify_field(tuning.pre_div.channel(channel), solution.pre - 1);
        if let Some(post_div) = tuning.post_div {
            self.modify_field(post_div.channel(channel), solution.post - 1);
        }

        info!(
            "{}/{}: {} kHz (asked {} kHz)",
            desc.name, channel, solution.resulting_khz, target_khz
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::clocks::chips::mx6;
    use crate::clocks::config::{ClockConfig, Tolerance};
    use crate::clocks::Ipu;
    use crate::mock::{MockDelay, MockRegisters};

    static MX6SX: ClockConfig = ClockConfig::new(&mx6::MX6SX);
    static MX6Q: ClockConfig = ClockConfig::new(&mx6::MX6Q);
    static MX6UL: ClockConfig = ClockConfig::new(&mx6::MX6UL);

    const TWO_STAGE: Stages = Stages {
        pre_max: 8,
        post_max: Some(8),
    };
    const ONE_STAGE: Stages = Stages {
        pre_max: 8,
        post_max: None,
    };
    const VIDEO: Synth = Synth {
        powerdown: crate::regs::Field::bit(mx6::PLL_VIDEO, 12),
        lock: crate::regs::Field::bit(mx6::PLL_VIDEO, 31),
        min_mult: 27,
        max_mult: 54,
        denom: 1_000_000,
    };

    fn tree(config: &ClockConfig, regs: MockRegisters) -> ClockTree<'_, MockRegisters, MockDelay> {
        ClockTree::new(config, regs, MockDelay::default())
    }

    fn locked(chip: &crate::clocks::chips::ChipDesc) -> MockRegisters {
        let mut regs = mx6::tests::running_plls(chip);
        regs.stick(chip.address(mx6::PLL_VIDEO), mx6::PLL_LOCK);
        regs
    }

    #[test]
    fn joint_minimum_over_pfd_and_dividers() {
        // 528MHz * 18 / 24 = 396MHz is twice the target. The joint search
        // finds an exact match earlier in the order.
        let best = search_pfd(528_000_000, 198_000, TWO_STAGE).unwrap();
        assert_eq!(
            best,
            PfdCandidate {
                frac: 12,
                pre: 1,
                post: 4,
                khz: 198_000,
                error_khz: 0,
            }
        );
    }

    #[test]
    fn single_stage_keeps_post_at_one() {
        let best = search_pfd(480_000_000, 148_500, ONE_STAGE).unwrap();
        assert_eq!((best.frac, best.pre, best.post), (29, 2, 1));
        assert_eq!(best.khz, 148_965);
    }

    #[test]
    fn synth_picks_lowest_vco() {
        let c = search_synth(24_000_000, 65_000, &VIDEO, TWO_STAGE).unwrap();
        assert_eq!((c.pre, c.post, c.post_div), (2, 5, 1));
        assert_eq!((c.mult, c.num, c.denom), (27, 83_333, 1_000_000));
        assert_eq!((c.khz, c.error_khz), (64_999, 1));
    }

    #[test]
    fn synth_doubles_low_targets() {
        let c = search_synth(24_000_000, 8_000, &VIDEO, TWO_STAGE).unwrap();
        assert_eq!(c.post_div, 2);
        assert_eq!((c.pre, c.post), (6, 7));
        assert_eq!((c.mult, c.num), (28, 0));
        assert_eq!(c.khz, 8_000);
    }

    #[test]
    fn synth_gives_up_below_quadrupling() {
        assert_eq!(search_synth(24_000_000, 1_000, &VIDEO, TWO_STAGE), None);
    }

    #[test]
    fn set_through_pfd_round_trips() {
        // The UltraLite has a single LCDIF, nothing else can run from PLL3 PFD3
        let chip = &mx6::MX6UL;
        let mut t = tree(&MX6UL, locked(chip));
        let solution = t
            .set_consumer_clock_khz(Consumer::Lcdif(1), 0, 65_000, SetOptions::default())
            .unwrap();
        assert_eq!(
            solution.source,
            SourceChoice::Pfd {
                pfd: PfdRef {
                    pll: PllId::Pll3,
                    index: 3
                },
                frac: 19
            }
        );
        assert_eq!((solution.pre, solution.post), (1, 7));
        assert_eq!(solution.resulting_khz, 64_962);
        assert_eq!(t.get_consumer_clock_khz(Consumer::Lcdif(1), 0), solution.resulting_khz);
        // pre_sel = PLL3 PFD3
        assert_eq!(t.registers().get(chip.address(mx6::CSCDR2)), 1 << 15);
    }

    #[test]
    fn set_through_video_pll_round_trips() {
        let chip = &mx6::MX6SX;
        let mut t = tree(&MX6SX, locked(chip));
        let options = SetOptions {
            pfd: PfdPolicy::Never,
            tolerance: None,
        };
        let solution = t.set_consumer_clock_khz(Consumer::Lcdif(1), 0, 65_000, options).unwrap();
        assert!(matches!(solution.source, SourceChoice::VideoPll { pll: PllId::Pll5, .. }));
        assert_eq!(t.get_consumer_clock_khz(Consumer::Lcdif(1), 0), 64_999);

        let regs = t.registers();
        assert_eq!(regs.get(chip.address(mx6::PLL_VIDEO_NUM)), 83_333);
        assert_eq!(regs.get(chip.address(mx6::PLL_VIDEO_DENOM)), 1_000_000);
        assert_eq!(regs.get(chip.address(mx6::CSCDR2)), (2 << 15) | (1 << 12));
        assert_eq!(regs.get(chip.address(mx6::CBCMR)), 4 << 23);
    }

    #[test]
    fn inaccurate_pfd_falls_back() {
        let chip = &mx6::MX6UL;
        let mut t = tree(&MX6UL, locked(chip));
        // PFD best is 33750kHz, 0.75% off
        let solution = t
            .set_consumer_clock_khz(Consumer::Lcdif(1), 0, 33_500, SetOptions::default())
            .unwrap();
        assert!(matches!(solution.source, SourceChoice::VideoPll { mult: 27, .. }));
        assert_eq!((solution.pre, solution.post), (4, 5));
        assert_eq!(t.get_consumer_clock_khz(Consumer::Lcdif(1), 0), 33_499);
    }

    #[test]
    fn unreachable_target_writes_nothing() {
        let chip = &mx6::MX6UL;
        let mut t = tree(&MX6UL, locked(chip));
        assert_eq!(
            t.set_consumer_clock_khz(Consumer::Lcdif(1), 0, 1_000, SetOptions::default()),
            Err(ClockError::ToleranceNotMet {
                target_khz: 1_000,
                best_khz: 3_857
            })
        );
        assert_eq!(t.registers().write_count(), 0);
    }

    #[test]
    fn looser_tolerance_keeps_pfd() {
        let chip = &mx6::MX6SX;
        let t = tree(&MX6SX, locked(chip));
        let options = SetOptions {
            pfd: PfdPolicy::Shared,
            tolerance: Some(Tolerance::permille(10)),
        };
        let solution = t.find_best_divider(Consumer::Lcdif(1), 0, 33_500, options).unwrap();
        assert!(matches!(solution.source, SourceChoice::Pfd { frac: 16, .. }));
        assert_eq!(solution.resulting_khz, 33_750);
    }

    #[test]
    fn ipu_di_channel_one_single_stage() {
        let chip = &mx6::MX6Q;
        let mut t = tree(&MX6Q, locked(chip));
        let solution = t
            .set_consumer_clock_khz(Consumer::IpuDi(Ipu::Ipu1), 1, 148_500, SetOptions::default())
            .unwrap();
        // 742.5MHz / 5
        assert_eq!(
            solution.source,
            SourceChoice::VideoPll {
                pll: PllId::Pll5,
                mult: 30,
                num: 937_500,
                denom: 1_000_000,
                post_div: 1
            }
        );
        assert_eq!((solution.pre, solution.post), (5, 1));
        assert_eq!(solution.resulting_khz, 148_500);
        assert_eq!(t.get_consumer_clock_khz(Consumer::IpuDi(Ipu::Ipu1), 1), solution.resulting_khz);
        // Channel 0 untouched
        assert_eq!(t.registers().get(chip.address(mx6::CHSCCDR)) & 0x1FF, 0);
    }

    #[test]
    fn pfd_shared_with_other_consumers_is_not_retuned() {
        let chip = &mx6::MX6Q;
        // IPU1 HSP runs from PLL3 PFD1, the PFD the DI chains can select
        let regs = locked(chip).with(chip.address(mx6::CSCDR3), 3 << 9);
        let mut t = tree(&MX6Q, regs);
        let pfd_480 = t.registers().get(chip.address(mx6::PFD_480));
        let hsp = t.consumer_frequency(Consumer::IpuHsp(Ipu::Ipu1), 0);
        assert_eq!(hsp, 540_000_000);

        let di0 = t
            .set_consumer_clock_khz(Consumer::IpuDi(Ipu::Ipu1), 0, 65_000, SetOptions::default())
            .unwrap();
        assert!(matches!(di0.source, SourceChoice::VideoPll { .. }));
        assert_eq!(di0.resulting_khz, 64_999);
        let di1 = t
            .set_consumer_clock_khz(Consumer::IpuDi(Ipu::Ipu1), 1, 148_500, SetOptions::default())
            .unwrap();
        assert!(matches!(di1.source, SourceChoice::VideoPll { .. }));

        assert_eq!(t.registers().get(chip.address(mx6::PFD_480)), pfd_480);
        assert_eq!(t.consumer_frequency(Consumer::IpuHsp(Ipu::Ipu1), 0), hsp);
    }

    #[test]
    fn other_lcdif_keeps_its_clock() {
        let chip = &mx6::MX6SX;
        // LCDIF2 pre-mux on PLL3 PFD3, which LCDIF1 would otherwise retune
        let regs = locked(chip).with(chip.address(mx6::CSCDR2), 1 << 6);
        let mut t = tree(&MX6SX, regs);
        let lcdif2 = t.consumer_frequency(Consumer::Lcdif(2), 0);
        assert_eq!(lcdif2, 454_736_842);

        let solution = t
            .set_consumer_clock_khz(Consumer::Lcdif(1), 0, 65_000, SetOptions::default())
            .unwrap();
        assert!(matches!(solution.source, SourceChoice::VideoPll { .. }));
        assert_eq!(t.get_consumer_clock_khz(Consumer::Lcdif(1), 0), 64_999);
        assert_eq!(t.consumer_frequency(Consumer::Lcdif(2), 0), lcdif2);

        // Opting in retunes the PFD under LCDIF2 as well
        let options = SetOptions {
            pfd: PfdPolicy::Shared,
            tolerance: None,
        };
        let solution = t.set_consumer_clock_khz(Consumer::Lcdif(1), 0, 33_750, options).unwrap();
        assert!(matches!(solution.source, SourceChoice::Pfd { frac: 16, .. }));
        assert_eq!(t.get_consumer_clock_khz(Consumer::Lcdif(1), 0), 33_750);
        assert_eq!(t.consumer_frequency(Consumer::Lcdif(2), 0), 540_000_000);
    }

    #[test]
    fn unrouted_consumer_is_refused() {
        let chip = &mx6::MX6Q;
        // DI0 fed from the LDB, not from its own divider chain
        let regs = locked(chip).with(chip.address(mx6::CHSCCDR), 3);
        let mut t = tree(&MX6Q, regs);
        assert!(matches!(
            t.set_consumer_clock_khz(Consumer::IpuDi(Ipu::Ipu1), 0, 65_000, SetOptions::default()),
            Err(ClockError::BadConfiguration { .. })
        ));
        assert_eq!(t.registers().write_count(), 0);
    }

    #[test]
    fn untunable_consumer() {
        let t = tree(&MX6Q, MockRegisters::new());
        assert_eq!(
            t.find_best_divider(Consumer::Ldb, 0, 65_000, SetOptions::default()),
            Err(ClockError::UnsupportedVariant {
                consumer: Consumer::Ldb,
                channel: 0
            })
        );
    }

    proptest! {
        #[test]
        fn pfd_search_matches_brute_force(parent_mhz in 300u32..=1300, target_khz in 1_000u32..=400_000) {
            let parent_hz = parent_mhz * 1_000_000;
            let best = search_pfd(parent_hz, target_khz, TWO_STAGE).unwrap();

            // Every fraction against every divider pair, symmetric duplicates included
            let mut brute = u32::MAX;
            for frac in 12..=35u32 {
                let pfd_hz = (u64::from(parent_hz) * 18 / u64::from(frac)) as u32;
                for pre in 1..=8u32 {
                    for post in 1..=8u32 {
                        brute = brute.min((pfd_hz / (pre * post) / 1000).abs_diff(target_khz));
                    }
                }
            }
            prop_assert_eq!(best.error_khz, brute);
            prop_assert!(best.pre <= best.post);
            prop_assert_eq!(best.khz.abs_diff(target_khz), best.error_khz);
        }

        #[test]
        fn set_then_get_round_trips(target_khz in 5_000u32..=200_000, shared in any::<bool>()) {
            let cases = [
                (&MX6UL, Consumer::Lcdif(1), 0),
                (&MX6Q, Consumer::IpuDi(Ipu::Ipu1), 0),
                (&MX6Q, Consumer::IpuDi(Ipu::Ipu2), 1),
            ];
            let options = SetOptions {
                pfd: if shared { PfdPolicy::Shared } else { PfdPolicy::Exclusive },
                tolerance: None,
            };
            for (config, consumer, channel) in cases {
                let mut t = tree(config, locked(config.chip));
                if let Ok(solution) = t.set_consumer_clock_khz(consumer, channel, target_khz, options) {
                    let khz = t.get_consumer_clock_khz(consumer, channel);
                    prop_assert_eq!(khz, solution.resulting_khz);
                    prop_assert!(config.tolerance.accepts(target_khz, khz.abs_diff(target_khz)));
                }
            }
        }

        #[test]
        fn synth_hits_target_within_a_khz(target_khz in 11_000u32..=160_000) {
            let c = search_synth(24_000_000, target_khz, &VIDEO, TWO_STAGE).unwrap();
            prop_assert!(c.error_khz <= 1);
            prop_assert!((27..=54).contains(&c.mult));
        }
    }
}
