//! Vybrid VF610
//!
//! ```text
//!   osc ──────────────────┐ CCSR[2:0]
//!   32k ──────────────────┤ ┌─────────┐  CACRR[2:0]   CACRR[5:3]   CACRR[12:11]
//!   pll2 / pfd1..4 ─[21:19]─▶│ sys_clk │──▶ /n ─▶ arm ──▶ /n ─▶ bus ──▶ /n ─▶ ipg
//!   pll1 / pfd1..4 ─[18:16]─▶└─────────┘
//!   pll3 ─────────────────┘
//! ```
//!
//! PFD outputs are numbered from 1 on this family.

use super::{ChipDesc, ChipVariant, ConsumerDesc, MuxSwitch};
use crate::clocks::pll::{Fraction, Multiplier, PfdBank, PllDesc, PllId, PostDiv};
use crate::clocks::tree::ClockSource;
use crate::clocks::Consumer;
use crate::regs::{Field, Reg};

const CCM_BASE: u32 = 0x4006_B000;
const ANADIG_BASE: u32 = 0x4005_0000;

/// CCM clock switcher
pub const CCSR: Reg = Reg::ccm(0x08);
/// ARM, bus and IPG dividers
pub const CACRR: Reg = Reg::ccm(0x0C);
/// Serial clock multiplexer 1
pub const CSCMR1: Reg = Reg::ccm(0x10);
/// Serial clock divider 2
pub const CSCDR2: Reg = Reg::ccm(0x18);
/// Serial clock multiplexer 2
pub const CSCMR2: Reg = Reg::ccm(0x20);

/// PLL3 (USB0) control
pub const PLL3_CTRL: Reg = Reg::analog(0x010);
/// PLL7 (USB1) control
pub const PLL7_CTRL: Reg = Reg::analog(0x020);
/// PLL2 control
pub const PLL2_CTRL: Reg = Reg::analog(0x030);
/// PLL2 numerator
pub const PLL2_NUM: Reg = Reg::analog(0x050);
/// PLL2 denominator
pub const PLL2_DENOM: Reg = Reg::analog(0x060);
/// PLL4 (audio) control
pub const PLL4_CTRL: Reg = Reg::analog(0x070);
/// PLL4 numerator
pub const PLL4_NUM: Reg = Reg::analog(0x080);
/// PLL4 denominator
pub const PLL4_DENOM: Reg = Reg::analog(0x090);
/// PLL6 (video) control
pub const PLL6_CTRL: Reg = Reg::analog(0x0A0);
/// PLL6 numerator
pub const PLL6_NUM: Reg = Reg::analog(0x0B0);
/// PLL6 denominator
pub const PLL6_DENOM: Reg = Reg::analog(0x0C0);
/// PLL5 (ENET) control
pub const PLL5_CTRL: Reg = Reg::analog(0x0E0);
/// PLL3 PFD bank
pub const PLL3_PFD: Reg = Reg::analog(0x0F0);
/// PLL2 PFD bank
pub const PLL2_PFD: Reg = Reg::analog(0x100);
/// PLL1 control
pub const PLL1_CTRL: Reg = Reg::analog(0x270);
/// PLL1 numerator
pub const PLL1_NUM: Reg = Reg::analog(0x290);
/// PLL1 denominator
pub const PLL1_DENOM: Reg = Reg::analog(0x2A0);
/// PLL1 PFD bank
pub const PLL1_PFD: Reg = Reg::analog(0x2B0);

/// PLL control: output enable
pub const PLL_ENABLE: u32 = 1 << 13;
/// PLL control: bypass
pub const PLL_BYPASS: u32 = 1 << 16;

const fn pll(
    id: PllId,
    name: &'static str,
    ctrl: Reg,
    mult: Multiplier,
    frac: Fraction,
    pfd: Option<Reg>,
) -> PllDesc {
    PllDesc {
        id,
        name,
        enable: Field::bit(ctrl, 13),
        bypass: Field::bit(ctrl, 16),
        mult,
        frac,
        post_div: None,
        pfd: match pfd {
            Some(reg) => Some(PfdBank { reg, first: 1, count: 4 }),
            None => None,
        },
        synth: None,
    }
}

const fn frac(num: Reg, denom: Reg) -> Fraction {
    Fraction::Registers {
        num: Field::new(num, 0, 30),
        denom: Field::new(denom, 0, 30),
    }
}

const fn select_20_22(ctrl: Reg) -> Multiplier {
    Multiplier::Select {
        field: Field::bit(ctrl, 0),
        values: &[20, 22],
    }
}

static PLLS: [PllDesc; 7] = [
    pll(
        PllId::Pll1,
        "pll1_sys",
        PLL1_CTRL,
        select_20_22(PLL1_CTRL),
        frac(PLL1_NUM, PLL1_DENOM),
        Some(PLL1_PFD),
    ),
    pll(
        PllId::Pll2,
        "pll2_528",
        PLL2_CTRL,
        select_20_22(PLL2_CTRL),
        frac(PLL2_NUM, PLL2_DENOM),
        Some(PLL2_PFD),
    ),
    pll(
        PllId::Pll3,
        "pll3_usb0",
        PLL3_CTRL,
        select_20_22(PLL3_CTRL),
        Fraction::None,
        Some(PLL3_PFD),
    ),
    PllDesc {
        post_div: Some(PostDiv {
            field: Field::new(PLL4_CTRL, 19, 2),
            divisors: [4, 2, 1, 0],
        }),
        ..pll(
            PllId::Pll4,
            "pll4_audio",
            PLL4_CTRL,
            Multiplier::Field(Field::new(PLL4_CTRL, 0, 7)),
            frac(PLL4_NUM, PLL4_DENOM),
            None,
        )
    },
    // 500MHz, ENET and RMII derive from it
    pll(
        PllId::Pll5,
        "pll5_enet",
        PLL5_CTRL,
        Multiplier::Fixed(20),
        Fraction::Constant { num: 5, denom: 6 },
        None,
    ),
    PllDesc {
        post_div: Some(PostDiv {
            field: Field::new(PLL6_CTRL, 19, 2),
            divisors: [4, 2, 1, 0],
        }),
        ..pll(
            PllId::Pll6,
            "pll6_video",
            PLL6_CTRL,
            Multiplier::Field(Field::new(PLL6_CTRL, 0, 7)),
            frac(PLL6_NUM, PLL6_DENOM),
            None,
        )
    },
    pll(
        PllId::Pll7,
        "pll7_usb1",
        PLL7_CTRL,
        select_20_22(PLL7_CTRL),
        Fraction::None,
        None,
    ),
];

static OSC: ClockSource = ClockSource::Osc;
static SLOW: ClockSource = ClockSource::Fixed(32_768);
static PLL1: ClockSource = ClockSource::Pll(PllId::Pll1);
static PLL2: ClockSource = ClockSource::Pll(PllId::Pll2);
static PLL3: ClockSource = ClockSource::Pll(PllId::Pll3);
static PLL5: ClockSource = ClockSource::Pll(PllId::Pll5);
static PLL1_PFD1: ClockSource = ClockSource::Pfd(PllId::Pll1, 1);
static PLL1_PFD2: ClockSource = ClockSource::Pfd(PllId::Pll1, 2);
static PLL1_PFD3: ClockSource = ClockSource::Pfd(PllId::Pll1, 3);
static PLL1_PFD4: ClockSource = ClockSource::Pfd(PllId::Pll1, 4);
static PLL2_PFD1: ClockSource = ClockSource::Pfd(PllId::Pll2, 1);
static PLL2_PFD2: ClockSource = ClockSource::Pfd(PllId::Pll2, 2);
static PLL2_PFD3: ClockSource = ClockSource::Pfd(PllId::Pll2, 3);
static PLL2_PFD4: ClockSource = ClockSource::Pfd(PllId::Pll2, 4);
static PLL3_PFD3: ClockSource = ClockSource::Pfd(PllId::Pll3, 3);

static PLL1_PFD_SEL: ClockSource = ClockSource::Mux {
    sel: Field::new(CCSR, 16, 3),
    inputs: &[
        Some(&PLL1),
        Some(&PLL1_PFD1),
        Some(&PLL1_PFD2),
        Some(&PLL1_PFD3),
        Some(&PLL1_PFD4),
        None,
        None,
        None,
    ],
};
static PLL2_PFD_SEL: ClockSource = ClockSource::Mux {
    sel: Field::new(CCSR, 19, 3),
    inputs: &[
        Some(&PLL2),
        Some(&PLL2_PFD1),
        Some(&PLL2_PFD2),
        Some(&PLL2_PFD3),
        Some(&PLL2_PFD4),
        None,
        None,
        None,
    ],
};
static SYS: ClockSource = ClockSource::Mux {
    sel: Field::new(CCSR, 0, 3),
    inputs: &[
        Some(&OSC),
        Some(&SLOW),
        Some(&PLL2_PFD_SEL),
        Some(&PLL2),
        Some(&PLL1_PFD_SEL),
        Some(&PLL3),
        None,
        None,
    ],
};
static ARM: ClockSource = ClockSource::Div {
    parent: &SYS,
    div: Field::new(CACRR, 0, 3),
};
static BUS: ClockSource = ClockSource::Div {
    parent: &ARM,
    div: Field::new(CACRR, 3, 3),
};
static IPG: ClockSource = ClockSource::Div {
    parent: &BUS,
    div: Field::new(CACRR, 11, 2),
};

static ESDHC0_SEL: ClockSource = ClockSource::Mux {
    sel: Field::new(CSCMR1, 16, 2),
    inputs: &[Some(&PLL3), Some(&PLL3_PFD3), Some(&PLL1_PFD3), Some(&BUS)],
};
static ESDHC0: ClockSource = ClockSource::Div {
    parent: &ESDHC0_SEL,
    div: Field::new(CSCDR2, 16, 4),
};
static ESDHC1_SEL: ClockSource = ClockSource::Mux {
    sel: Field::new(CSCMR1, 18, 2),
    inputs: &[Some(&PLL3), Some(&PLL3_PFD3), Some(&PLL1_PFD3), Some(&BUS)],
};
static ESDHC1: ClockSource = ClockSource::Div {
    parent: &ESDHC1_SEL,
    div: Field::new(CSCDR2, 20, 4),
};

static ENET_EXT: ClockSource = ClockSource::Fixed(50_000_000);
static AUDIO_EXT: ClockSource = ClockSource::Fixed(24_576_000);
static PLL5_50M: ClockSource = ClockSource::Scale {
    parent: &PLL5,
    mul: 1,
    div: 10,
};
static PLL5_25M: ClockSource = ClockSource::Scale {
    parent: &PLL5,
    mul: 1,
    div: 20,
};
static RMII: ClockSource = ClockSource::Mux {
    sel: Field::new(CSCMR2, 4, 2),
    inputs: &[Some(&ENET_EXT), Some(&AUDIO_EXT), Some(&PLL5_50M), Some(&PLL5_25M)],
};

const fn plain(consumer: Consumer, name: &'static str, source: &'static ClockSource) -> ConsumerDesc {
    ConsumerDesc {
        consumer,
        name,
        channels: 1,
        source,
        tuning: None,
        switch: None,
    }
}

const fn switched(consumer: Consumer, name: &'static str, source: &'static ClockSource, mux: &'static ClockSource) -> ConsumerDesc {
    ConsumerDesc {
        consumer,
        name,
        channels: 1,
        source,
        tuning: None,
        switch: Some(MuxSwitch { mux, glitch_free: None }),
    }
}

static CONSUMERS: [ConsumerDesc; 7] = [
    plain(Consumer::Cpu, "arm", &ARM),
    plain(Consumer::Ahb, "bus", &BUS),
    plain(Consumer::Ipg, "ipg", &IPG),
    plain(Consumer::Uart, "uart", &IPG),
    switched(Consumer::Esdhc(0), "esdhc0", &ESDHC0, &ESDHC0_SEL),
    switched(Consumer::Esdhc(1), "esdhc1", &ESDHC1, &ESDHC1_SEL),
    switched(Consumer::Fec, "rmii", &RMII, &RMII),
];

/// Vybrid VF610
pub static VF610: ChipDesc = ChipDesc {
    variant: ChipVariant::Vf610,
    name: "VF610",
    ccm_base: CCM_BASE,
    analog_base: ANADIG_BASE,
    plls: &PLLS,
    consumers: &CONSUMERS,
};
