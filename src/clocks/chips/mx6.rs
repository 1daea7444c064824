//! i.MX6 Quad, DualLite, SoloX and UltraLite
//!
//! ```text
//!                     CBCMR[19:18]        CBCDR[25]     CBCDR[21:19]
//!   pll2 ──────────┐  ┌──────────┐       ┌────────┐    ┌─────┐
//!   pll2_pfd2 ─────┼─▶│pre_periph│──────▶│ periph │─┬─▶│ /n  │──▶ mmdc_ch0 ──┐
//!   pll2_pfd0 ─────┤  └──────────┘  ┌───▶└────────┘ │  └─────┘               │
//!   pll2_pfd2/2 ───┘    periph_clk2 ┘               └─▶ ahb ──▶ ipg          │
//!                                                                            ▼
//!   CS2CDR ldb_di_sel ──▶ ldb_di ──▶ (x2 unless CSCMR2 full) /7 ──▶ ipu_di clk_sel 3/4
//!   CHSCCDR/CSCDR2 di_pre_sel ──▶ /podf ──▶ ipu_di clk_sel 0
//! ```
//!
//! The four variants share one register map and differ in which display
//! blocks exist and in the width of the PLL2 PFD bank.

use paste::paste;

use super::{ChipDesc, ChipVariant, ConsumerDesc, GlitchFreeMux, MuxSwitch, Tuning};
use crate::clocks::pll::{Fraction, Multiplier, PfdBank, PfdRef, PllDesc, PllId, PostDiv, Synth};
use crate::clocks::tree::ClockSource;
use crate::clocks::{Consumer, Ipu};
use crate::regs::{Field, Reg};

//
// Consts and statics
//

const CCM_BASE: u32 = 0x020C_4000;
const ANATOP_BASE: u32 = 0x020C_8000;

/// CCM control
pub const CCR: Reg = Reg::ccm(0x00);
/// CCM control divider
pub const CCDR: Reg = Reg::ccm(0x04);
/// CCM clock switcher
pub const CCSR: Reg = Reg::ccm(0x0C);
/// ARM clock root divider
pub const CACRR: Reg = Reg::ccm(0x10);
/// Bus clock divider
pub const CBCDR: Reg = Reg::ccm(0x14);
/// Bus clock multiplexer
pub const CBCMR: Reg = Reg::ccm(0x18);
/// Serial clock multiplexer 1
pub const CSCMR1: Reg = Reg::ccm(0x1C);
/// Serial clock multiplexer 2
pub const CSCMR2: Reg = Reg::ccm(0x20);
/// Serial clock divider 1
pub const CSCDR1: Reg = Reg::ccm(0x24);
/// SSI2 / LDB clock divider
pub const CS2CDR: Reg = Reg::ccm(0x2C);
/// IPU1 DI clock selectors
pub const CHSCCDR: Reg = Reg::ccm(0x34);
/// IPU2 DI (Quad/DualLite) or LCDIF (SoloX/UltraLite) clock selectors
pub const CSCDR2: Reg = Reg::ccm(0x38);
/// IPU HSP clock selectors
pub const CSCDR3: Reg = Reg::ccm(0x3C);
/// Divider handshake in-process
pub const CDHIPR: Reg = Reg::ccm(0x48);

/// ARM PLL control
pub const PLL_ARM: Reg = Reg::analog(0x000);
/// USB1 PLL control
pub const PLL_USB1: Reg = Reg::analog(0x010);
/// USB2 PLL control
pub const PLL_USB2: Reg = Reg::analog(0x020);
/// 528MHz system PLL control
pub const PLL_528: Reg = Reg::analog(0x030);
/// Audio PLL control
pub const PLL_AUDIO: Reg = Reg::analog(0x070);
/// Audio PLL numerator
pub const PLL_AUDIO_NUM: Reg = Reg::analog(0x080);
/// Audio PLL denominator
pub const PLL_AUDIO_DENOM: Reg = Reg::analog(0x090);
/// Video PLL control
pub const PLL_VIDEO: Reg = Reg::analog(0x0A0);
/// Video PLL numerator
pub const PLL_VIDEO_NUM: Reg = Reg::analog(0x0B0);
/// Video PLL denominator
pub const PLL_VIDEO_DENOM: Reg = Reg::analog(0x0C0);
/// ENET PLL control
pub const PLL_ENET: Reg = Reg::analog(0x0E0);
/// PLL3 PFD bank
pub const PFD_480: Reg = Reg::analog(0x0F0);
/// PLL2 PFD bank
pub const PFD_528: Reg = Reg::analog(0x100);

/// PLL control: output enable
pub const PLL_ENABLE: u32 = 1 << 13;
/// PLL control: bypass
pub const PLL_BYPASS: u32 = 1 << 16;
/// PLL control: power down
pub const PLL_POWERDOWN: u32 = 1 << 12;
/// PLL control: lock status
pub const PLL_LOCK: u32 = 1 << 31;

const POST_DIV_TABLE: [u8; 4] = [4, 2, 1, 0];

const fn enable(reg: Reg) -> Field {
    Field::bit(reg, 13)
}

const fn bypass(reg: Reg) -> Field {
    Field::bit(reg, 16)
}

const fn post_div(reg: Reg) -> Option<PostDiv> {
    Some(PostDiv {
        field: Field::new(reg, 19, 2),
        divisors: POST_DIV_TABLE,
    })
}

const fn plls(pll2_pfds: u8) -> [PllDesc; 7] {
    [
        PllDesc {
            id: PllId::Pll1,
            name: "pll1_sys",
            enable: enable(PLL_ARM),
            bypass: bypass(PLL_ARM),
            mult: Multiplier::HalfField(Field::new(PLL_ARM, 0, 7)),
            frac: Fraction::None,
            post_div: None,
            pfd: None,
            synth: None,
        },
        PllDesc {
            id: PllId::Pll2,
            name: "pll2_bus",
            enable: enable(PLL_528),
            bypass: bypass(PLL_528),
            mult: Multiplier::Select {
                field: Field::bit(PLL_528, 0),
                values: &[20, 22],
            },
            frac: Fraction::None,
            post_div: None,
            pfd: Some(PfdBank {
                reg: PFD_528,
                first: 0,
                count: pll2_pfds,
            }),
            synth: None,
        },
        PllDesc {
            id: PllId::Pll3,
            name: "pll3_usb_otg",
            enable: enable(PLL_USB1),
            bypass: bypass(PLL_USB1),
            mult: Multiplier::Select {
                field: Field::bit(PLL_USB1, 0),
                values: &[20, 22],
            },
            frac: Fraction::None,
            post_div: None,
            pfd: Some(PfdBank {
                reg: PFD_480,
                first: 0,
                count: 4,
            }),
            synth: None,
        },
        PllDesc {
            id: PllId::Pll4,
            name: "pll4_audio",
            enable: enable(PLL_AUDIO),
            bypass: bypass(PLL_AUDIO),
            mult: Multiplier::Field(Field::new(PLL_AUDIO, 0, 7)),
            frac: Fraction::Registers {
                num: Field::new(PLL_AUDIO_NUM, 0, 30),
                denom: Field::new(PLL_AUDIO_DENOM, 0, 30),
            },
            post_div: post_div(PLL_AUDIO),
            pfd: None,
            synth: None,
        },
        PllDesc {
            id: PllId::Pll5,
            name: "pll5_video",
            enable: enable(PLL_VIDEO),
            bypass: bypass(PLL_VIDEO),
            mult: Multiplier::Field(Field::new(PLL_VIDEO, 0, 7)),
            frac: Fraction::Registers {
                num: Field::new(PLL_VIDEO_NUM, 0, 30),
                denom: Field::new(PLL_VIDEO_DENOM, 0, 30),
            },
            post_div: post_div(PLL_VIDEO),
            pfd: None,
            synth: Some(Synth {
                powerdown: Field::bit(PLL_VIDEO, 12),
                lock: Field::bit(PLL_VIDEO, 31),
                min_mult: 27,
                max_mult: 54,
                denom: 1_000_000,
            }),
        },
        // 500MHz VCO, the 25/50/100/125MHz ENET outputs are not modelled
        PllDesc {
            id: PllId::Pll6,
            name: "pll6_enet",
            enable: enable(PLL_ENET),
            bypass: bypass(PLL_ENET),
            mult: Multiplier::Fixed(20),
            frac: Fraction::Constant { num: 5, denom: 6 },
            post_div: None,
            pfd: None,
            synth: None,
        },
        PllDesc {
            id: PllId::Pll7,
            name: "pll7_usb_host",
            enable: enable(PLL_USB2),
            bypass: bypass(PLL_USB2),
            mult: Multiplier::Select {
                field: Field::bit(PLL_USB2, 0),
                values: &[20, 22],
            },
            frac: Fraction::None,
            post_div: None,
            pfd: None,
            synth: None,
        },
    ]
}

static PLLS_PFD3: [PllDesc; 7] = plls(3);
static PLLS_PFD4: [PllDesc; 7] = plls(4);

//
// Clock graph
//

static OSC: ClockSource = ClockSource::Osc;
static PLL1: ClockSource = ClockSource::Pll(PllId::Pll1);
static PLL2: ClockSource = ClockSource::Pll(PllId::Pll2);
static PLL3: ClockSource = ClockSource::Pll(PllId::Pll3);
static PLL5: ClockSource = ClockSource::Pll(PllId::Pll5);
static PLL2_PFD0: ClockSource = ClockSource::Pfd(PllId::Pll2, 0);
static PLL2_PFD1: ClockSource = ClockSource::Pfd(PllId::Pll2, 1);
static PLL2_PFD2: ClockSource = ClockSource::Pfd(PllId::Pll2, 2);
static PLL3_PFD0: ClockSource = ClockSource::Pfd(PllId::Pll3, 0);
static PLL3_PFD1: ClockSource = ClockSource::Pfd(PllId::Pll3, 1);
static PLL3_PFD3: ClockSource = ClockSource::Pfd(PllId::Pll3, 3);

static PLL3_SW: ClockSource = ClockSource::Mux {
    sel: Field::bit(CCSR, 0),
    inputs: &[Some(&PLL3), Some(&OSC)],
};
static PLL3_120M: ClockSource = ClockSource::Scale {
    parent: &PLL3_SW,
    mul: 1,
    div: 4,
};
static PLL3_80M: ClockSource = ClockSource::Scale {
    parent: &PLL3_SW,
    mul: 1,
    div: 6,
};
static PLL2_PFD2_DIV2: ClockSource = ClockSource::Scale {
    parent: &PLL2_PFD2,
    mul: 1,
    div: 2,
};

static CPU: ClockSource = ClockSource::Div {
    parent: &PLL1,
    div: Field::new(CACRR, 0, 3),
};

static PRE_PERIPH: ClockSource = ClockSource::Mux {
    sel: Field::new(CBCMR, 18, 2),
    inputs: &[Some(&PLL2), Some(&PLL2_PFD2), Some(&PLL2_PFD0), Some(&PLL2_PFD2_DIV2)],
};
static PERIPH_CLK2_SEL: ClockSource = ClockSource::Mux {
    sel: Field::new(CBCMR, 12, 2),
    inputs: &[Some(&PLL3_SW), Some(&OSC), Some(&OSC), None],
};
static PERIPH_CLK2: ClockSource = ClockSource::Div {
    parent: &PERIPH_CLK2_SEL,
    div: Field::new(CBCDR, 27, 3),
};
static PERIPH: ClockSource = ClockSource::Mux {
    sel: Field::bit(CBCDR, 25),
    inputs: &[Some(&PRE_PERIPH), Some(&PERIPH_CLK2)],
};
static MMDC_CH0: ClockSource = ClockSource::Div {
    parent: &PERIPH,
    div: Field::new(CBCDR, 19, 3),
};
static AHB: ClockSource = ClockSource::Div {
    parent: &PERIPH,
    div: Field::new(CBCDR, 10, 3),
};
static IPG: ClockSource = ClockSource::Div {
    parent: &AHB,
    div: Field::new(CBCDR, 8, 2),
};

static PRE_PERIPH2: ClockSource = ClockSource::Mux {
    sel: Field::new(CBCMR, 21, 2),
    inputs: &[Some(&PLL2), Some(&PLL2_PFD2), Some(&PLL2_PFD0), Some(&PLL2_PFD2_DIV2)],
};
static PERIPH2_CLK2_SEL: ClockSource = ClockSource::Mux {
    sel: Field::bit(CBCMR, 20),
    inputs: &[Some(&PLL3_SW), Some(&OSC)],
};
static PERIPH2_CLK2: ClockSource = ClockSource::Div {
    parent: &PERIPH2_CLK2_SEL,
    div: Field::new(CBCDR, 0, 3),
};
static PERIPH2: ClockSource = ClockSource::Mux {
    sel: Field::bit(CBCDR, 26),
    inputs: &[Some(&PRE_PERIPH2), Some(&PERIPH2_CLK2)],
};
static MMDC_CH1: ClockSource = ClockSource::Div {
    parent: &PERIPH2,
    div: Field::new(CBCDR, 16, 3),
};

static UART: ClockSource = ClockSource::Div {
    parent: &PLL3_80M,
    div: Field::new(CSCDR1, 0, 6),
};
static UART_SEL: ClockSource = ClockSource::Mux {
    sel: Field::bit(CSCDR1, 6),
    inputs: &[Some(&PLL3_80M), Some(&OSC)],
};
static UART_MUXED: ClockSource = ClockSource::Div {
    parent: &UART_SEL,
    div: Field::new(CSCDR1, 0, 6),
};

macro_rules! usdhc {
    ($n:literal, $podf:literal) => {
        paste! {
            static [<USDHC $n _SEL>]: ClockSource = ClockSource::Mux {
                sel: Field::bit(CSCMR1, 16 + $n - 1),
                inputs: &[Some(&PLL2_PFD2), Some(&PLL2_PFD0)],
            };
            static [<USDHC $n>]: ClockSource = ClockSource::Div {
                parent: &[<USDHC $n _SEL>],
                div: Field::new(CSCDR1, $podf, 3),
            };
        }
    };
}

usdhc!(1, 11);
usdhc!(2, 16);
usdhc!(3, 19);
usdhc!(4, 22);

// LDB_DI0 at CS2CDR[11:9], LDB_DI1 at [14:12]
static LDB_DI_SEL: ClockSource = ClockSource::Mux {
    sel: Field::new(CS2CDR, 9, 3).banked(3),
    inputs: &[
        Some(&PLL5),
        Some(&PLL2_PFD0),
        Some(&PLL2_PFD2),
        Some(&MMDC_CH1),
        Some(&PLL3_SW),
        None,
        None,
        None,
    ],
};
static LDB_DI_IPU: ClockSource = ClockSource::LdbIpu {
    parent: &LDB_DI_SEL,
    full: Field::bit(CSCMR2, 10).banked(1),
};
static LDB_DI0_IPU: ClockSource = ClockSource::Bind {
    channel: 0,
    source: &LDB_DI_IPU,
};
static LDB_DI1_IPU: ClockSource = ClockSource::Bind {
    channel: 1,
    source: &LDB_DI_IPU,
};

/// Moves LDB_DI_SEL off a running PLL through MMDC_CH1, working around the
/// missing gate in front of the LDB dividers
static LDB_GLITCH_FREE: GlitchFreeMux = GlitchFreeMux {
    aux_pll_enable: Field::bit(PLL_VIDEO, 13),
    park_input_sel: Field::bit(CBCMR, 20),
    handshake_mask: Field::bit(CCDR, 16),
    park_sel: Field::bit(CBCDR, 26),
    handshake_busy: Field::new(CDHIPR, 0, 32),
    bypass: Field::bit(CCSR, 0),
};

/// IPU HSP and DI clocks.
///
/// DI0 and DI1 share one register, DI1 sits 9 bits above DI0.
macro_rules! ipu {
    ($ipu:ident, $hsp_sel:literal, $hsp_podf:literal, $di_reg:ident) => {
        paste! {
            static [<$ipu _HSP_SEL>]: ClockSource = ClockSource::Mux {
                sel: Field::new(CSCDR3, $hsp_sel, 2),
                inputs: &[Some(&MMDC_CH0), Some(&PLL2_PFD2), Some(&PLL3_120M), Some(&PLL3_PFD1)],
            };
            static [<$ipu _HSP>]: ClockSource = ClockSource::Div {
                parent: &[<$ipu _HSP_SEL>],
                div: Field::new(CSCDR3, $hsp_podf, 3),
            };
            static [<$ipu _DI_PRE_SEL>]: ClockSource = ClockSource::Mux {
                sel: Field::new($di_reg, 6, 3).banked(9),
                inputs: &[
                    Some(&MMDC_CH0),
                    Some(&PLL3_SW),
                    Some(&PLL5),
                    Some(&PLL2_PFD0),
                    Some(&PLL2_PFD2),
                    Some(&PLL3_PFD1),
                    None,
                    None,
                ],
            };
            static [<$ipu _DI_PRE>]: ClockSource = ClockSource::Div {
                parent: &[<$ipu _DI_PRE_SEL>],
                div: Field::new($di_reg, 3, 3).banked(9),
            };
            static [<$ipu _DI>]: ClockSource = ClockSource::Mux {
                sel: Field::new($di_reg, 0, 3).banked(9),
                inputs: &[
                    Some(&[<$ipu _DI_PRE>]),
                    None,
                    None,
                    Some(&LDB_DI0_IPU),
                    Some(&LDB_DI1_IPU),
                    None,
                    None,
                    None,
                ],
            };
            static [<$ipu _DI_TUNING>]: Tuning = Tuning {
                route: Some((Field::new($di_reg, 0, 3).banked(9), 0)),
                pre_mux: Field::new($di_reg, 6, 3).banked(9),
                pfd: Some((
                    PfdRef {
                        pll: PllId::Pll3,
                        index: 1,
                    },
                    5,
                )),
                fallback: Some((PllId::Pll5, 2)),
                pre_div: Field::new($di_reg, 3, 3).banked(9),
                post_div: None,
            };
        }
    };
}

ipu!(IPU1, 9, 11, CHSCCDR);
ipu!(IPU2, 14, 16, CSCDR2);

/// LCDIF pixel clock: pre-mux, pre-divider, post-divider and an outer
/// selector that picks the divider chain or one of the display bridges.
macro_rules! lcdif {
    ($n:literal, sel: $sel:literal, pred: $pred:literal, pre_sel: $pre_sel:literal,
     podf: ($podf_reg:ident, $podf:literal), alt: $alt:ident, pfd: ($pfd:literal, $pfd_sel:literal)) => {
        paste! {
            static [<LCDIF $n _PRE_SEL>]: ClockSource = ClockSource::Mux {
                sel: Field::new(CSCDR2, $pre_sel, 3),
                inputs: &[
                    Some(&PLL2),
                    Some(&PLL3_PFD3),
                    Some(&PLL5),
                    Some(&PLL2_PFD0),
                    Some(&$alt),
                    Some(&PLL3_PFD1),
                    None,
                    None,
                ],
            };
            static [<LCDIF $n _PRED>]: ClockSource = ClockSource::Div {
                parent: &[<LCDIF $n _PRE_SEL>],
                div: Field::new(CSCDR2, $pred, 3),
            };
            static [<LCDIF $n _PODF>]: ClockSource = ClockSource::Div {
                parent: &[<LCDIF $n _PRED>],
                div: Field::new($podf_reg, $podf, 3),
            };
            static [<LCDIF $n>]: ClockSource = ClockSource::Mux {
                sel: Field::new(CSCDR2, $sel, 3),
                inputs: &[Some(&[<LCDIF $n _PODF>]), None, None, None, None, None, None, None],
            };
            static [<LCDIF $n _TUNING>]: Tuning = Tuning {
                route: Some((Field::new(CSCDR2, $sel, 3), 0)),
                pre_mux: Field::new(CSCDR2, $pre_sel, 3),
                pfd: Some((
                    PfdRef {
                        pll: PllId::Pll3,
                        index: $pfd,
                    },
                    $pfd_sel,
                )),
                fallback: Some((PllId::Pll5, 2)),
                pre_div: Field::new(CSCDR2, $pred, 3),
                post_div: Some(Field::new($podf_reg, $podf, 3)),
            };
        }
    };
}

lcdif!(1, sel: 9, pred: 12, pre_sel: 15, podf: (CBCMR, 23), alt: PLL2_PFD1, pfd: (3, 1));
lcdif!(2, sel: 0, pred: 3, pre_sel: 6, podf: (CSCMR1, 20), alt: PLL3_PFD0, pfd: (0, 4));

//
// Consumers
//

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

const fn direct(mux: &'static ClockSource) -> Option<MuxSwitch> {
    Some(MuxSwitch { mux, glitch_free: None })
}

const fn usdhc(n: u8, name: &'static str, source: &'static ClockSource, sel: &'static ClockSource) -> ConsumerDesc {
    ConsumerDesc {
        consumer: Consumer::Esdhc(n),
        name,
        channels: 1,
        source,
        tuning: None,
        switch: direct(sel),
    }
}

const fn ipu_di(ipu: Ipu, name: &'static str, source: &'static ClockSource, tuning: &'static Tuning) -> ConsumerDesc {
    ConsumerDesc {
        consumer: Consumer::IpuDi(ipu),
        name,
        channels: 2,
        source,
        tuning: Some(tuning),
        switch: direct(source),
    }
}

const fn lcdif(n: u8, name: &'static str, source: &'static ClockSource, tuning: &'static Tuning) -> ConsumerDesc {
    ConsumerDesc {
        consumer: Consumer::Lcdif(n),
        name,
        channels: 1,
        source,
        tuning: Some(tuning),
        switch: direct(source),
    }
}

const fn ldb(source: &'static ClockSource, mux: &'static ClockSource, glitch_free: &'static GlitchFreeMux) -> ConsumerDesc {
    ConsumerDesc {
        consumer: Consumer::Ldb,
        name: "ldb_di",
        channels: 2,
        source,
        tuning: None,
        switch: Some(MuxSwitch {
            mux,
            glitch_free: Some(glitch_free),
        }),
    }
}

static MX6Q_CONSUMERS: [ConsumerDesc; 15] = [
    plain(Consumer::Cpu, "arm", &CPU),
    plain(Consumer::MmdcCh0, "mmdc_ch0", &MMDC_CH0),
    plain(Consumer::MmdcCh1, "mmdc_ch1", &MMDC_CH1),
    plain(Consumer::Ahb, "ahb", &AHB),
    plain(Consumer::Ipg, "ipg", &IPG),
    plain(Consumer::Uart, "uart", &UART),
    usdhc(1, "usdhc1", &USDHC1, &USDHC1_SEL),
    usdhc(2, "usdhc2", &USDHC2, &USDHC2_SEL),
    usdhc(3, "usdhc3", &USDHC3, &USDHC3_SEL),
    usdhc(4, "usdhc4", &USDHC4, &USDHC4_SEL),
    plain(Consumer::IpuHsp(Ipu::Ipu1), "ipu1_hsp", &IPU1_HSP),
    plain(Consumer::IpuHsp(Ipu::Ipu2), "ipu2_hsp", &IPU2_HSP),
    ipu_di(Ipu::Ipu1, "ipu1_di", &IPU1_DI, &IPU1_DI_TUNING),
    ipu_di(Ipu::Ipu2, "ipu2_di", &IPU2_DI, &IPU2_DI_TUNING),
    ldb(&LDB_DI_IPU, &LDB_DI_SEL, &LDB_GLITCH_FREE),
];

static MX6DL_CONSUMERS: [ConsumerDesc; 13] = [
    plain(Consumer::Cpu, "arm", &CPU),
    plain(Consumer::MmdcCh0, "mmdc_ch0", &MMDC_CH0),
    plain(Consumer::MmdcCh1, "mmdc_ch1", &MMDC_CH1),
    plain(Consumer::Ahb, "ahb", &AHB),
    plain(Consumer::Ipg, "ipg", &IPG),
    plain(Consumer::Uart, "uart", &UART),
    usdhc(1, "usdhc1", &USDHC1, &USDHC1_SEL),
    usdhc(2, "usdhc2", &USDHC2, &USDHC2_SEL),
    usdhc(3, "usdhc3", &USDHC3, &USDHC3_SEL),
    usdhc(4, "usdhc4", &USDHC4, &USDHC4_SEL),
    plain(Consumer::IpuHsp(Ipu::Ipu1), "ipu1_hsp", &IPU1_HSP),
    ipu_di(Ipu::Ipu1, "ipu1_di", &IPU1_DI, &IPU1_DI_TUNING),
    ldb(&LDB_DI_IPU, &LDB_DI_SEL, &LDB_GLITCH_FREE),
];

static MX6SX_CONSUMERS: [ConsumerDesc; 11] = [
    plain(Consumer::Cpu, "arm", &CPU),
    plain(Consumer::MmdcCh1, "mmdc", &MMDC_CH1),
    plain(Consumer::Ahb, "ahb", &AHB),
    plain(Consumer::Ipg, "ipg", &IPG),
    plain(Consumer::Uart, "uart", &UART_MUXED),
    usdhc(1, "usdhc1", &USDHC1, &USDHC1_SEL),
    usdhc(2, "usdhc2", &USDHC2, &USDHC2_SEL),
    usdhc(3, "usdhc3", &USDHC3, &USDHC3_SEL),
    usdhc(4, "usdhc4", &USDHC4, &USDHC4_SEL),
    lcdif(1, "lcdif1", &LCDIF1, &LCDIF1_TUNING),
    lcdif(2, "lcdif2", &LCDIF2, &LCDIF2_TUNING),
];

static MX6UL_CONSUMERS: [ConsumerDesc; 8] = [
    plain(Consumer::Cpu, "arm", &CPU),
    plain(Consumer::MmdcCh1, "mmdc", &MMDC_CH1),
    plain(Consumer::Ahb, "ahb", &AHB),
    plain(Consumer::Ipg, "ipg", &IPG),
    plain(Consumer::Uart, "uart", &UART_MUXED),
    usdhc(1, "usdhc1", &USDHC1, &USDHC1_SEL),
    usdhc(2, "usdhc2", &USDHC2, &USDHC2_SEL),
    lcdif(1, "lcdif", &LCDIF1, &LCDIF1_TUNING),
];

/// i.MX6 Quad / Dual
pub static MX6Q: ChipDesc = ChipDesc {
    variant: ChipVariant::Mx6Quad,
    name: "i.MX6Q",
    ccm_base: CCM_BASE,
    analog_base: ANATOP_BASE,
    plls: &PLLS_PFD3,
    consumers: &MX6Q_CONSUMERS,
};

/// i.MX6 DualLite / Solo
pub static MX6DL: ChipDesc = ChipDesc {
    variant: ChipVariant::Mx6DualLite,
    name: "i.MX6DL",
    ccm_base: CCM_BASE,
    analog_base: ANATOP_BASE,
    plls: &PLLS_PFD3,
    consumers: &MX6DL_CONSUMERS,
};

/// i.MX6 SoloX
pub static MX6SX: ChipDesc = ChipDesc {
    variant: ChipVariant::Mx6SoloX,
    name: "i.MX6SX",
    ccm_base: CCM_BASE,
    analog_base: ANATOP_BASE,
    plls: &PLLS_PFD4,
    consumers: &MX6SX_CONSUMERS,
};

/// i.MX6 UltraLite
pub static MX6UL: ChipDesc = ChipDesc {
    variant: ChipVariant::Mx6UltraLite,
    name: "i.MX6UL",
    ccm_base: CCM_BASE,
    analog_base: ANATOP_BASE,
    plls: &PLLS_PFD4,
    consumers: &MX6UL_CONSUMERS,
};
