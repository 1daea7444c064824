//! Clock Graph Nodes
//!
//! Each chip describes its clock tree as a graph of `static` [`ClockSource`]
//! nodes. A consumer frequency is computed by walking from the consumer's node
//! back to a PLL (or the oscillator), reading exactly the selector and divider
//! fields on that path.
//!
//! ```text
//!   pll2 ──┐
//!   pfd2 ──┤ ┌─────┐   ┌──────┐
//!   pfd0 ──┼▶│ Mux │──▶│ Div  │──▶ consumer
//!  ...  ───┘ └─────┘   └──────┘
//!              ▲           ▲
//!            sel[n:m]   podf[k:l]
//! ```

use super::pll::{PfdRef, PllId};
use super::ClockTree;
use crate::regs::{Field, RegisterFile};

/// One node of a chip's clock graph
#[derive(Debug)]
pub enum ClockSource {
    /// A fixed-frequency input, in Hz
    Fixed(u32),
    /// The reference oscillator of [`ClockConfig`](super::ClockConfig)
    Osc,
    /// The main output of a PLL
    Pll(PllId),
    /// A PFD output of a PLL
    Pfd(PllId, u8),
    /// A multiplexer. `None` inputs are reserved encodings and run at 0Hz.
    Mux {
        /// Selector bits
        sel: Field,
        /// Input for each selector value
        inputs: &'static [Option<&'static ClockSource>],
    },
    /// Integer divider, the field holds `divisor - 1`
    Div {
        /// Divided clock
        parent: &'static ClockSource,
        /// Divider bits
        div: Field,
    },
    /// Fixed ratio, `parent * mul / div`
    Scale {
        /// Scaled clock
        parent: &'static ClockSource,
        /// Multiplier
        mul: u32,
        /// Divisor
        div: u32,
    },
    /// LVDS bridge to IPU divider.
    ///
    /// The LDB serialises seven bits per pixel clock. With `full` clear the
    /// clock is doubled and then divided by 7 (a net 2/7), with it set the
    /// divider is a plain 7.
    LdbIpu {
        /// LDB serial clock
        parent: &'static ClockSource,
        /// Full-rate bit
        full: Field,
    },
    /// Evaluate `source` as a fixed channel, whatever the caller's channel
    Bind {
        /// Channel banked fields below resolve to
        channel: u8,
        /// Bound node
        source: &'static ClockSource,
    },
}

impl ClockSource {
    /// Selector and inputs if this node is a multiplexer
    pub fn as_mux(&self) -> Option<(Field, &'static [Option<&'static ClockSource>])> {
        match *self {
            ClockSource::Mux { sel, inputs } => Some((sel, inputs)),
            _ => None,
        }
    }

    /// Can `pfd` feed this node under any selector setting?
    pub fn can_reach_pfd(&self, pfd: PfdRef) -> bool {
        match *self {
            ClockSource::Pfd(pll, index) => pll == pfd.pll && index == pfd.index,
            ClockSource::Mux { inputs, .. } => inputs.iter().flatten().any(|input| input.can_reach_pfd(pfd)),
            ClockSource::Div { parent, .. } | ClockSource::Scale { parent, .. } | ClockSource::LdbIpu { parent, .. } => {
                parent.can_reach_pfd(pfd)
            }
            ClockSource::Bind { source, .. } => source.can_reach_pfd(pfd),
            ClockSource::Fixed(_) | ClockSource::Osc | ClockSource::Pll(_) => false,
        }
    }
}

impl<R: RegisterFile, D> ClockTree<'_, R, D> {
    /// Frequency of `source` on `channel`, in Hz.
    ///
    /// Evaluation stops at the first node that runs at 0Hz, so no register
    /// beyond a disabled or reserved branch is read.
    pub(crate) fn source_frequency(&self, source: &ClockSource, channel: u8) -> u32 {
        match *source {
            ClockSource::Fixed(hz) => hz,
            ClockSource::Osc => self.config.osc_hz,
            ClockSource::Pll(pll) => self.pll_frequency(pll),
            ClockSource::Pfd(pll, index) => self.pfd_frequency(pll, index),
            ClockSource::Mux { sel, inputs } => {
                let selected = self.read_field(sel.channel(channel));
                match inputs.get(selected as usize) {
                    Some(Some(input)) => self.source_frequency(input, channel),
                    _ => {
                        trace!("reserved selector {}", selected);
                        0
                    }
                }
            }
            ClockSource::Div { parent, div } => match self.source_frequency(parent, channel) {
                0 => 0,
                hz => hz / (self.read_field(div.channel(channel)) + 1),
            },
            ClockSource::Scale { parent, mul, div } => {
                let hz = u64::from(self.source_frequency(parent, channel));
                (hz * u64::from(mul) / u64::from(div)) as u32
            }
            ClockSource::LdbIpu { parent, full } => match self.source_frequency(parent, channel) {
                0 => 0,
                // Double first: dividing by 7 first would lose precision
                hz if self.read_field(full.channel(channel)) == 0 => (u64::from(hz) * 2 / 7) as u32,
                hz => hz / 7,
            },
            ClockSource::Bind { channel, source } => self.source_frequency(source, channel),
        }
    }
}
