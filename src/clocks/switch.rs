//! Mux source switching
//!
//! Most selectors can simply be rewritten. The i.MX6 LDB_DI selectors cannot:
//! they sit behind a two-stage multiplexer with no gate, so a live change can
//! glitch both the LDB and anything sharing its parent PLL. Those are moved
//! with the sequence below, with the parent PLL off and the divider bypassed.
//!
//! ```text
//!   Stable(old) ─▶ Disabling ─▶ BottomMuxSelected ─▶ NewSourceSelected ─▶ TopMuxRestored ─▶ Stable(new)
//!    aux pll off    park mmdc_ch1    sel = 0b111          sel = 0b1xx            sel = new
//!                   wait handshake   (bypass on)          (low bits = new)       bypass off, unpark,
//!                                                                                wait, aux pll on
//! ```

use embedded_hal_1::delay::DelayNs;

use super::chips::GlitchFreeMux;
use super::{ClockError, ClockTree, Consumer};
use crate::regs::{Field, RegisterFile};

const MAX_STEPS: usize = 15;

/// One step of a [`MuxSwitchPlan`]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchStep {
    /// Read-modify-write `field` to `value`
    Write {
        /// Target bits
        field: Field,
        /// New value
        value: u32,
    },
    /// Poll until `busy` reads back zero
    WaitIdle {
        /// Handshake status bits
        busy: Field,
    },
}

/// Parking path settings in effect before a glitch-free switch
#[derive(Clone, Copy, Debug)]
struct Parked {
    input_sel: u32,
    sel: u32,
}

/// Ordered register writes and handshake waits that move one selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MuxSwitchPlan {
    steps: [SwitchStep; MAX_STEPS],
    len: usize,
}

impl MuxSwitchPlan {
    fn new(filler: Field) -> Self {
        Self {
            steps: [SwitchStep::WaitIdle { busy: filler }; MAX_STEPS],
            len: 0,
        }
    }

    fn push(&mut self, step: SwitchStep) {
        if let Some(slot) = self.steps.get_mut(self.len) {
            *slot = step;
            self.len += 1;
        }
    }

    fn write(&mut self, field: Field, value: u32) {
        self.push(SwitchStep::Write { field, value });
    }

    /// A no-op: the selector already holds the requested value
    fn empty(sel: Field) -> Self {
        Self::new(sel)
    }

    /// A single selector write
    fn direct(sel: Field, new: u32) -> Self {
        let mut plan = Self::new(sel);
        plan.write(sel, new);
        plan
    }

    /// The LDB hand-off. `parked` holds the values `park_input_sel` and
    /// `park_sel` had before the switch, both are restored afterwards.
    fn glitch_free(gf: &GlitchFreeMux, sel: Field, new: u32, parked: Parked) -> Self {
        let top = 1 << (sel.width - 1);
        let low = top - 1;

        let mut plan = Self::new(sel);
        plan.write(gf.aux_pll_enable, 0);
        // Keep MMDC_CH1 alive on pll3_sw_clk while its usual parent changes
        plan.write(gf.park_input_sel, 0);
        plan.write(gf.handshake_mask, 1);
        plan.write(gf.park_sel, 1);
        plan.push(SwitchStep::WaitIdle { busy: gf.handshake_busy });
        plan.write(gf.bypass, 1);
        // Bottom mux first, then the top one
        plan.write(sel, sel.max());
        plan.write(sel, top | (new & low));
        plan.write(sel, new);
        plan.write(gf.bypass, 0);
        plan.write(gf.park_sel, parked.sel);
        plan.push(SwitchStep::WaitIdle { busy: gf.handshake_busy });
        plan.write(gf.park_input_sel, parked.input_sel);
        plan.write(gf.handshake_mask, 0);
        // TODO: only re-enable the aux PLL if it was running before the switch
        plan.write(gf.aux_pll_enable, 1);
        plan
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[SwitchStep] {
        &self.steps[..self.len]
    }

    /// Does executing the plan touch any register?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<R: RegisterFile, D> ClockTree<'_, R, D> {
    /// Build the plan that moves the selector of `consumer` on `channel` to
    /// `new_source`, without executing it.
    ///
    /// The plan is empty when the selector already holds `new_source`.
    pub fn plan_mux_switch(&self, consumer: Consumer, channel: u8, new_source: u8) -> Result<MuxSwitchPlan, ClockError> {
        let desc = self.consumer_desc(consumer, channel)?;
        let switch = desc
            .switch
            .as_ref()
            .ok_or(ClockError::UnsupportedVariant { consumer, channel })?;
        let (sel, inputs) = switch.mux.as_mux().ok_or(ClockError::prog_err("switch without a mux"))?;
        let sel = sel.channel(channel);

        if !matches!(inputs.get(usize::from(new_source)), Some(Some(_))) {
            error!("{}: selector {} is reserved", desc.name, new_source);
            return Err(ClockError::ReservedSelector { selector: new_source });
        }

        let new = u32::from(new_source);
        if self.read_field(sel) == new {
            return Ok(MuxSwitchPlan::empty(sel));
        }
        Ok(match switch.glitch_free {
            Some(gf) => {
                let parked = Parked {
                    input_sel: self.read_field(gf.park_input_sel),
                    sel: self.read_field(gf.park_sel),
                };
                MuxSwitchPlan::glitch_free(gf, sel, new, parked)
            }
            None => MuxSwitchPlan::direct(sel, new),
        })
    }
}

impl<R: RegisterFile, D: DelayNs> ClockTree<'_, R, D> {
    /// Move the selector of `consumer` on `channel` to `new_source`.
    ///
    /// Switching to the current source writes nothing. A
    /// [`ClockError::SwitchTimeout`] leaves the clock domain half-switched:
    /// treat it as fatal for every consumer below that selector.
    pub fn switch_mux_source(&mut self, consumer: Consumer, channel: u8, new_source: u8) -> Result<(), ClockError> {
        let plan = self.plan_mux_switch(consumer, channel, new_source)?;
        if plan.is_empty() {
            debug!("{:?}/{} already on source {}", consumer, channel, new_source);
            return Ok(());
        }
        self.execute_plan(&plan)?;
        info!("{:?}/{} switched to source {}", consumer, channel, new_source);
        Ok(())
    }

    /// Run `plan` step by step, stopping at the first handshake that does
    /// not complete
    pub fn execute_plan(&mut self, plan: &MuxSwitchPlan) -> Result<(), ClockError> {
        let bound = self.config.timeouts.switch_us;
        for step in plan.steps() {
            match *step {
                SwitchStep::Write { field, value } => self.modify_field(field, value),
                SwitchStep::WaitIdle { busy } => {
                    if !self.poll_until(bound, |tree| tree.read_field(busy) == 0) {
                        error!("clock switch handshake still busy after {} us", bound);
                        return Err(ClockError::SwitchTimeout);
                    }
                }
            }
        }
        Ok(())
    }
}
