//! Clock dump
//!
//! Prints the whole tree of the active chip, read straight from the
//! registers.

use core::fmt;

use super::ClockTree;
use crate::regs::RegisterFile;

impl<R: RegisterFile, D> ClockTree<'_, R, D> {
    /// Write every PLL, PFD output and consumer channel of the chip, in kHz
    pub fn show_clocks(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let chip = self.config.chip;
        writeln!(out, "{} (osc {} kHz)", chip.name, self.config.osc_hz / 1000)?;

        for pll in chip.plls {
            writeln!(out, "{:<16}{:>10} kHz", pll.name, self.pll_frequency(pll.id) / 1000)?;
            if let Some(bank) = pll.pfd {
                // pll2_bus PFD1 prints as pll2_pfd1
                let prefix = pll.name.split('_').next().unwrap_or(pll.name);
                for index in bank.first..bank.first + bank.count {
                    writeln!(
                        out,
                        "  {}_pfd{:<width$}{:>10} kHz",
                        prefix,
                        index,
                        self.pfd_frequency(pll.id, index) / 1000,
                        width = 10usize.saturating_sub(prefix.len()),
                    )?;
                }
            }
        }

        for desc in chip.consumers {
            for channel in 0..desc.channels {
                let khz = self.get_consumer_clock_khz(desc.consumer, channel);
                if desc.channels > 1 {
                    let width = 15usize.saturating_sub(desc.name.len());
                    writeln!(out, "{}.{:<width$}{:>10} kHz", desc.name, channel, khz)?;
                } else {
                    writeln!(out, "{:<16}{:>10} kHz", desc.name, khz)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::string::String;

    use super::*;
    use crate::clocks::chips::mx6;
    use crate::clocks::config::ClockConfig;
    use crate::mock::{MockDelay, MockRegisters};

    static MX6Q: ClockConfig = ClockConfig::new(&mx6::MX6Q);

    #[test]
    fn dump_lists_everything() {
        let regs = mx6::tests::running_plls(&mx6::MX6Q);
        let t = ClockTree::new(&MX6Q, regs, MockDelay::default());
        let mut out = String::new();
        t.show_clocks(&mut out).unwrap();

        assert!(out.starts_with("i.MX6Q (osc 24000 kHz)\n"));
        assert!(out.contains("pll1_sys            792000 kHz\n"));
        assert!(out.contains("ldb_di.1"));
        assert!(out.contains("ipu2_hsp"));
        // No fourth PFD on PLL2 of the Quad
        assert!(!out.contains("pll2_pfd3"));
        assert!(out.contains("  pll3_pfd3         454736 kHz\n"));
        assert!(out.contains("ipu1_di.1           528000 kHz\n"));
    }

    #[test]
    fn dump_reads_only() {
        let t = ClockTree::new(&MX6Q, MockRegisters::new(), MockDelay::default());
        let mut out = String::new();
        t.show_clocks(&mut out).unwrap();
        assert_eq!(t.registers().write_count(), 0);
    }
}
