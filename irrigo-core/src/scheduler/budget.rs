//! Per-cycle time budget

/// How to idle after a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdlePlan {
    /// Time to idle before the next cycle (ms)
    pub idle_ms: u32,
    /// The cycle used up its whole period
    pub overrun: bool,
}

/// Time accounting for one cycle
///
/// Blocking calls charge what they report. At the end of the cycle the
/// larger of the charged total and the clock-measured elapsed time is taken
/// as spent, so a clock that does not advance (tests, simulated drivers)
/// still yields a deterministic idle time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleBudget {
    period_ms: u32,
    charged_ms: u32,
}

impl CycleBudget {
    /// Start a budget for a cycle of `period_ms`
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            charged_ms: 0,
        }
    }

    /// Target period (ms)
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Time reported by blocking calls so far (ms)
    pub fn charged_ms(&self) -> u32 {
        self.charged_ms
    }

    /// Record time consumed by a blocking call
    pub fn charge(&mut self, ms: u32) {
        self.charged_ms = self.charged_ms.saturating_add(ms);
    }

    /// Close the cycle
    ///
    /// Idles for what is left of the period, or for `yield_ms` if nothing
    /// is left.
    pub fn settle(&self, elapsed_ms: u64, yield_ms: u32) -> IdlePlan {
        let spent = elapsed_ms.max(self.charged_ms as u64);
        let period = self.period_ms as u64;

        if spent < period {
            IdlePlan {
                idle_ms: (period - spent) as u32,
                overrun: false,
            }
        } else {
            IdlePlan {
                idle_ms: yield_ms,
                overrun: true,
            }
        }
    }
}
