#![forbid(unsafe_code)]

//! Magnitude-adaptive per-channel tolerance comparison.
//!
//! Tolerances are given as magnitudes (powers of ten) rather than raw
//! values: the relative tolerance is `10^-R`, and the absolute
//! tolerance floor is derived per channel from the channel's own
//! dynamic range, so a channel spanning 1e6 is not held to a tolerance
//! appropriate for values near 1. The defaults come from the solver's
//! own regression suite and must stay fixed for compatibility.

use serde::{Deserialize, Serialize};

/// Default relative tolerance magnitude (`rtol = 10^-2`).
pub const RTOL_MAGNITUDE: f64 = 2.0;
/// Default absolute tolerance magnitude (floor two orders of magnitude
/// below the channel's peak spread).
pub const ATOL_MAGNITUDE: f64 = 1.9;
/// Additive guard against `log10(0)` when a channel is constant.
pub const NUMEPS: f64 = 1e-12;
/// Hard lower bound on the derived absolute tolerance.
pub const ATOL_MIN: f64 = 1e-6;

/// Per-channel pass/fail over two `[channel][time]` matrices.
///
/// A channel passes iff every sample of `test` is finite and within
/// `atol + rtol * |baseline|` of `baseline`, where `atol` adapts to
/// the baseline channel's bias-removed dynamic range:
///
/// 1. `offset = baseline - min(baseline)` (constant bias removed so
///    near-zero magnitude estimation is scale-correct);
/// 2. `atol = max(10^(max(floor(log10(offset + NUMEPS))) - A), ATOL_MIN)`;
/// 3. `rtol = 10^-R`.
///
/// A total-element-count mismatch marks every channel failing; shape
/// disagreement is a hard disagreement, never silently broadcast.
#[must_use]
pub fn passing_channels(
    test: &[Vec<f64>],
    baseline: &[Vec<f64>],
    rtol_magnitude: f64,
    atol_magnitude: f64,
) -> Vec<bool> {
    let test_size: usize = test.iter().map(Vec::len).sum();
    let baseline_size: usize = baseline.iter().map(Vec::len).sum();
    if test_size != baseline_size || test.len() != baseline.len() {
        return vec![false; test.len()];
    }

    let rtol = 10f64.powf(-rtol_magnitude);
    test.iter()
        .zip(baseline)
        .map(|(test_ch, base_ch)| {
            let atol = channel_atol(base_ch, atol_magnitude);
            test_ch.len() == base_ch.len()
                && test_ch.iter().zip(base_ch).all(|(&t, &b)| {
                    t.is_finite() && (t - b).abs() <= atol + rtol * b.abs()
                })
        })
        .collect()
}

/// Absolute tolerance adapted to one baseline channel's spread.
fn channel_atol(baseline: &[f64], atol_magnitude: f64) -> f64 {
    let base_min = baseline.iter().copied().fold(f64::INFINITY, f64::min);
    let magnitude_max = baseline
        .iter()
        .map(|&b| ((b - base_min) + NUMEPS).log10().floor())
        .fold(f64::NEG_INFINITY, f64::max);
    10f64.powf(magnitude_max - atol_magnitude).max(ATOL_MIN)
}

/// One channel's verdict, paired with its name for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelVerdict {
    pub name: String,
    pub passing: bool,
}

/// The outcome of one comparison run. Ephemeral: built, reported,
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonVerdict {
    pub channels: Vec<ChannelVerdict>,
}

impl ComparisonVerdict {
    /// Pair per-channel flags with channel names. Extra names beyond
    /// the flag count are ignored; extra flags get a positional name.
    #[must_use]
    pub fn new(names: &[String], flags: &[bool]) -> Self {
        let channels = flags
            .iter()
            .enumerate()
            .map(|(i, &passing)| ChannelVerdict {
                name: names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("channel{i}")),
                passing,
            })
            .collect();
        Self { channels }
    }

    /// PASS iff every channel's flag is true.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.channels.iter().all(|c| c.passing)
    }

    /// Names of failing channels, in channel order.
    #[must_use]
    pub fn failing(&self) -> Vec<&str> {
        self.channels
            .iter()
            .filter(|c| !c.passing)
            .map(|c| c.name.as_str())
            .collect()
    }
}
