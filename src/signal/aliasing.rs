//! Nyquist classifier — does the chosen rate resolve the signal?

use serde::{Deserialize, Serialize};

/// Sampling adequacy of a rate against a signal frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AliasingStatus {
    Ok,
    Aliasing,
}

/// Classify a sampling rate against a signal frequency.
///
/// The violation predicate is `fs < 2f`; the boundary `fs == 2f` counts
/// as `Ok`, matching the game's observed behavior rather than the strict
/// reconstruction criterion.
///
/// This only supplies the explanatory status. The samples themselves are
/// left alone: connecting under-sampled points in order already shows the
/// true aliased appearance, no fake alias path is synthesized.
pub fn classify(frequency: f64, rate: f64) -> AliasingStatus {
    if rate < 2.0 * frequency {
        AliasingStatus::Aliasing
    } else {
        AliasingStatus::Ok
    }
}
