//! Win-rate calculation engine
//!
//! Pure functions only: the same inputs always produce the same
//! [`Calculation`], and nothing here performs I/O.

use thiserror::Error;

/// Length of the textual progress indicator, in cells
pub const PROGRESS_BAR_LENGTH: usize = 10;

/// Absorbs binary floating point noise when rounding win counts
const ROUNDING_EPSILON: f64 = 1e-9;

/// Largest match total whose every integer below is exact in an `f64` (2^53)
const MAX_EXACT_MATCHES: f64 = 9_007_199_254_740_992.0;

/// Reasons a calculation cannot be performed.
///
/// The `Display` text is shown to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Win rate must be between 0 and 100%")]
    RateOutOfRange,
    #[error("Number of matches must be greater than 0")]
    NonPositiveMatches,
    #[error("A 100% win rate is unreachable (it requires zero losses)")]
    PerfectRateUnreachable,
    #[error("Desired win rate must be higher than the current one")]
    NotAnImprovement,
    #[error("Too many matches to calculate; try a lower desired win rate")]
    TooManyMatches,
}

/// Outcome of a successful calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    /// Consecutive wins required, always at least 1
    pub wins_needed: u64,
    /// Wins implied by the current rate, rounded down
    pub current_wins: u64,
    pub new_total_matches: u64,
    pub new_total_wins: u64,
    /// Win rate in percent after `wins_needed` straight wins
    pub new_total_winrate: f64,
}

/// Compute how many consecutive wins move `current_rate` to at least
/// `desired_rate` over `total_matches` played matches.
///
/// Checks run in a fixed order and the first failure wins: rate range,
/// match count, the 100% ceiling, then whether the target is an improvement.
///
/// The wins are counted against the floored number of current wins, so the
/// resulting rate never falls short of `desired_rate` even when the current
/// rate does not correspond to a whole number of wins.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn compute_wins_needed(
    total_matches: i64,
    current_rate: f64,
    desired_rate: f64,
) -> Result<Calculation, CalcError> {
    if !is_percentage(current_rate) || !is_percentage(desired_rate) {
        return Err(CalcError::RateOutOfRange);
    }
    if total_matches <= 0 {
        return Err(CalcError::NonPositiveMatches);
    }
    if desired_rate >= 100.0 {
        return Err(CalcError::PerfectRateUnreachable);
    }
    if desired_rate <= current_rate {
        return Err(CalcError::NotAnImprovement);
    }

    let matches = total_matches as f64;
    let current_wins = (matches * current_rate / 100.0 + ROUNDING_EPSILON).floor();

    // (wins + x) / (matches + x) >= desired / 100, solved for x and rounded up:
    // a fractional win still has to be played in full.
    let shortfall = desired_rate * matches - 100.0 * current_wins;
    let wins_needed = (shortfall / (100.0 - desired_rate) - ROUNDING_EPSILON)
        .ceil()
        .max(1.0);

    let new_total_matches = matches + wins_needed;
    let new_total_wins = current_wins + wins_needed;
    if new_total_matches > MAX_EXACT_MATCHES {
        return Err(CalcError::TooManyMatches);
    }

    Ok(Calculation {
        wins_needed: wins_needed as u64,
        current_wins: current_wins as u64,
        new_total_matches: new_total_matches as u64,
        new_total_wins: new_total_wins as u64,
        new_total_winrate: 100.0 * new_total_wins / new_total_matches,
    })
}

fn is_percentage(rate: f64) -> bool {
    (0.0..=100.0).contains(&rate)
}

/// Parse a match count typed by a user
pub fn parse_matches(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

/// Parse a percentage typed by a user, accepting `,` as the decimal separator.
///
/// Range is not checked here; non-finite values are rejected.
pub fn parse_rate(input: &str) -> Option<f64> {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite())
}

/// Render `current / goal` as a bar of [`PROGRESS_BAR_LENGTH`] cells followed
/// by the percentage, capped at 100%.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(current: f64, goal: f64) -> String {
    let percentage = if goal > 0.0 {
        (current / goal * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((PROGRESS_BAR_LENGTH as f64 * percentage / 100.0) as usize)
        .min(PROGRESS_BAR_LENGTH);

    format!(
        "{}{} {percentage:.1}%",
        "🟩".repeat(filled),
        "⬜".repeat(PROGRESS_BAR_LENGTH - filled)
    )
}
