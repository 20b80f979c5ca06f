use std::time::Duration;

/// Cadence of the synthetic progress ticker while a generation request is
/// outstanding.
pub const TICK_INTERVAL: Duration = Duration::from_millis(800);

/// Upper bound of synthetic progress. The counter stalls here until the
/// outstanding operation resolves; only resolution moves the UI past it.
pub const STALL_AT: u8 = 95;

/// One deterministic advancement step. Fast early, slower as the counter
/// grows, stalled at [`STALL_AT`]. Carries no relation to actual backend
/// completion.
pub fn advance(counter: u8) -> u8 {
    if counter >= STALL_AT {
        return counter;
    }
    let step = if counter < 50 {
        5
    } else if counter < 80 {
        2
    } else {
        1
    };
    (counter + step).min(STALL_AT)
}

#[cfg(test)]
#[path = "tests/progress_tests.rs"]
mod tests;
