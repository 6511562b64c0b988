use rand::Rng;
use std::time::Duration;

/// `base * (1 + f)` with `f` drawn uniformly from `±fraction`, re-drawn on
/// every call so consecutive sleeps never repeat a pattern.
pub fn jitter_multiplicative(base: Duration, fraction: f64) -> Duration {
    if fraction <= 0.0 {
        return base;
    }
    let factor = 1.0 + rand::thread_rng().gen_range(-fraction..=fraction);
    Duration::from_secs_f64(base.as_secs_f64() * factor)
}

/// `base + d` with `d` drawn uniformly from `±spread`, floored at zero.
pub fn jitter_additive(base: Duration, spread: Duration) -> Duration {
    if spread.is_zero() {
        return base;
    }
    let spread_secs = spread.as_secs_f64();
    let offset = rand::thread_rng().gen_range(-spread_secs..=spread_secs);
    Duration::from_secs_f64((base.as_secs_f64() + offset).max(0.0))
}
