//! Delay distributions used to shape interaction pacing.
//!
//! Two models: a uniform draw for coarse pauses (between searches, between
//! scroll steps) and a per-character Gaussian for keystroke latency. The
//! keystroke model classifies each character into a latency class and draws
//! from a normal distribution via the Box–Muller transform, floored so no
//! delay is ever non-physically short.

use rand::Rng;

const KEYSTROKE_SIGMA_MS: f64 = 25.0;
const KEYSTROKE_FLOOR_MS: f64 = 20.0;

/// Draws one value uniformly from `[min, max]`. Each call is an independent
/// draw; `min == max` degenerates to that value.
#[must_use]
pub fn sample_uniform(min: f64, max: f64) -> f64 {
    rand::rng().random_range(min..=max)
}

/// Mean keystroke latency in milliseconds for `c`'s character class.
fn class_mean_ms(c: char) -> f64 {
    if c.is_whitespace() {
        60.0
    } else if c == '.' || c == '!' {
        200.0
    } else if c.is_uppercase() {
        120.0
    } else {
        90.0
    }
}

/// Samples a keystroke latency for `c` in milliseconds.
///
/// Draws a standard-normal sample from two uniform(0,1) values via
/// Box–Muller, scales it to the character class mean with a fixed sigma of
/// 25 ms, and floors the result at 20 ms.
#[must_use]
pub fn keystroke_delay_ms(c: char) -> f64 {
    let mu = class_mean_ms(c);
    let mut rng = rand::rng();
    // Shift u1 into (0, 1] so ln() stays finite.
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    (mu + KEYSTROKE_SIGMA_MS * z).max(KEYSTROKE_FLOOR_MS)
}

/// Builds the per-character delay sequence for `text`, in order.
#[must_use]
pub fn keystroke_delays(text: &str) -> Vec<f64> {
    text.chars().map(keystroke_delay_ms).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_uniform_stays_within_bounds() {
        for _ in 0..2_000 {
            let v = sample_uniform(1.5, 3.0);
            assert!((1.5..=3.0).contains(&v), "out of bounds: {v}");
        }
    }

    #[test]
    fn sample_uniform_degenerate_bounds_return_that_value() {
        for _ in 0..100 {
            let v = sample_uniform(2.5, 2.5);
            assert!((v - 2.5).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn keystroke_delay_never_below_floor() {
        for c in ['a', 'Z', ' ', '.', '!', 'й', '9', '\t'] {
            for _ in 0..2_000 {
                let d = keystroke_delay_ms(c);
                assert!(d >= 20.0, "delay below floor for {c:?}: {d}");
                assert!(d.is_finite(), "non-finite delay for {c:?}");
            }
        }
    }

    #[test]
    fn keystroke_delay_tracks_class_means() {
        // Wide tolerance: the standard error of the mean over 5000 draws is
        // well under a millisecond for sigma 25.
        let mean = |c: char| -> f64 {
            let n = 5_000;
            (0..n).map(|_| keystroke_delay_ms(c)).sum::<f64>() / f64::from(n)
        };
        assert!((50.0..70.0).contains(&mean(' ')));
        assert!((190.0..210.0).contains(&mean('.')));
        assert!((110.0..130.0).contains(&mean('A')));
        assert!((80.0..100.0).contains(&mean('x')));
    }

    #[test]
    fn keystroke_delays_cover_every_character_in_order() {
        let delays = keystroke_delays("Spa Kyiv");
        assert_eq!(delays.len(), 8);
        assert!(delays.iter().all(|d| *d >= 20.0));
    }
}
