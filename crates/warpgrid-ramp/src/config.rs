//! Serializable ramp configuration.
//!
//! `RampConfig` is meant to be embedded in a host's own config document.
//! Durations are written the same way as elsewhere in WarpGrid: `"500ms"`,
//! `"10s"`, `"2m"`, or a plain number of seconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::{RampError, RampResult};
use crate::ramp::ProbabilityRamp;
use crate::random::{RandomSource, ThreadRandom};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampConfig {
    /// Pass probability at the start of the warm-up.
    pub minimum_chance: f64,
    /// Pass probability once the warm-up is over.
    pub maximum_chance: f64,
    /// Length of the warm-up, e.g. `"30s"`.
    pub max_duration: String,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            minimum_chance: 0.0,
            maximum_chance: 1.0,
            max_duration: "60s".to_string(),
        }
    }
}

impl RampConfig {
    /// Build a ramp on the system clock and a thread-local generator.
    pub fn build(&self) -> RampResult<ProbabilityRamp> {
        self.build_with(SystemClock, ThreadRandom)
    }

    /// Build a ramp with injected sources.
    pub fn build_with<C: Clock, R: RandomSource>(
        &self,
        clock: C,
        random: R,
    ) -> RampResult<ProbabilityRamp<C, R>> {
        let max_duration = self.duration()?;
        ProbabilityRamp::with_sources(
            self.minimum_chance,
            self.maximum_chance,
            max_duration,
            clock,
            random,
        )
    }

    /// Parsed warm-up length. Zero and negative lengths are out of range.
    pub fn duration(&self) -> RampResult<Duration> {
        let ms = parse_duration_ms(&self.max_duration)
            .ok_or_else(|| RampError::InvalidDuration(self.max_duration.clone()))?;
        if ms <= 0 {
            return Err(RampError::out_of_range(
                "max_duration",
                self.max_duration.trim(),
            ));
        }
        Ok(Duration::from_millis(ms as u64))
    }
}

/// Parse a duration string like "500ms", "5s", "1m" or "-1s" into
/// signed milliseconds.
fn parse_duration_ms(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s),
    };
    // A second sign ("--5s", "--0s") is not a duration.
    if s.starts_with('-') {
        return None;
    }

    let ms = if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<i64>().ok()?
        } else {
            secs.parse::<i64>().ok()?.checked_mul(1000)?
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<i64>().ok()?.checked_mul(60_000)?
    } else {
        s.parse::<i64>().ok()?.checked_mul(1000)?
    };

    Some(sign * ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::random::SeededRandom;

    fn config(min: f64, max: f64, duration: &str) -> RampConfig {
        RampConfig {
            minimum_chance: min,
            maximum_chance: max,
            max_duration: duration.to_string(),
        }
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration_ms("500ms"), Some(500));
        assert_eq!(parse_duration_ms("10s"), Some(10_000));
        assert_eq!(parse_duration_ms("2m"), Some(120_000));
        assert_eq!(parse_duration_ms(" 3 "), Some(3_000));
    }

    #[test]
    fn parse_duration_signed() {
        assert_eq!(parse_duration_ms("-1s"), Some(-1_000));
        assert_eq!(parse_duration_ms("0s"), Some(0));
        assert_eq!(parse_duration_ms("--1s"), None);
        assert_eq!(parse_duration_ms("--0s"), None);
    }

    #[test]
    fn double_negative_zero_is_unparsable() {
        let err = config(0.1, 0.8, "--0s").build().unwrap_err();
        assert_eq!(err, RampError::InvalidDuration("--0s".to_string()));
    }

    #[test]
    fn parse_duration_garbage() {
        assert_eq!(parse_duration_ms("soon"), None);
        assert_eq!(parse_duration_ms(""), None);
        assert_eq!(parse_duration_ms("1.5s"), None);
    }

    #[test]
    fn default_ramps_fully_over_a_minute() {
        let cfg = RampConfig::default();
        assert_eq!(cfg.duration().unwrap(), Duration::from_secs(60));
        let ramp = cfg.build().unwrap();
        assert_eq!(ramp.minimum_chance(), 0.0);
        assert_eq!(ramp.maximum_chance(), 1.0);
    }

    #[test]
    fn zero_and_negative_durations_out_of_range() {
        for d in ["0s", "-1s", "0"] {
            let err = config(0.1, 0.8, d).build().unwrap_err();
            assert!(err.is_out_of_range(), "{d} gave {err:?}");
        }
    }

    #[test]
    fn unparsable_duration_rejected() {
        let err = config(0.1, 0.8, "ten seconds").build().unwrap_err();
        assert_eq!(err, RampError::InvalidDuration("ten seconds".to_string()));
    }

    #[test]
    fn chance_errors_pass_through() {
        assert!(config(1.1, 0.5, "10s").build().unwrap_err().is_out_of_range());
        assert!(matches!(
            config(0.8, 0.2, "10s").build().unwrap_err(),
            RampError::InvalidConfiguration { .. }
        ));
    }

    #[test]
    fn build_with_injected_sources() {
        let clock = ManualClock::new();
        let ramp = config(0.2, 0.6, "400ms")
            .build_with(clock.clone(), SeededRandom::new(3))
            .unwrap();
        clock.advance(Duration::from_millis(200));
        assert!((ramp.current_chance() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn parses_from_toml_section() {
        let toml_str = r#"
minimum_chance = 0.1
maximum_chance = 0.9
max_duration = "30s"
"#;
        let cfg: RampConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg, config(0.1, 0.9, "30s"));
        assert_eq!(cfg.duration().unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn json_roundtrip() {
        let cfg = config(0.25, 0.75, "2m");
        let json = serde_json::to_string(&cfg).unwrap();
        let back: RampConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
