use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay used when no period is given, or when the given one is zero.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(5);

/// Attempt count that never runs out.
pub const UNBOUNDED: i64 = -1;

/// Configures attempt count and the delay between failed attempts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Total number of invocations, not retries after the first.
    /// Negative runs until success; zero runs nothing.
    pub attempts: i64,
    /// Fixed delay between a failed attempt and the next one.
    ///
    /// Written as `period_ms`: a whole number when the period is an exact
    /// number of milliseconds, a fraction otherwise (`0.001` is 1 µs).
    #[serde(rename = "period_ms", with = "duration_ms")]
    pub period: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            attempts: 3,
            period: DEFAULT_PERIOD,
        }
    }
}

impl RetryOptions {
    /// Options that retry until the operation succeeds.
    pub fn unbounded() -> Self {
        Self {
            attempts: UNBOUNDED,
            ..Self::default()
        }
    }

    pub fn with_attempts(mut self, attempts: i64) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.attempts < 0
    }

    /// Effective delay between attempts; a zero period falls back to
    /// [`DEFAULT_PERIOD`].
    pub fn period(&self) -> Duration {
        effective_period(Some(self.period))
    }
}

pub(crate) fn effective_period(period: Option<Duration>) -> Duration {
    match period {
        Some(period) if !period.is_zero() => period,
        _ => DEFAULT_PERIOD,
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    const NANOS_PER_MILLI: u128 = 1_000_000;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = value.as_nanos();
        if nanos % NANOS_PER_MILLI == 0 {
            let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
            serializer.serialize_u64(millis)
        } else {
            // Sub-millisecond parts must survive, or a short period would
            // read back as zero and fall through to the default.
            serializer.serialize_f64(nanos as f64 / NANOS_PER_MILLI as f64)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        if !millis.is_finite() || millis < 0.0 {
            return Err(de::Error::custom(format!(
                "period_ms must be a non-negative number, got {millis}"
            )));
        }
        let nanos = (millis * NANOS_PER_MILLI as f64).round();
        Ok(Duration::from_nanos(nanos as u64))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{effective_period, RetryOptions, DEFAULT_PERIOD, UNBOUNDED};

    #[test]
    fn zero_or_missing_period_uses_default() {
        assert_eq!(effective_period(None), DEFAULT_PERIOD);
        assert_eq!(effective_period(Some(Duration::ZERO)), DEFAULT_PERIOD);
        assert_eq!(
            effective_period(Some(Duration::from_micros(1))),
            Duration::from_micros(1)
        );
    }

    #[test]
    fn builder_sets_fields() {
        let opts = RetryOptions::default()
            .with_attempts(7)
            .with_period(Duration::from_millis(50));
        assert_eq!(opts.attempts, 7);
        assert_eq!(opts.period(), Duration::from_millis(50));
        assert!(!opts.is_unbounded());
    }

    #[test]
    fn unbounded_keeps_default_period() {
        let opts = RetryOptions::unbounded();
        assert_eq!(opts.attempts, UNBOUNDED);
        assert!(opts.is_unbounded());
        assert_eq!(opts.period(), DEFAULT_PERIOD);
    }

    #[test]
    fn sub_millisecond_period_survives_round_trip() {
        let opts = RetryOptions::default()
            .with_attempts(3000)
            .with_period(Duration::from_micros(1));
        let json = serde_json::to_value(&opts).expect("options must serialize");
        assert_eq!(json["period_ms"], serde_json::json!(0.001));

        let back: RetryOptions = serde_json::from_value(json).expect("options must deserialize");
        assert_eq!(back.period(), Duration::from_micros(1));
        assert_eq!(back, opts);
    }

    #[test]
    fn fractional_and_whole_millis_both_parse() {
        let opts: RetryOptions =
            serde_json::from_str(r#"{ "period_ms": 1.5 }"#).expect("fraction must parse");
        assert_eq!(opts.period(), Duration::from_micros(1500));

        let opts: RetryOptions =
            serde_json::from_str(r#"{ "period_ms": 50 }"#).expect("integer must parse");
        assert_eq!(opts.period(), Duration::from_millis(50));
        assert_eq!(
            serde_json::to_value(&opts).expect("options must serialize")["period_ms"],
            serde_json::json!(50)
        );
    }

    #[test]
    fn negative_period_is_rejected() {
        let err = serde_json::from_str::<RetryOptions>(r#"{ "period_ms": -1 }"#)
            .expect_err("negative period must fail");
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn zero_period_field_reads_as_default() {
        let opts = RetryOptions::default().with_period(Duration::ZERO);
        assert_eq!(opts.period(), DEFAULT_PERIOD);
    }
}
