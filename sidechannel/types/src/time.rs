/*!
    Timestamp type for media timing.
*/

use std::fmt;
use std::time::Duration;

/**
    A point in stream time, in 100 ns units.

    This is the time unit media units and chapters are stamped with by the
    source stage. Negative values are valid (e.g. preroll before zero) but
    clamp to zero when converted to a [`Duration`].
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceTime(pub i64);

impl ReferenceTime {
    /// Number of units per second.
    pub const UNITS_PER_SECOND: i64 = 10_000_000;

    /// Stream time zero.
    pub const ZERO: Self = Self(0);

    /**
        Convert to a Duration.

        Negative values are clamped to zero.
    */
    #[inline]
    pub fn to_duration(self) -> Duration {
        if self.0 <= 0 {
            return Duration::ZERO;
        }
        let units = self.0 as u64;
        Duration::new(
            units / Self::UNITS_PER_SECOND as u64,
            ((units % Self::UNITS_PER_SECOND as u64) * 100) as u32,
        )
    }

    /**
        Create from a Duration, truncating below 100 ns and saturating at `i64::MAX`.
    */
    #[inline]
    pub fn from_duration(duration: Duration) -> Self {
        let units = duration.as_nanos() / 100;
        Self(i64::try_from(units).unwrap_or(i64::MAX))
    }

    /**
        Create from whole milliseconds.
    */
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(10_000))
    }
}

impl From<i64> for ReferenceTime {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<ReferenceTime> for i64 {
    fn from(time: ReferenceTime) -> Self {
        time.0
    }
}

impl fmt::Display for ReferenceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = self.0.unsigned_abs();
        let millis = units / 10_000;
        let (hours, rest) = (millis / 3_600_000, millis % 3_600_000);
        let (minutes, rest) = (rest / 60_000, rest % 60_000);
        let (seconds, millis) = (rest / 1000, rest % 1000);
        write!(f, "{sign}{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}
