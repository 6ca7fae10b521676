//! Count-up animation for the landing banner statistics.
//!
//! The product's banner shows four headline numbers that count up from zero
//! when first displayed. [`StatsCounter`] reproduces that animation as a
//! finite stream of values: one emission per 16 ms tick, rising linearly and
//! clamping exactly at the target, then terminating. Terminal frontends
//! redraw on each emission the way the web page re-renders on each interval
//! callback.

use futures::stream;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;

/// A boxed, finite stream of counter values. The final item is always the
/// exact target.
pub type CounterStream = Pin<Box<dyn Stream<Item = u64> + Send>>;

/// One banner statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerStat {
    pub label: &'static str,
    pub target: u64,
    /// Rendered directly after the number, e.g. `99%` or `150x`.
    pub suffix: &'static str,
}

/// The four product statistics, in display order.
pub const BANNER_STATS: [BannerStat; 4] = [
    BannerStat {
        label: "Accuracy Rate",
        target: 99,
        suffix: "%",
    },
    BannerStat {
        label: "Processing Speed",
        target: 150,
        suffix: "x",
    },
    BannerStat {
        label: "Documents Processed",
        target: 50_000,
        suffix: "+",
    },
    BannerStat {
        label: "Supported Languages",
        target: 25,
        suffix: "",
    },
];

/// Linear count-up from zero to `target` over `duration`.
///
/// Values advance by `target / (duration / tick)` per tick and are floored
/// for display, so intermediate emissions are monotonically non-decreasing
/// and never overshoot. A duration at or below one tick emits the target on
/// the first tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsCounter {
    target: u64,
    duration: Duration,
    tick: Duration,
}

impl StatsCounter {
    /// Animation length used by the product's banner.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

    /// Redraw cadence, one emission per tick.
    pub const TICK: Duration = Duration::from_millis(16);

    pub fn new(target: u64) -> Self {
        Self::with_duration(target, Self::DEFAULT_DURATION)
    }

    pub fn with_duration(target: u64, duration: Duration) -> Self {
        Self {
            target,
            duration,
            tick: Self::TICK,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// The animation as a lazy stream; no timer runs until polled.
    pub fn values(&self) -> CounterStream {
        let target = self.target;
        let tick = self.tick;
        // Number of ticks the animation is meant to span. A zero or
        // sub-tick span uses the whole target as the increment so the
        // first emission clamps and terminates (a 0/0 NaN increment
        // would never clamp).
        let ticks = self.duration.as_millis() as f64 / tick.as_millis() as f64;
        let increment = if ticks < 1.0 {
            target as f64
        } else {
            target as f64 / ticks
        };

        let s = stream::unfold((0.0_f64, false), move |(current, done)| async move {
            if done {
                return None;
            }
            sleep(tick).await;
            let next = current + increment;
            if next >= target as f64 {
                Some((target, (next, true)))
            } else {
                Some((next.floor() as u64, (next, false)))
            }
        });

        Box::pin(s)
    }
}
