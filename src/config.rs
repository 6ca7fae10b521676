//! Configuration types for the analysis run.
//!
//! All run behaviour is controlled through [`ProcessorConfig`], built via its
//! [`ProcessorConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks and to diff two runs to understand
//! why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest, and it keeps call sites stable when
//! a field is added.

use crate::producer::ResultProducer;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a simulated analysis run.
///
/// Built via [`ProcessorConfig::builder()`] or using
/// [`ProcessorConfig::default()`].
///
/// # Example
/// ```rust
/// use neuraldocs::ProcessorConfig;
/// use std::time::Duration;
///
/// let config = ProcessorConfig::builder()
///     .stage_delay(Duration::from_millis(50))
///     .seed(42)
///     .build();
/// ```
#[derive(Clone)]
pub struct ProcessorConfig {
    /// Pause before each stage event is emitted. Default: 800 ms.
    ///
    /// The run walks five stages, so a full run lasts five times this value
    /// (4 s at the default). Tests shrink it or drive it under a paused
    /// clock; the pacing itself is the product, since no real work happens.
    pub stage_delay: Duration,

    /// Seed for the randomized page count. Default: None.
    ///
    /// When set, the built-in producer draws the page count from a seeded
    /// RNG, making the whole result a pure function of the selected file's
    /// metadata and this seed. When unset, every run differs.
    pub seed: Option<u64>,

    /// Pre-constructed result producer. Takes precedence over `seed`.
    ///
    /// If None, runs use [`crate::producer::MockAnalyzer`], honouring `seed`.
    pub producer: Option<Arc<dyn ResultProducer>>,

    /// Observer notified at run start, per stage, and on completion.
    /// Default: None (no observer).
    ///
    /// Only the eager [`crate::task::ProcessingTask::process`] path fires
    /// these hooks. The event stream carries the same information, so
    /// stream consumers do not need a callback.
    pub progress: Option<ProgressCallback>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            stage_delay: Duration::from_millis(800),
            seed: None,
            producer: None,
            progress: None,
        }
    }
}

impl fmt::Debug for ProcessorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorConfig")
            .field("stage_delay", &self.stage_delay)
            .field("seed", &self.seed)
            .field("producer", &self.producer.as_ref().map(|_| "<dyn ResultProducer>"))
            .field("progress", &self.progress.as_ref().map(|_| "<dyn AnalysisProgressCallback>"))
            .finish()
    }
}

impl ProcessorConfig {
    /// Create a new builder for `ProcessorConfig`.
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ProcessorConfig`].
#[derive(Debug)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    pub fn stage_delay(mut self, delay: Duration) -> Self {
        self.config.stage_delay = delay;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn producer(mut self, producer: Arc<dyn ResultProducer>) -> Self {
        self.config.producer = Some(producer);
        self
    }

    pub fn progress(mut self, callback: ProgressCallback) -> Self {
        self.config.progress = Some(callback);
        self
    }

    /// Build the configuration.
    ///
    /// No field has a constrained range (a zero `stage_delay` is valid and
    /// useful in tests), so building cannot fail.
    pub fn build(self) -> ProcessorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::MockAnalyzer;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = ProcessorConfig::default();
        assert_eq!(config.stage_delay, Duration::from_millis(800));
        assert_eq!(config.seed, None);
        assert!(config.producer.is_none());
        assert!(config.progress.is_none());
    }

    #[test]
    fn builder_overrides_stick() {
        let config = ProcessorConfig::builder()
            .stage_delay(Duration::from_millis(5))
            .seed(42)
            .producer(Arc::new(MockAnalyzer::seeded(42)))
            .build();
        assert_eq!(config.stage_delay, Duration::from_millis(5));
        assert_eq!(config.seed, Some(42));
        assert!(config.producer.is_some());
    }

    #[test]
    fn debug_elides_trait_objects() {
        let config = ProcessorConfig::builder()
            .producer(Arc::new(MockAnalyzer::new()))
            .build();
        let repr = format!("{config:?}");
        assert!(repr.contains("<dyn ResultProducer>"));
        assert!(!repr.contains("MockAnalyzer"));
    }
}
