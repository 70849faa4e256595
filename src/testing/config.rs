//! Runner configuration.

use std::time::Duration;

/// How long pending work may take once a method has returned.
pub const DEFAULT_PENDING_TIMEOUT: Duration = Duration::from_millis(2000);

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Upper bound on a single method's completion signal; `None` waits indefinitely
    pub method_timeout: Option<Duration>,
    /// Whether a method's registered pending work must settle before the method counts as passed
    pub drain_pending_work: bool,
    /// Upper bound on draining pending work; `None` waits indefinitely
    pub pending_timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            method_timeout: None,
            drain_pending_work: true,
            pending_timeout: Some(DEFAULT_PENDING_TIMEOUT),
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.method_timeout = timeout;
        self
    }

    pub fn with_pending_work(mut self, drain: bool) -> Self {
        self.drain_pending_work = drain;
        self
    }

    pub fn with_pending_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pending_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.method_timeout, None);
        assert!(config.drain_pending_work);
        assert_eq!(config.pending_timeout, Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(RunnerConfig::new(), RunnerConfig::default());
    }

    #[test]
    fn test_builder_chain() {
        let config = RunnerConfig::new()
            .with_method_timeout(Some(Duration::from_secs(1)))
            .with_pending_work(false)
            .with_pending_timeout(None);

        assert_eq!(config.method_timeout, Some(Duration::from_secs(1)));
        assert!(!config.drain_pending_work);
        assert_eq!(config.pending_timeout, None);
    }

    #[test]
    fn test_builder_override() {
        let config = RunnerConfig::new()
            .with_method_timeout(Some(Duration::from_secs(1)))
            .with_method_timeout(None);
        assert_eq!(config.method_timeout, None); // Last value wins
    }
}
