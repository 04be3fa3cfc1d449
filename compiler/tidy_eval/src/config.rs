//! Evaluator configuration and the builder that applies it.

use crate::evaluator::Evaluator;

/// Environment variable read by [`EvalConfig::from_env`].
pub const MAX_DEPTH_VAR: &str = "TIDY_MAX_DEPTH";

/// Knobs for an [`Evaluator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum number of nested evaluations, or `None` for no limit.
    ///
    /// The native stack grows on demand, so an unlimited evaluator only
    /// stops when memory runs out.
    pub max_depth: Option<usize>,
}

impl EvalConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 10_000;

    /// No depth limit.
    pub fn unlimited() -> Self {
        EvalConfig { max_depth: None }
    }

    /// Defaults, overridden by `TIDY_MAX_DEPTH` when it is set.
    ///
    /// The variable holds a positive number or `unlimited`; anything else is
    /// ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = EvalConfig::default();
        let Some(raw) = lookup(MAX_DEPTH_VAR) else {
            return config;
        };
        let value = raw.trim();
        if value.eq_ignore_ascii_case("unlimited") {
            config.max_depth = None;
        } else {
            match value.parse::<usize>() {
                Ok(n) if n > 0 => config.max_depth = Some(n),
                _ => tracing::warn!(value = %raw, "ignoring invalid TIDY_MAX_DEPTH"),
            }
        }
        config
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: Some(Self::DEFAULT_MAX_DEPTH),
        }
    }
}

/// Builder for [`Evaluator`] instances.
///
/// ```text
/// let mut eval = EvaluatorBuilder::new().max_depth(500).build();
/// ```
#[derive(Clone, Debug, Default)]
pub struct EvaluatorBuilder {
    config: EvalConfig,
}

impl EvaluatorBuilder {
    /// A builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Limit nesting to `depth` evaluations.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn unlimited_depth(mut self) -> Self {
        self.config.max_depth = None;
        self
    }

    pub fn build(self) -> Evaluator {
        Evaluator::with_config(self.config)
    }
}

#[cfg(test)]
mod tests;
