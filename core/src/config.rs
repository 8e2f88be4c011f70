use serde::{Deserialize, Serialize};

/// What to do when DisableButton targets a button that was never enabled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnregisteredButtonPolicy {
    /// Fail with `GameError::NotRegistered`.
    #[default]
    Reject,
    /// Hide the button anyway and log a warning.
    Ignore,
}

/// When pending conditions are checked against the game state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTrigger {
    /// After the delayed-action queue has drained on every tick.
    #[default]
    EveryTick,
    /// After every top-level `perform_actions` call.
    EveryDispatch,
    /// Only when the host calls `GameEngine::evaluate_conditions`.
    Manual,
}

/// What happens to a condition once it has fired.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionRetention {
    /// Removed before its action runs.
    #[default]
    FireOnce,
    /// Kept; fires again after the predicate has been seen false.
    Rearm,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ConditionPolicy {
    pub trigger:   ConditionTrigger,
    pub retention: ConditionRetention,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Real milliseconds per tick at a time factor of 1.0.
    pub tick_interval_ms: u64,
    pub time_factor: f64,
    pub start_paused: bool,
    /// Upper bound on nested action dispatch (flag hooks, bulk actions,
    /// delayed actions firing inside PassTime, ...).
    pub max_dispatch_depth: usize,
    /// Number of newest messages included in a snapshot.
    pub message_display_limit: usize,
    pub unregistered_button: UnregisteredButtonPolicy,
    pub conditions: ConditionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms:      1000,
            time_factor:           1.0,
            start_paused:          false,
            max_dispatch_depth:    64,
            message_display_limit: 10,
            unregistered_button:   UnregisteredButtonPolicy::default(),
            conditions:            ConditionPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    /// In tests, use EngineConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be greater than zero");
        }
        if !self.time_factor.is_finite() || self.time_factor <= 0.0 {
            anyhow::bail!("time_factor must be a positive number, got {}", self.time_factor);
        }
        if self.max_dispatch_depth == 0 {
            anyhow::bail!("max_dispatch_depth must be at least 1");
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "tick_interval_ms": 250, "conditions": { "trigger": "every_dispatch" } }"#,
        )
        .unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.conditions.trigger, ConditionTrigger::EveryDispatch);
        assert_eq!(config.conditions.retention, ConditionRetention::FireOnce);
        assert_eq!(config.message_display_limit, 10);
        assert_eq!(config.unregistered_button, UnregisteredButtonPolicy::Reject);
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(EngineConfig::from_json(r#"{ "tick_interval_ms": 0 }"#).is_err());
    }

    #[test]
    fn rejects_non_positive_time_factor() {
        assert!(EngineConfig::from_json(r#"{ "time_factor": 0.0 }"#).is_err());
    }

    #[test]
    fn policies_use_snake_case_names() {
        let config = EngineConfig::from_json(
            r#"{ "unregistered_button": "ignore", "conditions": { "retention": "rearm" } }"#,
        )
        .unwrap();
        assert_eq!(config.unregistered_button, UnregisteredButtonPolicy::Ignore);
        assert_eq!(config.conditions.retention, ConditionRetention::Rearm);
    }
}
