use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::mvi::FeatureOptions;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feature: FeatureConfig,
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub saved_state: SavedStateConfig,
}

/// Engine settings shared by every feature the host starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Feature name shown in logs (default: "counter").
    #[serde(default = "default_feature_name")]
    pub name: String,
    /// News buffered per subscriber before the oldest is dropped (default: 64).
    #[serde(default = "default_news_capacity")]
    pub news_capacity: usize,
}

/// Counter demo settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Delay between the loading and the success effect (default: 250).
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    /// Announce every multiple of this value; 0 disables (default: 10).
    #[serde(default = "default_milestone")]
    pub milestone: i64,
}

/// Where and under which key the counter is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedStateConfig {
    /// Saved-state file; `None` uses the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Registry key for the counter snapshot (default: "CounterState").
    #[serde(default = "default_saved_state_key")]
    pub key: String,
}

fn default_feature_name() -> String {
    "counter".to_string()
}

fn default_news_capacity() -> usize {
    64
}

fn default_step_delay_ms() -> u64 {
    250
}

fn default_milestone() -> i64 {
    10
}

fn default_saved_state_key() -> String {
    "CounterState".to_string()
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            name: default_feature_name(),
            news_capacity: default_news_capacity(),
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
            milestone: default_milestone(),
        }
    }
}

impl Default for SavedStateConfig {
    fn default() -> Self {
        Self {
            path: None,
            key: default_saved_state_key(),
        }
    }
}

impl CounterConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl From<&FeatureConfig> for FeatureOptions {
    fn from(config: &FeatureConfig) -> Self {
        FeatureOptions {
            name: config.name.clone(),
            news_capacity: config.news_capacity,
        }
    }
}
