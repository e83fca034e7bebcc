use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Interactive shell settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Prompt written before each read.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Default tracing filter (overridable with `--log-filter`).
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Worker-pool settings for asynchronous execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker threads used when the shell runs in asynchronous mode.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            log_filter: default_log_filter(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_workers() -> usize {
    2
}
