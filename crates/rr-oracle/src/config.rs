//! LLM oracle configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::{OracleError, OracleResult};

/// Default per-call timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default model name sent in the request body.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Connection and prompt settings for [`LlmOracle`](crate::LlmOracle).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Full chat-completions endpoint URL.
    pub api_url:     String,
    pub api_key:     String,
    pub model:       String,
    /// Hard limit on one oracle call, connect through last body byte.
    pub timeout:     Duration,
    /// Template file replacing the built-in prompt.
    pub prompt_path: Option<PathBuf>,
    /// File that every prompt and reply is appended to.
    pub transcript:  Option<PathBuf>,
}

impl LlmConfig {
    /// Load from the process environment.
    ///
    /// | Variable                  | Required | Default         |
    /// |---------------------------|----------|-----------------|
    /// | `REROUTE_LLM_API_URL`     | yes      |                 |
    /// | `REROUTE_LLM_API_KEY`     | yes      |                 |
    /// | `REROUTE_LLM_MODEL`       | no       | `deepseek-chat` |
    /// | `REROUTE_LLM_TIMEOUT_MS`  | no       | `10000`         |
    /// | `REROUTE_PROMPT_PATH`     | no       | built-in prompt |
    /// | `REROUTE_LLM_TRANSCRIPT`  | no       | no transcript   |
    ///
    /// # Errors
    ///
    /// [`OracleError::Config`] if a required variable is missing or the
    /// timeout is not a positive integer.
    pub fn from_env() -> OracleResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> OracleResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| OracleError::Config(format!("missing required env var {name}")))
        };

        let api_url = required("REROUTE_LLM_API_URL")?;
        let api_key = required("REROUTE_LLM_API_KEY")?;
        let model   = lookup("REROUTE_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        let timeout_ms: u64 = match lookup("REROUTE_LLM_TIMEOUT_MS") {
            None => DEFAULT_TIMEOUT_MS,
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| OracleError::Config(format!("invalid REROUTE_LLM_TIMEOUT_MS: {e}")))?,
        };
        if timeout_ms == 0 {
            return Err(OracleError::Config("REROUTE_LLM_TIMEOUT_MS must be positive".into()));
        }

        Ok(Self {
            api_url,
            api_key,
            model,
            timeout:     Duration::from_millis(timeout_ms),
            prompt_path: lookup("REROUTE_PROMPT_PATH").map(PathBuf::from),
            transcript:  lookup("REROUTE_LLM_TRANSCRIPT").map(PathBuf::from),
        })
    }
}
