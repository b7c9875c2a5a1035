//! OpenAI-compatible chat-completions oracle.
//!
//! One blocking HTTP round trip per decision.  The client carries the
//! configured timeout, so a slow or dead endpoint costs at most one timeout
//! per call before the controller falls back.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::{
    CandidateSet, DecisionOracle, LlmConfig, OracleError, OracleResult, PromptTemplate,
    parse_choice,
};

/// Asks a chat-completions endpoint to pick a route.
pub struct LlmOracle {
    client:     Client,
    config:     LlmConfig,
    template:   PromptTemplate,
    transcript: Option<Mutex<File>>,
}

impl LlmOracle {
    /// Build the HTTP client and load the prompt.
    ///
    /// Uses `config.prompt_path` when set, otherwise the built-in template,
    /// and opens `config.transcript` for appending when set.
    pub fn new(config: LlmConfig) -> OracleResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Transport(format!("failed to build HTTP client: {e}")))?;

        let template = match &config.prompt_path {
            Some(path) => PromptTemplate::from_file(path)?,
            None => PromptTemplate::builtin()?,
        };

        let transcript_path = config.transcript.clone();
        let oracle = Self { client, config, template, transcript: None };
        match transcript_path {
            Some(path) => oracle.with_transcript(&path),
            None => Ok(oracle),
        }
    }

    /// Replace the prompt template.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Append every prompt and reply to `path`.
    pub fn with_transcript(mut self, path: &Path) -> OracleResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.transcript = Some(Mutex::new(file));
        Ok(self)
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send `prompt` as a single user message and return the reply text.
    pub fn complete(&self, prompt: &str) -> OracleResult<String> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });

        let result = self.post(&body);
        self.record(prompt, &result);
        result
    }

    fn post(&self, body: &serde_json::Value) -> OracleResult<String> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(OracleError::Status { status: status.as_u16(), body });
        }

        let json: serde_json::Value = response.json().map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout(self.config.timeout)
            } else {
                OracleError::Parse(format!("response is not JSON: {e}"))
            }
        })?;
        extract_content(&json)
    }

    fn transport_error(&self, e: reqwest::Error) -> OracleError {
        if e.is_timeout() {
            OracleError::Timeout(self.config.timeout)
        } else {
            OracleError::Transport(e.to_string())
        }
    }

    fn record(&self, prompt: &str, result: &OracleResult<String>) {
        let Some(transcript) = &self.transcript else {
            return;
        };
        let Ok(mut file) = transcript.lock() else {
            warn!("transcript lock poisoned; entry dropped");
            return;
        };
        let outcome = match result {
            Ok(reply) => format!("Response:\n{reply}\n\n"),
            Err(e) => format!("Error: {e}\n\n"),
        };
        let entry = format!("Prompt:\n{prompt}\n\n{outcome}{}\n", "=".repeat(50));
        if let Err(e) = file.write_all(entry.as_bytes()) {
            warn!(error = %e, "failed to append to oracle transcript");
        }
    }
}

impl DecisionOracle for LlmOracle {
    fn name(&self) -> &str {
        "llm"
    }

    fn choose(&self, set: &CandidateSet) -> OracleResult<Vec<String>> {
        if set.is_empty() {
            return Err(OracleError::EmptyCandidates);
        }
        let prompt = self.template.render(set)?;
        let reply = self.complete(&prompt)?;
        let route = parse_choice(&reply)?;
        debug!(agent = %set.agent, model = %self.config.model, ?route, "llm answered");
        Ok(route)
    }
}

/// Text of `choices[0].message.content` in a chat-completions response.
pub(crate) fn extract_content(json: &serde_json::Value) -> OracleResult<String> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| OracleError::Parse("response missing choices[0].message.content".to_owned()))
}
