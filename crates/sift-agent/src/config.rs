use std::time::Duration;

/// Session guardrails and per-request model options.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound on completion round-trips (tool loops included)
    pub max_steps: usize,
    /// Wall-clock ceiling for the whole session
    pub execution_timeout: Duration,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_steps: 5,
            execution_timeout: Duration::from_secs(300),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}
