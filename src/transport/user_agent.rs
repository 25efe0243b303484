// src/transport/user_agent.rs
// =============================================================================
// Which User-Agent header to send with each request.
//
// The crawler rotates between a handful of ordinary browser strings. The
// choice is a trait so tests (and --user-agent) can pin one value.
// =============================================================================

use rand::seq::SliceRandom;

/// Browser strings the crawler rotates through by default.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Ubuntu Chromium/37.0.2062.94 Chrome/37.0.2062.94 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/45.0.2454.85 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; WOW64; Trident/7.0; rv:11.0) like Gecko",
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:40.0) Gecko/20100101 Firefox/40.0",
];

pub trait UserAgentSource: Send + Sync {
    /// Called once per request.
    fn pick(&self) -> String;
}

/// Uniform random pick from a fixed pool.
#[derive(Debug, Clone)]
pub struct RotatingUserAgents {
    pool: Vec<String>,
}

impl RotatingUserAgents {
    /// An empty `pool` falls back to [`DEFAULT_USER_AGENTS`].
    pub fn new(pool: Vec<String>) -> Self {
        if pool.is_empty() {
            Self::default()
        } else {
            Self { pool }
        }
    }
}

impl Default for RotatingUserAgents {
    fn default() -> Self {
        Self {
            pool: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl UserAgentSource for RotatingUserAgents {
    fn pick(&self) -> String {
        // pool is never empty, see new()
        self.pool
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

/// Always the same string.
#[derive(Debug, Clone)]
pub struct FixedUserAgent(pub String);

impl UserAgentSource for FixedUserAgent {
    fn pick(&self) -> String {
        self.0.clone()
    }
}
