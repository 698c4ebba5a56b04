use crate::error::{CheckoutError, Result};
use std::str::FromStr;
use std::time::Duration;

pub const CLIENT_ID_VAR: &str = "PAYPAL_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "PAYPAL_CLIENT_SECRET";
pub const ENVIRONMENT_VAR: &str = "PAYPAL_ENVIRONMENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Live,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api-m.sandbox.paypal.com",
            Self::Live => "https://api-m.paypal.com",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "live" | "production" => Ok(Self::Live),
            other => Err(format!(
                "unknown environment '{other}', expected sandbox or live"
            )),
        }
    }
}

/// Provider connection settings.
///
/// Missing credentials become empty strings: the provider, not this tool,
/// decides whether they are acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub environment: Environment,
    /// `None` waits on the provider indefinitely.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup(ENVIRONMENT_VAR).filter(|value| !value.is_empty()) {
            Some(value) => value.parse().map_err(CheckoutError::InvalidConfig)?,
            None => Environment::default(),
        };

        Ok(Self {
            client_id: lookup(CLIENT_ID_VAR).unwrap_or_default(),
            client_secret: lookup(CLIENT_SECRET_VAR).unwrap_or_default(),
            environment,
            timeout: None,
        })
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Zero disables the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }
}
