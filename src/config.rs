use core::time::Duration;

use compact_str::CompactString;

pub mod constants {
    use core::time::Duration;

    macro_rules! env_or_default {
        ($name:expr, $default:expr) => {
            if let Some(s) = option_env!($name) {
                s
            } else {
                $default
            }
        };
    }

    pub const BASE_URL: &str = env_or_default!("GRADESCOPE_URL", "https://www.gradescope.com");
    pub const USER_AGENT: Option<&str> = option_env!("GRADESCOPE_USER_AGENT");
    pub const TIMEOUT: Duration = Duration::from_secs(30);
    pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Portal origin without a trailing slash.
    pub base_url: CompactString,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// `None` picks one of [`crate::scrape::USER_AGENTS`] at random.
    pub user_agent: Option<CompactString>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: constants::BASE_URL.into(),
            timeout: constants::TIMEOUT,
            connect_timeout: constants::CONNECTION_TIMEOUT,
            user_agent: constants::USER_AGENT.map(Into::into),
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn joins_paths_without_double_slash() {
        let config = Config::default().with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.url("/account"), "http://127.0.0.1:1234/account");
    }
}
