use std::time::SystemTime;

use rand::seq::IndexedRandom;
use reqwest::{Client as Request, StatusCode, header::DATE, redirect::Policy};
use serde::Serialize;

use crate::{
    config::Config,
    error::{Error, Result},
};

pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
];

/// Cookie-keeping client that never follows redirects, so the first hop of
/// every redirect chain is visible to the caller.
pub fn basic(config: &Config) -> reqwest::Result<Request> {
    let user_agent = config.user_agent.as_deref().unwrap_or_else(|| {
        USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
    });
    tracing::debug!(target: "scrape", "user-agent \x1b[1;36m{user_agent}\x1b[0m");

    Request::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .user_agent(user_agent)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
}

pub struct Page {
    pub body: String,
    pub date: Option<SystemTime>,
}

pub struct Session {
    client: Request,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            client: basic(&config).map_err(Error::Client)?,
            config,
        })
    }

    /// Drops every cookie by starting over with a fresh client.
    pub fn reset(&mut self) -> Result<()> {
        self.client = basic(&self.config).map_err(Error::Client)?;
        Ok(())
    }

    pub async fn get(&self, path: &str) -> Result<Page> {
        let url = self.config.url(path);
        tracing::debug!(target: "scrape", "GET {url}");

        let res = self.client.get(&url).send().await?;
        let status = res.status();
        if !status.is_success() {
            tracing::warn!(target: "scrape", "\x1b[31mGET {url} -> {status}\x1b[0m");
            return Err(Error::Status { url, status });
        }

        let date = res
            .headers()
            .get(DATE)
            .and_then(|s| s.to_str().ok())
            .and_then(|s| httpdate::parse_http_date(s).ok());
        let body = res.text().await?;
        tracing::debug!(target: "scrape", "GET {url}: {} bytes", body.len());

        Ok(Page { body, date })
    }

    pub async fn post_form<F>(&self, path: &str, form: &F) -> Result<StatusCode>
    where
        F: Serialize + ?Sized,
    {
        let url = self.config.url(path);
        tracing::debug!(target: "scrape", "POST {url}");

        let res = self.client.post(&url).form(form).send().await?;
        Ok(res.status())
    }
}
