use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use crate::auth::TokenStore;
use crate::client::ApiClient;
use crate::error::ClientError;
use crate::interceptor::{Interceptor, JwtInterceptor};
use crate::routes::RouteTable;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_TOKEN_FILE: &str = ".timekeeper-token";

/// How views decide when to re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDetection {
    /// Re-render only when the application asks for it.
    Zoneless,
    /// Re-render after every async task completes.
    ZoneBased,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: Url,
    pub timeout: Duration,
    pub page_size: u32,
    pub token_file: PathBuf,
}

impl Settings {
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        Ok(Settings {
            api_url: parse_api_url(api_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let api_url = lookup("TIMEKEEPER_API_URL")
            .ok_or_else(|| ClientError::Config("TIMEKEEPER_API_URL must be set".to_string()))?;
        let mut settings = Settings::new(&api_url)?;

        if let Some(secs) = lookup("TIMEKEEPER_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ClientError::Config(format!("TIMEKEEPER_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            settings.timeout = Duration::from_secs(secs);
        }

        if let Some(size) = lookup("TIMEKEEPER_PAGE_SIZE") {
            settings.page_size = size
                .parse()
                .ok()
                .filter(|s| (1..=MAX_PAGE_SIZE).contains(s))
                .ok_or_else(|| {
                    ClientError::Config(format!(
                        "TIMEKEEPER_PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}, got {size}"
                    ))
                })?;
        }

        if let Some(path) = lookup("TIMEKEEPER_TOKEN_FILE") {
            settings.token_file = PathBuf::from(path);
        }

        Ok(settings)
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|err| ClientError::Config(format!("invalid TIMEKEEPER_API_URL {raw:?}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "TIMEKEEPER_API_URL must be http or https, got {raw:?}"
        )));
    }
    Ok(url)
}

pub struct HttpConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub interceptors: Vec<Arc<dyn Interceptor>>,
}

/// Everything the application needs at start, assembled once.
pub struct AppConfig {
    pub change_detection: ChangeDetection,
    pub routes: RouteTable,
    pub http: HttpConfig,
    pub page_size: u32,
    pub token_store: Arc<dyn TokenStore>,
}

impl AppConfig {
    pub fn bootstrap(settings: &Settings, token_store: Arc<dyn TokenStore>) -> Self {
        let jwt = JwtInterceptor::new(token_store.clone()).scoped_to(settings.api_url.clone());

        AppConfig {
            change_detection: ChangeDetection::Zoneless,
            routes: RouteTable::default(),
            http: HttpConfig {
                base_url: settings.api_url.clone(),
                timeout: settings.timeout,
                interceptors: vec![Arc::new(jwt)],
            },
            page_size: settings.page_size,
            token_store,
        }
    }

    pub fn into_client(self) -> Result<ApiClient, ClientError> {
        ApiClient::new(self.http, self.token_store)
    }

    pub fn client(&self) -> Result<ApiClient, ClientError> {
        let http = HttpConfig {
            base_url: self.http.base_url.clone(),
            timeout: self.http.timeout,
            interceptors: self.http.interceptors.clone(),
        };
        ApiClient::new(http, self.token_store.clone())
    }
}
