use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::config::HttpConfig;
use crate::error::ClientError;
use crate::interceptor::Interceptor;

/// HTTP pipeline for the TimeKeeper API. Every request passes through the
/// configured interceptors, in order, before it is sent.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    interceptors: Vec<Arc<dyn Interceptor>>,
    token_store: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: HttpConfig, token_store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(ApiClient {
            http,
            base_url: config.base_url,
            interceptors: config.interceptors,
            token_store,
        })
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.token_store
    }

    pub fn is_authenticated(&self) -> bool {
        self.token_store.token().is_some()
    }

    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|err| ClientError::Config(format!("bad request url {raw}: {err}")))
    }

    pub(crate) fn url_with_query(
        &self,
        path: &str,
        pairs: &[(&str, String)],
    ) -> Result<Url, ClientError> {
        let mut url = self.url(path)?;
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let response = self.send(self.http.request(Method::GET, url)).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let response = self.send(self.http.request(method, url).json(body)).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<(), ClientError> {
        let url = self.url(path)?;
        self.send(self.http.request(method, url)).await?;
        Ok(())
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let mut request = builder.build()?;
        for interceptor in &self.interceptors {
            request = interceptor.intercept(request)?;
        }

        debug!(method = %request.method(), url = %request.url(), "Dispatching request");
        let response = self.http.execute(request).await?;
        self.check_status(response).await
    }

    async fn check_status(&self, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("Access token rejected, clearing credentials");
                if let Err(err) = self.token_store.clear() {
                    warn!(%err, "Failed to clear rejected token");
                }
                Err(ClientError::Unauthorized)
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::Api {
                    status,
                    detail: error_detail(&body),
                })
            }
        }
    }
}

/// Pulls the human-readable message out of an error body. FastAPI puts it
/// under `detail`, some proxies under `error`; anything else is returned raw.
pub fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    match value.get("detail").or_else(|| value.get("error")) {
        Some(Value::String(msg)) => msg.clone(),
        Some(other) => other.to_string(),
        None => body.trim().to_string(),
    }
}
