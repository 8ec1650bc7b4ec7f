use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Url};
use tracing::debug;

use crate::auth::TokenStore;
use crate::error::ClientError;

/// Runs on every outgoing request before it reaches the network.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, request: Request) -> Result<Request, ClientError>;
}

/// Attaches the stored access token as a bearer credential.
pub struct JwtInterceptor {
    store: Arc<dyn TokenStore>,
    origin: Option<Url>,
}

impl JwtInterceptor {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        JwtInterceptor {
            store,
            origin: None,
        }
    }

    /// Only requests to the same scheme, host and port as `origin` get the token.
    pub fn scoped_to(mut self, origin: Url) -> Self {
        self.origin = Some(origin);
        self
    }

    fn in_scope(&self, url: &Url) -> bool {
        match self.origin {
            Some(ref origin) => {
                origin.scheme() == url.scheme()
                    && origin.host_str() == url.host_str()
                    && origin.port_or_known_default() == url.port_or_known_default()
            }
            None => true,
        }
    }
}

impl Interceptor for JwtInterceptor {
    fn intercept(&self, mut request: Request) -> Result<Request, ClientError> {
        if !self.in_scope(request.url()) {
            debug!(url = %request.url(), "Skipping token for foreign origin");
            return Ok(request);
        }

        if let Some(token) = self.store.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::TokenStore("token is not a valid header value".into()))?;
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        Ok(request)
    }
}
