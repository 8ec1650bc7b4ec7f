use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum ClientError {
    Config(String),
    Validation(&'static str),
    Unauthorized,
    NotFound,
    Api { status: StatusCode, detail: String },
    InvalidResponse(String),
    Http(String),
    TokenStore(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Config(msg) => write!(f, "configuration error: {msg}"),
            ClientError::Validation(msg) => write!(f, "invalid input: {msg}"),
            ClientError::Unauthorized => f.write_str("Unauthorized"),
            ClientError::NotFound => f.write_str("Not found"),
            ClientError::Api { status, detail } => write!(f, "server returned {status}: {detail}"),
            ClientError::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
            ClientError::Http(msg) => write!(f, "request failed: {msg}"),
            ClientError::TokenStore(msg) => write!(f, "token store: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::TokenStore(err.to_string())
    }
}
