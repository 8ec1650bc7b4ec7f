pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod models;
pub mod routes;
pub mod views;

pub use client::ApiClient;
pub use config::{AppConfig, ChangeDetection, Settings};
pub use error::ClientError;
