use std::process::ExitCode;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use timekeeper::auth::FileTokenStore;
use timekeeper::{views, AppConfig, ClientError, Settings};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<String, ClientError> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/".to_string());
    let rest: Vec<String> = args.collect();

    let settings = Settings::from_env()?;
    let token_store = Arc::new(FileTokenStore::open(&settings.token_file)?);
    let config = AppConfig::bootstrap(&settings, token_store);

    info!(
        api_url = %config.http.base_url,
        change_detection = ?config.change_detection,
        routes = config.routes.len(),
        "Bootstrapped application"
    );

    let client = config.client()?;
    let today = OffsetDateTime::now_utc().date();
    views::open(&config.routes, &client, &path, &rest, config.page_size, today).await
}
