//! Main application orchestration.
//!
//! Startup: load the spreadsheet bearer token, read venue credentials
//! from the Info worksheet, establish a venue session (reusing the
//! stored access token when it still validates), then run the poll loop
//! that drives the queue reconciler on a fixed cadence.

use crate::config::{AppConfig, SHEETS_TOKEN_ENV};
use crate::error::{AppError, AppResult};
use limitq_kite::{login_url, Credentials, KiteClient, Session};
use limitq_queue::{QueueReconciler, ReconcileSettings, SheetsRowStore};
use limitq_sheets::SheetsClient;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Credentials as stored in the Info worksheet: API key in B1, secret in
/// B2, and optionally the last issued access token in B3.
#[derive(Debug)]
struct StoredCredentials {
    api_key: String,
    api_secret: String,
    access_token: Option<String>,
}

/// Main application.
pub struct Application {
    config: AppConfig,
    reconciler: QueueReconciler,
}

impl Application {
    /// Wire up the application: sheets client, venue session, reconciler.
    ///
    /// Interactive: if the stored access token is missing or rejected,
    /// prompts on stdin for a fresh request token.
    pub async fn bootstrap(config: AppConfig) -> AppResult<Self> {
        let bearer_token = std::env::var(SHEETS_TOKEN_ENV).map_err(|_| {
            AppError::Config(format!("{SHEETS_TOKEN_ENV} environment variable not set"))
        })?;

        let sheets = SheetsClient::new(
            &config.sheets.base_url,
            &config.sheets.spreadsheet_id,
            bearer_token,
        )?;

        let stored = load_credentials(&sheets, &config.sheets.info_worksheet).await?;
        info!("Credentials loaded from Info worksheet");

        let client = establish_session(&config, stored).await?;

        let store = SheetsRowStore::new(sheets, config.sheets.orders_worksheet.clone());
        let settings = ReconcileSettings {
            variety: config.reconcile.variety,
            product: config.reconcile.product,
            row_delay: Duration::from_millis(config.reconcile.row_delay_ms),
        };
        let reconciler = QueueReconciler::new(Arc::new(store), Arc::new(client), settings);

        Ok(Self { config, reconciler })
    }

    /// Run the poll loop until ctrl-c.
    ///
    /// Cycles never overlap: the next one starts only after the previous
    /// fully returns. A cycle-level failure is logged and the loop keeps
    /// going.
    pub async fn run(&self) -> AppResult<()> {
        let poll_interval = Duration::from_secs(self.config.poll_interval_secs);
        info!(
            interval_secs = self.config.poll_interval_secs,
            worksheet = %self.config.sheets.orders_worksheet,
            variety = %self.config.reconcile.variety,
            "Starting queue poll loop"
        );

        loop {
            match self.reconciler.reconcile().await {
                Ok(stats) => info!(
                    processed = stats.processed,
                    skipped = stats.skipped,
                    invalid = stats.invalid,
                    "Cycle finished"
                ),
                Err(e) => error!(error = %e, "Cycle failed"),
            }

            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Read the venue API credentials from the Info worksheet (B1:B3).
async fn load_credentials(
    sheets: &SheetsClient,
    info_worksheet: &str,
) -> AppResult<StoredCredentials> {
    let range = format!("{info_worksheet}!B1:B3");
    let rows = sheets.get_values(&range).await?;

    let cell = |index: usize| -> Option<String> {
        rows.get(index)
            .and_then(|row| row.first())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let api_key = cell(0).ok_or_else(|| {
        AppError::Credentials(format!("API key missing from {info_worksheet}!B1"))
    })?;
    let api_secret = cell(1).ok_or_else(|| {
        AppError::Credentials(format!("API secret missing from {info_worksheet}!B2"))
    })?;

    Ok(StoredCredentials {
        api_key,
        api_secret,
        access_token: cell(2),
    })
}

/// Establish a venue session, preferring the stored access token.
async fn establish_session(config: &AppConfig, stored: StoredCredentials) -> AppResult<KiteClient> {
    let credentials = Credentials {
        api_key: stored.api_key,
        api_secret: stored.api_secret,
    };

    if let Some(token) = stored.access_token {
        let client = KiteClient::new(
            &config.kite.base_url,
            Session::new(credentials.api_key.clone(), token),
        )?;
        match client.profile().await {
            Ok(profile) => {
                info!(user_id = %profile.user_id, "Stored access token accepted");
                return Ok(client);
            }
            Err(e) => {
                warn!(error = %e, "Stored access token rejected, interactive login required");
            }
        }
    }

    let request_token = prompt_request_token(&config.kite.login_url, &credentials.api_key)?;
    let access_token =
        KiteClient::exchange_request_token(&config.kite.base_url, &credentials, &request_token)
            .await?;

    Ok(KiteClient::new(
        &config.kite.base_url,
        Session::new(credentials.api_key, access_token),
    )?)
}

/// Print the login URL and read the one-time request token from stdin.
fn prompt_request_token(login_base: &str, api_key: &str) -> AppResult<String> {
    println!("Login URL: {}", login_url(login_base, api_key));
    print!("Enter the request_token from the redirect URL: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let token = line.trim().to_string();
    if token.is_empty() {
        return Err(AppError::Credentials(
            "empty request token".to_string(),
        ));
    }
    Ok(token)
}
