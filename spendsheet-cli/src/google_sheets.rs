use anyhow::{Context, Result, bail};
use google_sheets4::Sheets;
use google_sheets4::api::{ClearValuesRequest, ValueRange};
use hyper::client::HttpConnector;
use hyper_rustls::HttpsConnector;
use serde::{Deserialize, Serialize};
use spendsheet_finance::publish::SHEET_HEADER;
use spendsheet_finance::{PublishRow, Publisher, cell_count};
use std::fs;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::state::ensure_home;

// Use the oauth2 version re-exported by google-sheets4 to avoid version mismatches.
use google_sheets4::oauth2;

type Hub = Sheets<HttpsConnector<HttpConnector>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleOAuthClient {
    pub client_id: String,
    pub client_secret: String,
    /// Defaults to https://accounts.google.com/o/oauth2/auth
    pub auth_uri: Option<String>,
    /// Defaults to https://oauth2.googleapis.com/token
    pub token_uri: Option<String>,
    /// Defaults to ["http://localhost"]
    pub redirect_uris: Option<Vec<String>>,
}

fn oauth_client_path() -> Result<PathBuf> {
    Ok(ensure_home()?.join("google_oauth.json"))
}

fn token_cache_path() -> Result<PathBuf> {
    Ok(ensure_home()?.join("google_token_cache.json"))
}

pub fn save_oauth_client(client: &GoogleOAuthClient) -> Result<()> {
    let p = oauth_client_path()?;
    fs::write(&p, serde_json::to_string_pretty(client)?)
        .with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn load_oauth_client() -> Result<GoogleOAuthClient> {
    let p = oauth_client_path()?;
    if !p.exists() {
        bail!(
            "Missing Google OAuth client config at {}. Run: spendsheet sheets connect",
            p.display()
        );
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

/// Interactive connect:
/// - user pastes client_id/client_secret from Google Cloud Console (Desktop app)
/// - we run the OAuth installed-app flow
/// - tokens are cached under the spendsheet home
pub fn connect_interactive() -> Result<()> {
    println!("Google Sheets connect\n");
    println!("You need to create OAuth credentials once:\n");
    println!("1) Go to: https://console.cloud.google.com/apis/credentials");
    println!("2) Create credentials > OAuth client ID");
    println!("3) Application type: Desktop app");
    println!("4) Enable the Google Sheets API for the project");
    println!("5) Copy client_id + client_secret\n");

    let client_id = prompt("Paste client_id")?;
    let client_secret = prompt("Paste client_secret")?;

    if !client_id.contains('.') || client_secret.len() < 10 {
        bail!("client_id/client_secret didn't look valid");
    }

    let client = GoogleOAuthClient {
        client_id,
        client_secret,
        auth_uri: Some("https://accounts.google.com/o/oauth2/auth".to_string()),
        token_uri: Some("https://oauth2.googleapis.com/token".to_string()),
        redirect_uris: Some(vec!["http://localhost".to_string()]),
    };
    save_oauth_client(&client)?;

    let runtime = Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(hub_from_client(&client))?;

    println!("\nConnected. Tokens cached at: {}", token_cache_path()?.display());
    Ok(())
}

async fn hub_from_client(client: &GoogleOAuthClient) -> Result<Hub> {
    // yup-oauth2 expects the same structure as Google "installed" client secrets.
    let installed = oauth2::ApplicationSecret {
        client_id: client.client_id.clone(),
        client_secret: client.client_secret.clone(),
        auth_uri: client
            .auth_uri
            .clone()
            .unwrap_or_else(|| "https://accounts.google.com/o/oauth2/auth".to_string()),
        token_uri: client
            .token_uri
            .clone()
            .unwrap_or_else(|| "https://oauth2.googleapis.com/token".to_string()),
        redirect_uris: client
            .redirect_uris
            .clone()
            .unwrap_or_else(|| vec!["http://localhost".to_string()]),
        ..Default::default()
    };

    let auth = oauth2::InstalledFlowAuthenticator::builder(
        installed,
        oauth2::InstalledFlowReturnMethod::HTTPRedirect,
    )
    .persist_tokens_to_disk(token_cache_path()?)
    .build()
    .await
    .context("building oauth authenticator")?;

    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Ok(Sheets::new(hyper::Client::builder().build(connector), auth))
}

fn prompt(label: &str) -> Result<String> {
    use std::io::{self, Write};
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Header plus rows as sheet values.
fn sheet_values(rows: &[PublishRow]) -> Vec<Vec<serde_json::Value>> {
    let header = SHEET_HEADER.iter().map(|h| serde_json::Value::from(*h)).collect();
    std::iter::once(header)
        .chain(rows.iter().map(|row| {
            row.cells()
                .into_iter()
                .map(serde_json::Value::from)
                .collect()
        }))
        .collect()
}

/// Overwrites one tab per sheet in a Google Sheets workbook.
///
/// `destination` is the spreadsheet id. The publisher trait is synchronous, so
/// calls are driven on a runtime owned by the publisher.
pub struct SheetsPublisher {
    runtime: Runtime,
    hub: Hub,
}

impl SheetsPublisher {
    pub fn connect() -> Result<Self> {
        let client = load_oauth_client()?;
        let runtime = Runtime::new().context("starting tokio runtime")?;
        let hub = runtime.block_on(hub_from_client(&client))?;
        Ok(Self { runtime, hub })
    }
}

impl Publisher for SheetsPublisher {
    fn publish(&mut self, sheet: &str, destination: &str, rows: &[PublishRow]) -> anyhow::Result<usize> {
        let hub = &self.hub;
        self.runtime.block_on(async {
            hub.spreadsheets()
                .values_clear(ClearValuesRequest::default(), destination, &format!("{sheet}!A:C"))
                .doit()
                .await
                .with_context(|| format!("clearing {sheet}"))?;

            let body = ValueRange {
                values: Some(sheet_values(rows)),
                ..Default::default()
            };
            let (_, response) = hub
                .spreadsheets()
                .values_update(body, destination, &format!("{sheet}!A1"))
                .value_input_option("USER_ENTERED")
                .doit()
                .await
                .with_context(|| format!("updating {sheet}"))?;

            let reported = response.updated_cells.map(|n| n as usize);
            debug!(sheet, ?reported, "sheet updated");
            Ok::<_, anyhow::Error>(reported.unwrap_or_else(|| cell_count(rows.len())))
        })
    }
}
