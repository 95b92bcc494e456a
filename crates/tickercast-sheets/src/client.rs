use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;

use tickercast_core::AnalysisRecord;

use crate::error::SheetsError;
use crate::rows::{to_row, HEADER};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Client for a Sheets-v4-style REST surface, authenticated with a bearer
/// token. Use [`SheetsClient::with_base_url`] to point at a mock server in
/// tests.
pub struct SheetsClient {
    client: Client,
    token: String,
    base_url: Url,
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(rename = "spreadsheetId")]
    spreadsheet_id: String,
}

#[derive(Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct AppendResponse {
    #[serde(default)]
    updates: Option<AppendUpdates>,
}

#[derive(Deserialize)]
struct AppendUpdates {
    #[serde(rename = "updatedRows", default)]
    updated_rows: Option<usize>,
}

#[derive(Serialize)]
struct ValueRange<'a> {
    values: &'a [Vec<String>],
}

impl SheetsClient {
    /// Creates a client pointed at the production sheets API.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, SheetsError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the client cannot be constructed, or
    /// [`SheetsError::Api`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SheetsError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url,
        })
    }

    /// Creates a new spreadsheet titled `title` holding the header row plus
    /// all `records`, and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the create call or the row write fails.
    pub async fn create_with_rows(
        &self,
        title: &str,
        records: &[AnalysisRecord],
    ) -> Result<String, SheetsError> {
        let url = self.api_url("v4/spreadsheets")?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({"properties": {"title": title}}))
            .send()
            .await?;
        let created: CreateResponse = Self::read_json(response, "create spreadsheet").await?;

        let mut values: Vec<Vec<String>> =
            vec![HEADER.iter().map(ToString::to_string).collect()];
        values.extend(records.iter().map(to_row));

        let range = format!("A1:D{}", values.len());
        let url = self.api_url(&format!(
            "v4/spreadsheets/{}/values/{range}",
            created.spreadsheet_id
        ))?;
        let response = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&ValueRange { values: &values })
            .send()
            .await?;
        Self::check_status(&response, "write rows")?;

        tracing::info!(
            spreadsheet_id = %created.spreadsheet_id,
            rows = records.len(),
            "created spreadsheet with analysis rows"
        );
        Ok(created.spreadsheet_id)
    }

    /// Appends `records` to an existing spreadsheet, writing or repairing the
    /// header row first. Returns the number of data rows appended; an empty
    /// record set appends nothing and returns 0.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the header check/write or the append fails.
    pub async fn append_rows(
        &self,
        spreadsheet_id: &str,
        records: &[AnalysisRecord],
    ) -> Result<usize, SheetsError> {
        self.ensure_header(spreadsheet_id).await?;
        if records.is_empty() {
            return Ok(0);
        }

        let values: Vec<Vec<String>> = records.iter().map(to_row).collect();
        let url = self.api_url(&format!(
            "v4/spreadsheets/{spreadsheet_id}/values/A1:D1:append"
        ))?;
        let response = self
            .client
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&ValueRange { values: &values })
            .send()
            .await?;
        let appended: AppendResponse = Self::read_json(response, "append rows").await?;

        Ok(appended
            .updates
            .and_then(|u| u.updated_rows)
            .unwrap_or(records.len()))
    }

    /// Reads `A1:D1` and (re)writes the header when it is absent or differs
    /// from the expected columns.
    async fn ensure_header(&self, spreadsheet_id: &str) -> Result<(), SheetsError> {
        let url = self.api_url(&format!("v4/spreadsheets/{spreadsheet_id}/values/A1:D1"))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let existing: ValuesResponse = Self::read_json(response, "read header").await?;

        let header_ok = existing
            .values
            .first()
            .is_some_and(|row| row.iter().map(String::as_str).eq(HEADER));
        if header_ok {
            return Ok(());
        }

        let header: Vec<Vec<String>> = vec![HEADER.iter().map(ToString::to_string).collect()];
        let url = self.api_url(&format!("v4/spreadsheets/{spreadsheet_id}/values/A1:D1"))?;
        let response = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&ValueRange { values: &header })
            .send()
            .await?;
        Self::check_status(&response, "write header")
    }

    fn api_url(&self, path: &str) -> Result<Url, SheetsError> {
        self.base_url
            .join(path)
            .map_err(|e| SheetsError::Api(format!("invalid sheets URL '{path}': {e}")))
    }

    fn check_status(response: &reqwest::Response, context: &str) -> Result<(), SheetsError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SheetsError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_owned(),
            })
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, SheetsError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SheetsError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_owned(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
