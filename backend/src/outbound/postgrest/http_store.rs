//! Reqwest-backed worksheet store over PostgREST.
//!
//! This adapter owns transport details only: query construction, auth
//! headers, timeout and HTTP error mapping, and JSON decoding into domain
//! records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::debug;

use super::dto::{InsertWorksheetDto, WorksheetChangesDto, WorksheetRowDto};
use crate::domain::ports::{WorksheetRepository, WorksheetRepositoryError};
use crate::domain::{NewWorksheet, Worksheet, WorksheetChanges, WorksheetId};

const TABLE_PATH: &str = "rest/v1/worksheets";
const LIST_ORDER: &str = "updated_at.desc,id.desc";

/// Failures building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum PostgrestClientError {
    /// The base URL cannot be extended with the table path.
    #[error("invalid PostgREST base URL: {0}")]
    Url(#[from] url::ParseError),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Worksheet store that issues one REST request per operation.
pub struct PostgrestWorksheetRepository {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl PostgrestWorksheetRepository {
    /// Build an adapter for the project at `base_url`.
    ///
    /// `api_key` is sent both as the `apikey` header and as a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error when the table URL cannot be derived or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: &Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PostgrestClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: table_url(base_url)?,
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: reqwest::Method) -> RequestBuilder {
        self.client
            .request(method, self.endpoint.clone())
            .header("apikey", self.api_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(ACCEPT, "application/json")
    }

    fn writing(&self, method: reqwest::Method) -> RequestBuilder {
        self.request(method).header("Prefer", "return=representation")
    }

    async fn fetch_rows(
        &self,
        request: RequestBuilder,
        id: Option<WorksheetId>,
    ) -> Result<Vec<Worksheet>, WorksheetRepositoryError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref(), id);
            debug!(%status, %error, "worksheet store request failed");
            return Err(error);
        }
        parse_rows(body.as_ref())
    }
}

fn table_url(base_url: &Url) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(TABLE_PATH)
}

fn id_filter(id: &WorksheetId) -> (&'static str, String) {
    ("id", format!("eq.{id}"))
}

fn single_row(
    rows: Vec<Worksheet>,
    id: &WorksheetId,
) -> Result<Worksheet, WorksheetRepositoryError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| WorksheetRepositoryError::not_found(*id))
}

#[async_trait]
impl WorksheetRepository for PostgrestWorksheetRepository {
    async fn list(&self) -> Result<Vec<Worksheet>, WorksheetRepositoryError> {
        let request = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*"), ("order", LIST_ORDER)]);
        self.fetch_rows(request, None).await
    }

    async fn find_by_id(&self, id: &WorksheetId) -> Result<Worksheet, WorksheetRepositoryError> {
        let request = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*".to_owned()), id_filter(id)]);
        let rows = self.fetch_rows(request, Some(*id)).await?;
        single_row(rows, id)
    }

    async fn insert(&self, worksheet: &NewWorksheet) -> Result<Worksheet, WorksheetRepositoryError> {
        let request = self
            .writing(reqwest::Method::POST)
            .json(&InsertWorksheetDto::from(worksheet));
        let rows = self.fetch_rows(request, None).await?;
        rows.into_iter().next().ok_or_else(|| {
            WorksheetRepositoryError::query("insert returned no representation")
        })
    }

    async fn update(
        &self,
        id: &WorksheetId,
        changes: &WorksheetChanges,
    ) -> Result<Worksheet, WorksheetRepositoryError> {
        let request = self
            .writing(reqwest::Method::PATCH)
            .query(&[id_filter(id)])
            .json(&WorksheetChangesDto::from(changes));
        let rows = self.fetch_rows(request, Some(*id)).await?;
        single_row(rows, id)
    }

    async fn delete(&self, id: &WorksheetId) -> Result<(), WorksheetRepositoryError> {
        let request = self
            .writing(reqwest::Method::DELETE)
            .query(&[id_filter(id)]);
        let rows = self.fetch_rows(request, Some(*id)).await?;
        single_row(rows, id).map(drop)
    }
}

fn parse_rows(body: &[u8]) -> Result<Vec<Worksheet>, WorksheetRepositoryError> {
    let rows: Vec<WorksheetRowDto> = serde_json::from_slice(body).map_err(|error| {
        WorksheetRepositoryError::query(format!("invalid worksheet JSON payload: {error}"))
    })?;
    Ok(rows.into_iter().map(Worksheet::from).collect())
}

fn map_transport_error(error: reqwest::Error) -> WorksheetRepositoryError {
    WorksheetRepositoryError::connection(error.to_string())
}

fn map_status_error(
    status: StatusCode,
    body: &[u8],
    id: Option<WorksheetId>,
) -> WorksheetRepositoryError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => WorksheetRepositoryError::not_found(id),
        _ if status.is_client_error() => WorksheetRepositoryError::query(message),
        _ => WorksheetRepositoryError::connection(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
