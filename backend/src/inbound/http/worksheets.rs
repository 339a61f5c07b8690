//! Worksheet HTTP handlers.
//!
//! ```text
//! GET    /api/v1/worksheets?status=&type=&q=
//! POST   /api/v1/worksheets
//! GET    /api/v1/worksheets/{id}
//! PATCH  /api/v1/worksheets/{id}
//! DELETE /api/v1/worksheets/{id}
//! ```

use actix_web::{HttpResponse, delete, get, http::header, patch, post, web};
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};

use crate::domain::listing::{StatusFilter, TypeFilter, WorksheetFilter};
use crate::domain::ports::{
    CreateWorksheetRequest, ListWorksheetsRequest, ListWorksheetsResponse, UpdateWorksheetRequest,
    WorksheetEdit, WorksheetPayload,
};
use crate::domain::{Error, TaxType, WorksheetDraft, WorksheetId, WorksheetStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_body_error, parse_filter, parse_label, parse_worksheet_id,
};

const STATUS: FieldName = FieldName::new("status");
const TYPE: FieldName = FieldName::new("type");
const ID: FieldName = FieldName::new("id");

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListWorksheetsQuery {
    /// Status label or `all`.
    pub status: Option<String>,
    /// Tax type label or `all`.
    #[serde(rename = "type")]
    pub tax_type: Option<String>,
    /// Case-insensitive substring of client name, type, period or assignee.
    pub q: Option<String>,
}

impl ListWorksheetsQuery {
    fn into_filter(self) -> Result<WorksheetFilter, Error> {
        let status: StatusFilter = parse_filter(self.status.as_deref(), STATUS)?;
        let tax_type: TypeFilter = parse_filter(self.tax_type.as_deref(), TYPE)?;
        Ok(WorksheetFilter {
            status,
            tax_type,
            search: self.q.unwrap_or_default(),
        })
    }
}

/// Request payload for creating a worksheet.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorksheetBody {
    #[serde(default)]
    pub client_name: String,
    /// Tax type label; defaults to `PPh 21`.
    #[serde(rename = "type")]
    pub tax_type: Option<String>,
    #[serde(default)]
    pub period: String,
    /// Status label; defaults to `Draft`.
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub amount: Option<f64>,
    pub notes: Option<String>,
}

impl CreateWorksheetBody {
    fn into_draft(self) -> Result<WorksheetDraft, Error> {
        let tax_type = self
            .tax_type
            .map(|raw| parse_label::<TaxType>(&raw, TYPE))
            .transpose()?
            .unwrap_or_default();
        let status = self
            .status
            .map(|raw| parse_label::<WorksheetStatus>(&raw, STATUS))
            .transpose()?
            .unwrap_or_default();
        Ok(WorksheetDraft {
            client_name: self.client_name,
            tax_type,
            period: self.period,
            status,
            assignee: self.assignee,
            amount: self.amount,
            notes: self.notes,
        })
    }
}

/// Distinguish an absent field from an explicit `null`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request payload for editing a worksheet.
///
/// Omitted fields are left as stored; `null` clears the optional ones.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorksheetBody {
    pub client_name: Option<String>,
    #[serde(rename = "type")]
    pub tax_type: Option<String>,
    pub period: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub assignee: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Option<f64>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl UpdateWorksheetBody {
    fn into_edit(self) -> Result<WorksheetEdit, Error> {
        Ok(WorksheetEdit {
            client_name: self.client_name,
            tax_type: self
                .tax_type
                .map(|raw| parse_label(&raw, TYPE))
                .transpose()?,
            period: self.period,
            status: self
                .status
                .map(|raw| parse_label(&raw, STATUS))
                .transpose()?,
            assignee: self.assignee,
            amount: self.amount,
            notes: self.notes,
        })
    }
}

fn worksheet_location(id: uuid::Uuid) -> String {
    format!("/api/v1/worksheets/{id}")
}

/// List worksheets with overview summaries.
#[utoipa::path(
    get,
    path = "/api/v1/worksheets",
    params(ListWorksheetsQuery),
    responses(
        (status = 200, description = "Filtered worksheets", body = ListWorksheetsResponse),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["worksheets"],
    operation_id = "listWorksheets"
)]
#[get("/worksheets")]
pub async fn list_worksheets(
    state: web::Data<HttpState>,
    query: web::Query<ListWorksheetsQuery>,
) -> ApiResult<web::Json<ListWorksheetsResponse>> {
    let filter = query.into_inner().into_filter()?;
    let response = state
        .worksheets_query
        .list_worksheets(ListWorksheetsRequest { filter })
        .await?;
    Ok(web::Json(response))
}

/// Fetch one worksheet.
#[utoipa::path(
    get,
    path = "/api/v1/worksheets/{id}",
    params(("id" = String, Path, description = "Worksheet UUID")),
    responses(
        (status = 200, description = "Worksheet", body = WorksheetPayload),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Unknown worksheet", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["worksheets"],
    operation_id = "getWorksheet"
)]
#[get("/worksheets/{id}")]
pub async fn get_worksheet(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<WorksheetPayload>> {
    let id: WorksheetId = parse_worksheet_id(&path, ID)?;
    let worksheet = state.worksheets_query.get_worksheet(&id).await?;
    Ok(web::Json(worksheet))
}

/// Create a worksheet.
#[utoipa::path(
    post,
    path = "/api/v1/worksheets",
    request_body = CreateWorksheetBody,
    responses(
        (
            status = 201,
            description = "Created worksheet",
            headers(("Location" = String, description = "URL of the new worksheet")),
            body = WorksheetPayload
        ),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["worksheets"],
    operation_id = "createWorksheet"
)]
#[post("/worksheets")]
pub async fn create_worksheet(
    state: web::Data<HttpState>,
    payload: web::Json<CreateWorksheetBody>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let created = state
        .worksheets
        .create_worksheet(CreateWorksheetRequest { draft })
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, worksheet_location(created.id)))
        .json(created))
}

/// Apply a partial update.
#[utoipa::path(
    patch,
    path = "/api/v1/worksheets/{id}",
    params(("id" = String, Path, description = "Worksheet UUID")),
    request_body = UpdateWorksheetBody,
    responses(
        (status = 200, description = "Updated worksheet", body = WorksheetPayload),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown worksheet", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["worksheets"],
    operation_id = "updateWorksheet"
)]
#[patch("/worksheets/{id}")]
pub async fn update_worksheet(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateWorksheetBody>,
) -> ApiResult<web::Json<WorksheetPayload>> {
    let id = parse_worksheet_id(&path, ID)?;
    let edit = payload.into_inner().into_edit()?;
    let updated = state
        .worksheets
        .update_worksheet(UpdateWorksheetRequest { id, edit })
        .await?;
    Ok(web::Json(updated))
}

/// Delete a worksheet permanently.
#[utoipa::path(
    delete,
    path = "/api/v1/worksheets/{id}",
    params(("id" = String, Path, description = "Worksheet UUID")),
    responses(
        (status = 204, description = "Worksheet deleted"),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Unknown worksheet", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["worksheets"],
    operation_id = "deleteWorksheet"
)]
#[delete("/worksheets/{id}")]
pub async fn delete_worksheet(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_worksheet_id(&path, ID)?;
    state.worksheets.delete_worksheet(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// JSON extractor settings that report malformed bodies as API errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| invalid_body_error(err).into())
}

/// Register every worksheet route on a scope or app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(list_worksheets)
        .service(create_worksheet)
        .service(get_worksheet)
        .service(update_worksheet)
        .service(delete_worksheet);
}

#[cfg(test)]
#[path = "worksheets_tests.rs"]
mod tests;
