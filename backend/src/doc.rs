//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every worksheet endpoint, the health checks and the
//! payload schemas. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::listing::EmptyState;
use crate::domain::ports::{
    ListWorksheetsResponse, PartitionCounts, TypeSummaryPayload, WorksheetPayload,
};
use crate::domain::presentation::{BadgeTone, BadgeVariant, StatusBadge};
use crate::domain::{Error, ErrorCode, TaxType, WorksheetStatus};
use crate::inbound::http::worksheets::{CreateWorksheetBody, UpdateWorksheetBody};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Worksheets API",
        description = "Create, track and review client tax worksheets."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::worksheets::list_worksheets,
        crate::inbound::http::worksheets::get_worksheet,
        crate::inbound::http::worksheets::create_worksheet,
        crate::inbound::http::worksheets::update_worksheet,
        crate::inbound::http::worksheets::delete_worksheet,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        WorksheetPayload,
        ListWorksheetsResponse,
        TypeSummaryPayload,
        PartitionCounts,
        StatusBadge,
        BadgeVariant,
        BadgeTone,
        EmptyState,
        TaxType,
        WorksheetStatus,
        CreateWorksheetBody,
        UpdateWorksheetBody,
        Error,
        ErrorCode
    )),
    tags(
        (name = "worksheets", description = "Tax worksheet records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn schema(name: &str) -> RefOr<Schema> {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        components
            .schemas
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("schema {name} registered"))
    }

    fn assert_has_fields(schema: &RefOr<Schema>, fields: &[&str]) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                for field in fields {
                    assert!(
                        obj.properties.contains_key(*field),
                        "schema should have field '{field}'"
                    );
                }
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_exposes_code_and_message() {
        assert_has_fields(&schema("Error"), &["code", "message"]);
    }

    #[rstest]
    fn worksheet_schema_uses_wire_names() {
        assert_has_fields(
            &schema("WorksheetPayload"),
            &[
                "clientName",
                "type",
                "statusBadge",
                "amountDisplay",
                "updatedAt",
                "createdAtDisplay",
                "updatedAtDisplay",
            ],
        );
    }

    #[rstest]
    #[case("/api/v1/worksheets")]
    #[case("/api/v1/worksheets/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "{path} documented");
    }
}
