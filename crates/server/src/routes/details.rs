use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store::{BackRecord, FrontRecord};

/// Combined lookup result
///
/// Under the require-both policy neither side is ever `null`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsResponse {
    pub front_details: Option<FrontRecord>,
    pub back_details: Option<BackRecord>,
}

/// `GET /getAadharDetails/{adhar_number}`
///
/// Both halves are fetched concurrently. Only the first row of each is
/// returned when duplicates exist.
pub async fn get_aadhar_details(
    State(state): State<Arc<ServerState>>,
    Path(adhar_number): Path<String>,
) -> ServerResult<Json<DetailsResponse>> {
    let details = state
        .records
        .find_by_document_number(&adhar_number)
        .await
        .map_err(|e| {
            metrics::counter!("docintake_store_errors_total", "operation" => "lookup")
                .increment(1);
            ServerError::Lookup(e)
        })?;

    if !details.satisfies(state.lookup_policy()) {
        metrics::counter!("docintake_lookups_total", "outcome" => "not_found").increment(1);
        return Err(ServerError::DetailsNotFound);
    }

    metrics::counter!("docintake_lookups_total", "outcome" => "found").increment(1);

    Ok(Json(DetailsResponse {
        front_details: details.front,
        back_details: details.back,
    }))
}
