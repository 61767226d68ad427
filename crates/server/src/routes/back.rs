use crate::error::{ServerError, ServerResult};
use crate::extract::JsonOrForm;
use crate::routes::{required, MessageResponse};
use crate::state::ServerState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use store::NewBackRecord;

/// Body of `/saveBackDetails`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackDetailsRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    /// Document number typed again on the back form
    #[serde(default)]
    pub reenter_adhar: Option<String>,
}

impl BackDetailsRequest {
    fn into_record(self) -> ServerResult<NewBackRecord> {
        Ok(NewBackRecord {
            address: required(self.address, "address")?,
            postal_code: required(self.pincode, "pincode")?,
            document_number_restated: required(self.reenter_adhar, "reenterAdhar")?,
        })
    }
}

/// `POST /saveBackDetails`
pub async fn save_back_details(
    State(state): State<Arc<ServerState>>,
    JsonOrForm(request): JsonOrForm<BackDetailsRequest>,
) -> ServerResult<Json<MessageResponse>> {
    let record = request.into_record()?;

    let id = state.records.insert_back(&record).await.map_err(|e| {
        metrics::counter!("docintake_store_errors_total", "operation" => "insert_back")
            .increment(1);
        ServerError::SaveBack(e)
    })?;

    metrics::counter!("docintake_back_saved_total").increment(1);
    tracing::info!(id, "Back details saved successfully");

    Ok(Json(MessageResponse::new("Back details saved successfully")))
}
