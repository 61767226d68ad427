use crate::error::{ServerError, ServerResult};
use crate::extract::MultipartForm;
use crate::routes::{required, MessageResponse};
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;
use store::NewFrontRecord;

/// Multipart field carrying the optional document image
pub const IMAGE_FIELD: &str = "image";

struct Upload {
    file_name: String,
    bytes: Bytes,
}

/// Fields collected from the `/saveUserDetails` multipart body.
#[derive(Default)]
struct FrontForm {
    name: Option<String>,
    dob: Option<String>,
    gender: Option<String>,
    adhar_number: Option<String>,
    image: Option<Upload>,
}

impl FrontForm {
    async fn read(multipart: &mut Multipart) -> ServerResult<Self> {
        let mut form = FrontForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                IMAGE_FIELD => {
                    // Only parts carrying a file count as the upload.
                    let Some(file_name) = field.file_name().map(str::to_string) else {
                        tracing::debug!("ignoring image part without a file name");
                        continue;
                    };
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part when no file was chosen.
                    if bytes.is_empty() && file_name.is_empty() {
                        continue;
                    }
                    form.image = Some(Upload { file_name, bytes });
                }
                "name" => form.name = Some(field.text().await?),
                "dob" => form.dob = Some(field.text().await?),
                "gender" => form.gender = Some(field.text().await?),
                "adharNumber" => form.adhar_number = Some(field.text().await?),
                other => tracing::debug!(field = other, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

/// `POST /saveUserDetails`
///
/// Stores the optional image first, then inserts the front row with the
/// image's path (or `null`). A failed insert leaves the image on disk.
pub async fn save_user_details(
    State(state): State<Arc<ServerState>>,
    MultipartForm(mut multipart): MultipartForm,
) -> ServerResult<Json<MessageResponse>> {
    let form = FrontForm::read(&mut multipart).await?;

    let name = required(form.name, "name")?;
    let date_of_birth = required(form.dob, "dob")?;
    let gender = required(form.gender, "gender")?;
    let document_number = required(form.adhar_number, "adharNumber")?;

    let image_path = match form.image {
        Some(upload) => {
            let stored = state
                .files
                .store(IMAGE_FIELD, Some(&upload.file_name), &upload.bytes)
                .await
                .map_err(|e| {
                    metrics::counter!("docintake_store_errors_total", "operation" => "upload")
                        .increment(1);
                    ServerError::SaveFront(e)
                })?;
            Some(stored.path.display().to_string())
        }
        None => None,
    };

    let record = NewFrontRecord {
        name,
        date_of_birth,
        gender,
        document_number,
        image_path,
    };

    let id = state.records.insert_front(&record).await.map_err(|e| {
        metrics::counter!("docintake_store_errors_total", "operation" => "insert_front")
            .increment(1);
        ServerError::SaveFront(e)
    })?;

    metrics::counter!("docintake_front_saved_total").increment(1);
    tracing::info!(id, has_image = record.image_path.is_some(), "User details saved successfully");

    Ok(Json(MessageResponse::new("User details saved successfully")))
}
