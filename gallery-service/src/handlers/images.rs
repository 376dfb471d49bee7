use crate::dtos::{GalleryRecordResponse, GenerateImageRequest, GenerateImageResponse};
use crate::error::{StepFailed, GENERATE_FAILED, LIST_FAILED};
use crate::models::GalleryRecord;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

/// Generate one image for the prompt, archive it, and record it.
///
/// The three remote calls run one after another; the record is only written
/// once generation and upload have both succeeded. If the write itself fails
/// the archived asset stays on the host. A body that cannot be read as
/// `{ prompt }` fails the same way as any other step.
pub async fn generate_image(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Json<GenerateImageResponse>, StepFailed> {
    let Json(payload) = payload.map_err(|e| StepFailed::new(GENERATE_FAILED, e.body_text()))?;
    tracing::info!(prompt_len = payload.prompt.len(), "Image generation started");

    let image = state
        .image_generator
        .generate(&payload.prompt)
        .await
        .map_err(|e| StepFailed::new(GENERATE_FAILED, e))?;

    let asset = state
        .asset_host
        .upload_from_url(&image.url)
        .await
        .map_err(|e| StepFailed::new(GENERATE_FAILED, e))?;

    let prompt = image.revised_prompt.unwrap_or(payload.prompt);
    let record = GalleryRecord::new(prompt, image.url.clone(), asset.public_id);

    state.store.insert(&record).await.map_err(|e| {
        tracing::warn!(
            public_id = %record.public_id,
            "Uploaded asset has no gallery record"
        );
        StepFailed::new(GENERATE_FAILED, e)
    })?;

    tracing::info!(
        record_id = %record.id,
        public_id = %record.public_id,
        "Image generation completed successfully"
    );

    Ok(Json(GenerateImageResponse { url: image.url }))
}

pub async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryRecordResponse>>, StepFailed> {
    let records = state
        .store
        .list()
        .await
        .map_err(|e| StepFailed::new(LIST_FAILED, e))?;

    Ok(Json(
        records
            .into_iter()
            .map(GalleryRecordResponse::from)
            .collect(),
    ))
}
