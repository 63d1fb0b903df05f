use crate::{
    application::process_batch::dto::{
        BatchMode, BatchOutcome, BatchPolicy, BatchReport, FileFailure, ProcessBatchRequest,
    },
    domain::face::entity::{DetectionRecord, FaceEncoding, UploadedFile},
    presentation::http::{
        errors::{AppError, DETECT_FAILURE_MESSAGE, ENCODE_FAILURE_MESSAGE},
        state::AppState,
    },
};
use axum::{
    Json,
    extract::{
        Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
};
use serde::{Deserialize, Serialize};

/// Multipart field names that carry images. `file` is the single-file form.
const FILE_FIELDS: [&str; 2] = ["files", "file"];

const INVALID_MULTIPART_MESSAGE: &str = "Invalid multipart payload.";
const INVALID_QUERY_MESSAGE: &str = "Invalid query string.";

#[derive(Debug, Default, Deserialize)]
pub struct BatchQuery {
    #[serde(default)]
    pub collect_errors: bool,
}

impl BatchQuery {
    fn extract(query: Result<Query<Self>, QueryRejection>) -> Result<Self, AppError> {
        query.map(|Query(query)| query).map_err(|e| {
            tracing::debug!(query_error = %e);
            AppError::BadRequest(INVALID_QUERY_MESSAGE.into())
        })
    }

    fn policy(&self) -> BatchPolicy {
        if self.collect_errors {
            BatchPolicy::CollectErrors
        } else {
            BatchPolicy::FailFast
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetectFaceResponse {
    pub success_list: Vec<DetectionRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_list: Option<Vec<FileFailure>>,
}

#[derive(Debug, Serialize)]
pub struct EncodeFaceResponse {
    pub encoding: Vec<FaceEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_list: Option<Vec<FileFailure>>,
}

async fn read_files(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<UploadedFile>, AppError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(multipart_error = %e);
        AppError::BadRequest(INVALID_MULTIPART_MESSAGE.into())
    })?;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!(multipart_error = %e);
        AppError::BadRequest(INVALID_MULTIPART_MESSAGE.into())
    })? {
        if !FILE_FIELDS.contains(&field.name().unwrap_or("")) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            tracing::debug!(multipart_error = %e);
            AppError::BadRequest(INVALID_MULTIPART_MESSAGE.into())
        })?;

        files.push(UploadedFile::new(filename, content_type, data));
    }

    Ok(files)
}

async fn run_batch(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    mode: BatchMode,
    policy: BatchPolicy,
    failure_message: &'static str,
) -> Result<BatchReport, AppError> {
    let files = read_files(multipart).await?;
    tracing::info!(files = files.len(), ?mode, ?policy, "face batch received");

    state
        .pipeline
        .execute(ProcessBatchRequest {
            files,
            mode,
            policy,
        })
        .await
        .map_err(|e| AppError::from_batch(e, failure_message))
}

fn failed_list(policy: BatchPolicy, failures: Vec<FileFailure>) -> Option<Vec<FileFailure>> {
    match policy {
        BatchPolicy::CollectErrors => Some(failures),
        BatchPolicy::FailFast => None,
    }
}

pub async fn detect_face(
    State(state): State<AppState>,
    query: Result<Query<BatchQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectFaceResponse>, AppError> {
    let policy = BatchQuery::extract(query)?.policy();
    let report = run_batch(
        &state,
        multipart,
        BatchMode::Detect,
        policy,
        DETECT_FAILURE_MESSAGE,
    )
    .await?;

    let success_list = match report.outcome {
        BatchOutcome::Detections(records) => records,
        BatchOutcome::Encodings(_) => Vec::new(),
    };

    Ok(Json(DetectFaceResponse {
        success_list,
        failed_list: failed_list(policy, report.failures),
    }))
}

pub async fn encode_face(
    State(state): State<AppState>,
    query: Result<Query<BatchQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EncodeFaceResponse>, AppError> {
    let policy = BatchQuery::extract(query)?.policy();
    let report = run_batch(
        &state,
        multipart,
        BatchMode::Encode,
        policy,
        ENCODE_FAILURE_MESSAGE,
    )
    .await?;

    let encoding = match report.outcome {
        BatchOutcome::Encodings(encodings) => encodings,
        BatchOutcome::Detections(_) => Vec::new(),
    };

    Ok(Json(EncodeFaceResponse {
        encoding,
        failed_list: failed_list(policy, report.failures),
    }))
}
