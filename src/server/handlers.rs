use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::error::ApiError;
use super::job::{run_job, UploadedFile};
use super::storage::{JobStore, StoredReport};
use super::AppState;

pub const MAX_DATA_FILES: usize = 20;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const X_JOB_ID: &str = "x-job-id";
const X_REPORT: &str = "x-report";

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn root(State(state): State<Arc<AppState>>) -> Response {
    if state.web_enabled {
        Redirect::temporary("/web/index.html").into_response()
    } else {
        "Gradesheet merge service is running".into_response()
    }
}

/// Fields of a `/process` upload
#[derive(Debug, Default)]
struct ProcessForm {
    teacher_fullname: Option<String>,
    template: Option<UploadedFile>,
    data_files: Vec<UploadedFile>,
}

async fn read_form(mut multipart: Multipart) -> Result<ProcessForm, ApiError> {
    let mut form = ProcessForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "teacher_fullname" => {
                form.teacher_fullname = Some(field.text().await?);
            }
            "template_file" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                form.template = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "data_files" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                // browsers send an empty part when no file was picked
                if bytes.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
                    continue;
                }
                form.data_files.push(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown upload field");
            }
        }
    }

    Ok(form)
}

pub fn validate_data_file_count(count: usize) -> Result<(), ApiError> {
    if count == 0 {
        return Err(ApiError::bad_request("At least one data file is required."));
    }
    if count > MAX_DATA_FILES {
        return Err(ApiError::bad_request(format!(
            "Max {} data files allowed.",
            MAX_DATA_FILES
        )));
    }
    Ok(())
}

pub async fn process_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_form(multipart).await?;

    let teacher = form
        .teacher_fullname
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Teacher full name is required."))?;
    let template = form
        .template
        .filter(|t| !t.bytes.is_empty())
        .ok_or_else(|| ApiError::bad_request("Template file is required."))?;
    validate_data_file_count(form.data_files.len())?;

    let job_id = JobStore::new_job_id();
    tracing::info!(
        job_id = %job_id,
        data_files = form.data_files.len(),
        "Processing upload"
    );

    let store = &state.store;
    store.save_template(&job_id, &template.bytes).await?;
    for (i, file) in form.data_files.iter().enumerate() {
        store
            .save_data_file(&job_id, i + 1, file.file_name.as_deref(), &file.bytes)
            .await?;
    }

    let data_files = form.data_files;
    let outcome = tokio::task::spawn_blocking(move || {
        run_job(&template.bytes, &data_files, &teacher)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Merge task failed: {}", e)))??;

    let filename = result_filename(&outcome.report.teacher_short);
    store.save_result(&job_id, &filename, &outcome.bytes).await?;

    let report_header = ascii_json(&outcome.report)?;
    store
        .save_report(&StoredReport {
            job_id: job_id.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            result_file: filename.clone(),
            result_checksum: outcome.checksum,
            report: outcome.report,
        })
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE));
    headers.insert(header::CONTENT_DISPOSITION, header_value(content_disposition(&filename))?);
    headers.insert(HeaderName::from_static(X_JOB_ID), header_value(job_id)?);
    headers.insert(HeaderName::from_static(X_REPORT), header_value(report_header)?);

    Ok((headers, outcome.bytes).into_response())
}

pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.store.load_report(&job_id).await? {
        Some(report) => Ok(Json(report)),
        None => Err(ApiError::not_found("Report not found")),
    }
}

fn header_value(value: String) -> Result<HeaderValue, ApiError> {
    HeaderValue::try_from(value).map_err(|e| ApiError::internal(format!("Invalid header value: {}", e)))
}

/// Download name for a merged workbook, derived from the short teacher name
pub fn result_filename(teacher_short: &str) -> String {
    let kept: String = teacher_short
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .collect();
    let stem = kept.trim().replace(' ', "_");

    if stem.is_empty() {
        "result.xlsx".to_string()
    } else {
        format!("{}.xlsx", stem)
    }
}

/// `attachment` disposition with an ASCII fallback name and the full UTF-8
/// name in `filename*`
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() && c != '"' && c != '\\' { c } else { '_' })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

/// JSON with every non-ASCII character written as a `\uXXXX` escape
pub fn ascii_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    let json = serde_json::to_string(value)
        .map_err(|e| ApiError::internal(format!("Failed to encode report: {}", e)))?;

    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(out)
}
