//! Decoding of write-endpoint request bodies into `Submission`s.
//!
//! Accepts `application/x-www-form-urlencoded` (checkbox form) and
//! `multipart/form-data` (either form, including the file upload).

use crate::web::error::AppError;
use arsenal_core::service::submission::IMPORT_FILE_FIELD;
use arsenal_core::Submission;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;

/// Reads the whole request body as one submission.
pub async fn decode_submission(request: Request) -> Result<Submission, AppError> {
    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        decode_multipart(multipart).await
    } else {
        let Form(fields) = Form::<Vec<(String, String)>>::from_request(request, &())
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Submission::from_form(fields, None))
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("multipart/form-data"))
}

async fn decode_multipart(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut fields = Vec::new();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMPORT_FILE_FIELD {
            // Browsers send an empty part with no filename when nothing was picked.
            let has_file = field.file_name().is_some_and(|file| !file.is_empty());
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?;
            if has_file {
                upload = Some(bytes.to_vec());
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;
        fields.push((name, value));
    }

    Ok(Submission::from_form(fields, upload))
}
