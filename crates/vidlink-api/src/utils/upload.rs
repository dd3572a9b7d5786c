//! Multipart handling for import uploads

use axum::extract::Multipart;
use std::collections::HashMap;
use vidlink_core::AppError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

/// A parsed multipart form: at most one file plus the plain text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

/// Read a multipart form. Only one field named "file" is accepted; multiple
/// file fields are rejected. A file field without content counts as absent.
pub async fn extract_multipart_upload(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if form.file.is_some() {
                return Err(AppError::BadRequest(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
            let content_type = field.content_type().map(|s| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

            if data.is_empty() && filename.is_empty() {
                continue;
            }
            form.file = Some(UploadedFile {
                data: data.to_vec(),
                filename,
                content_type,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read field: {}", e)))?;
            form.fields.insert(field_name, value);
        }
    }

    Ok(form)
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "Import exceeds maximum size of {} bytes",
            max_size
        )));
    }
    Ok(())
}
