use std::str::FromStr;

use axum::extract::Multipart;
use skimmer_core::SummaryStyle;

/// An uploaded PDF with its metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed form fields from the multipart upload.
pub struct FormFields {
    pub file: UploadedFile,
    pub style: SummaryStyle,
    /// Per-request key overriding the server's environment key.
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// Parse a multipart form upload into structured form fields.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, String> {
    let mut file: Option<UploadedFile> = None;
    let mut style = SummaryStyle::Brief;
    let mut api_key: Option<String> = None;
    let mut model: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();

                validate_pdf(&data)?;

                file = Some(UploadedFile { filename, data });
            }
            "style" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read style: {}", e))?;
                style = SummaryStyle::from_str(&val).map_err(|e| e.to_string())?;
            }
            "api_key" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read api_key: {}", e))?;
                if !val.is_empty() {
                    api_key = Some(val);
                }
            }
            "model" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read model: {}", e))?;
                if !val.is_empty() {
                    model = Some(val);
                }
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let file = file.ok_or("No file uploaded")?;

    Ok(FormFields {
        file,
        style,
        api_key,
        model,
    })
}

/// Check the PDF magic bytes; the filename extension is not trusted.
fn validate_pdf(data: &[u8]) -> Result<(), String> {
    if data.is_empty() {
        return Err("Uploaded file is empty".to_string());
    }
    if !data.starts_with(b"%PDF-") {
        return Err("File does not appear to be a valid PDF".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_pdf_magic_bytes() {
        assert!(validate_pdf(b"%PDF-1.4\n...").is_ok());
    }

    #[test]
    fn rejects_non_pdf_data() {
        let err = validate_pdf(b"PK\x03\x04zipfile").unwrap_err();
        assert!(err.contains("valid PDF"));
    }

    #[test]
    fn rejects_empty_upload() {
        let err = validate_pdf(b"").unwrap_err();
        assert!(err.contains("empty"));
    }

    #[test]
    fn rejects_html_masquerading_as_pdf() {
        assert!(validate_pdf(b"<html><body>PDF</body></html>").is_err());
    }
}
