use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;

/// An uploaded avatar image: client-supplied filename plus raw bytes.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// The decoded contents of a multipart request: text fields plus the
/// optional `avatar` file part.
pub struct AvatarForm {
    fields: HashMap<String, String>,
    pub avatar: Option<UploadedFile>,
}

impl AvatarForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut fields = HashMap::new();
        let mut avatar = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| ApiError::validation("Malformed form data"))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "avatar" {
                let filename = field.file_name().unwrap_or("avatar").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::validation("Malformed form data"))?;
                avatar = Some(UploadedFile {
                    filename,
                    data: data.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::validation("Malformed form data"))?;
                fields.insert(name, value);
            }
        }

        Ok(Self { fields, avatar })
    }

    /// A non-empty text field; `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}
