//! Photos and documents attached to a project.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::error::{CrmError, Result};
use crate::model::{Document, Project};

/// Stand-in link for documents until uploads have somewhere to go.
pub const DOCUMENT_PLACEHOLDER_URL: &str = "#";

fn image_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Encodes an image as a `data:` URL the UI can render directly.
pub fn photo_data_url(file_name: &str, bytes: &[u8], limit: usize) -> Result<String> {
    if bytes.len() > limit {
        return Err(CrmError::FileTooLarge {
            limit,
            actual: bytes.len(),
        });
    }
    let mime =
        image_mime(file_name).ok_or_else(|| CrmError::UnsupportedImage(file_name.to_string()))?;
    Ok(format!("data:{mime};base64,{}", B64.encode(bytes)))
}

pub fn attach_photo(project: &Project, photo: String) -> Project {
    let mut next = project.clone();
    next.photos.push(photo);
    next
}

pub fn remove_photo(project: &Project, index: usize) -> Project {
    let mut next = project.clone();
    if index < next.photos.len() {
        next.photos.remove(index);
    }
    next
}

pub fn attach_document(project: &Project, name: &str) -> Result<Project> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CrmError::invalid("file", "Selecciona un archivo."));
    }
    let mut next = project.clone();
    next.documentation.push(Document {
        name: name.to_string(),
        url: DOCUMENT_PLACEHOLDER_URL.to_string(),
    });
    Ok(next)
}
