use mime::Mime;
use serde::{Deserialize, Serialize};

/// A file picked in a form. Only the name travels; contents never leave the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Media type guessed from the file extension.
    pub fn media_type(&self) -> Option<Mime> {
        mime_guess::from_path(&self.file_name).first()
    }

    /// Identity documents are accepted as PDF, JPEG or PNG.
    pub fn is_identity_document(&self) -> bool {
        self.media_type().is_some_and(|media| {
            media == mime::APPLICATION_PDF || media == mime::IMAGE_JPEG || media == mime::IMAGE_PNG
        })
    }

    pub fn is_image(&self) -> bool {
        self.media_type()
            .is_some_and(|media| media.type_() == mime::IMAGE)
    }
}
