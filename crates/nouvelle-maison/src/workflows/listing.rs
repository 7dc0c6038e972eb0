use crate::catalog::Fcfa;
use crate::workflows::attachment::Attachment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const MIN_PHOTOS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    House,
    Apartment,
    Villa,
    Land,
}

impl ListingType {
    pub const fn label(self) -> &'static str {
        match self {
            ListingType::House => "Maison",
            ListingType::Apartment => "Appartement",
            ListingType::Villa => "Villa",
            ListingType::Land => "Terrain",
        }
    }
}

/// Seller form. Everything but the documents and photos is free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellSubmission {
    pub title: String,
    pub listing_type: Option<ListingType>,
    pub address: String,
    pub size: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub price: String,
    pub description: String,
    pub ownership_proof: Option<Attachment>,
    pub identity_proof: Option<Attachment>,
    pub photos: Vec<Attachment>,
}

impl SellSubmission {
    pub fn add_photos<I>(&mut self, photos: I)
    where
        I: IntoIterator<Item = Attachment>,
    {
        self.photos.extend(photos);
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<Attachment> {
        (index < self.photos.len()).then(|| self.photos.remove(index))
    }

    pub fn validate(&self) -> Result<(), SellError> {
        let (Some(ownership), Some(identity)) = (&self.ownership_proof, &self.identity_proof)
        else {
            return Err(SellError::MissingDocuments);
        };
        if let Some(document) = [ownership, identity]
            .into_iter()
            .find(|document| !document.is_identity_document())
        {
            return Err(SellError::UnsupportedFile {
                file_name: document.file_name.clone(),
                expected: "PDF, JPG ou PNG",
            });
        }
        if let Some(photo) = self.photos.iter().find(|photo| !photo.is_image()) {
            return Err(SellError::UnsupportedFile {
                file_name: photo.file_name.clone(),
                expected: "une image",
            });
        }
        if self.photos.len() < MIN_PHOTOS {
            return Err(SellError::NotEnoughPhotos {
                required: MIN_PHOTOS,
                found: self.photos.len(),
            });
        }
        Ok(())
    }

    /// Acknowledge a valid submission. Nothing is stored.
    pub fn submit(&self, now: DateTime<Utc>) -> Result<SellReceipt, SellError> {
        self.validate()?;

        let receipt = SellReceipt {
            title: self.title.clone(),
            listing_type: self.listing_type,
            asking_price: Fcfa::parse(&self.price),
            photo_count: self.photos.len(),
            message: "Votre bien a été soumis avec succès ! Notre équipe va examiner votre dossier.",
            submitted_at: now,
        };
        info!(
            title = %receipt.title,
            listing_type = ?receipt.listing_type,
            asking_price = receipt.asking_price.amount(),
            photos = receipt.photo_count,
            "property submitted for review"
        );
        Ok(receipt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellReceipt {
    pub title: String,
    pub listing_type: Option<ListingType>,
    pub asking_price: Fcfa,
    pub photo_count: usize,
    pub message: &'static str,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SellError {
    #[error("Veuillez fournir les documents requis (titre de propriété et pièce d'identité)")]
    MissingDocuments,
    #[error("Veuillez ajouter au moins {required} photos de votre bien")]
    NotEnoughPhotos { required: usize, found: usize },
    #[error("Le fichier '{file_name}' n'est pas accepté ({expected} attendu)")]
    UnsupportedFile {
        file_name: String,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> SellSubmission {
        SellSubmission {
            title: "Villa à Bingerville".to_string(),
            listing_type: Some(ListingType::Villa),
            price: "75 000 000".to_string(),
            ownership_proof: Some(Attachment::new("acd.pdf")),
            identity_proof: Some(Attachment::new("cni.png")),
            photos: vec![
                Attachment::new("facade.jpg"),
                Attachment::new("salon.jpg"),
                Attachment::new("jardin.jpg"),
            ],
            ..SellSubmission::default()
        }
    }

    #[test]
    fn documents_are_checked_before_photos() {
        let mut form = SellSubmission::default();
        assert_eq!(form.validate(), Err(SellError::MissingDocuments));

        form.ownership_proof = Some(Attachment::new("acd.pdf"));
        assert_eq!(form.validate(), Err(SellError::MissingDocuments));

        form.identity_proof = Some(Attachment::new("cni.pdf"));
        let error = form.validate().expect_err("no photos");
        assert_eq!(error, SellError::NotEnoughPhotos { required: 3, found: 0 });
        assert_eq!(error.to_string(), "Veuillez ajouter au moins 3 photos de votre bien");
    }

    #[test]
    fn photos_can_be_added_and_removed() {
        let mut form = submission();
        assert_eq!(
            form.remove_photo(1).map(|photo| photo.file_name),
            Some("salon.jpg".to_string())
        );
        assert_eq!(form.remove_photo(10), None);
        assert!(matches!(
            form.validate(),
            Err(SellError::NotEnoughPhotos { found: 2, .. })
        ));

        form.add_photos([Attachment::new("cuisine.jpg")]);
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn proofs_must_be_pdf_or_common_images() {
        let mut form = submission();
        form.identity_proof = Some(Attachment::new("cni.docx"));
        assert_eq!(
            form.validate(),
            Err(SellError::UnsupportedFile {
                file_name: "cni.docx".to_string(),
                expected: "PDF, JPG ou PNG",
            })
        );

        form.identity_proof = Some(Attachment::new("cni.jpeg"));
        form.ownership_proof = Some(Attachment::new("titre"));
        assert!(matches!(
            form.validate(),
            Err(SellError::UnsupportedFile { file_name, .. }) if file_name == "titre"
        ));
    }

    #[test]
    fn photos_must_be_images() {
        let mut form = submission();
        form.add_photos([Attachment::new("notes.txt")]);
        let error = form.validate().expect_err("text file is not a photo");
        assert_eq!(
            error.to_string(),
            "Le fichier 'notes.txt' n'est pas accepté (une image attendu)"
        );

        form.remove_photo(3);
        form.add_photos([Attachment::new("terrasse.webp")]);
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn valid_submission_is_acknowledged() {
        let receipt = submission().submit(Utc::now()).expect("accepted");
        assert_eq!(receipt.asking_price, Fcfa(75_000_000));
        assert_eq!(receipt.photo_count, 3);
        assert!(receipt.message.starts_with("Votre bien a été soumis"));
    }
}
