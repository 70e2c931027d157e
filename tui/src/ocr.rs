//! Ingredient-list extraction section shared by the seller upload form and
//! the buyer product-check form.
//!
//! The user points the section at a photo of an ingredient list; the OCR
//! service turns it into text that lands in an editable buffer (the user can
//! also just type the ingredients). Picking a new photo clears any
//! previously extracted text.

use dermascan_api::ImageAttachment;

use crate::forms::TextField;
use crate::image_list::read_image_attachment;

#[derive(Debug)]
pub struct OcrSection {
    pub path: TextField,
    pub ingredients: TextField,
    picked: Option<ImageAttachment>,
    pub processing: bool,
}

impl OcrSection {
    pub fn new() -> Self {
        Self {
            path: TextField::new("Ingredient photo"),
            ingredients: TextField::new("Ingredients"),
            picked: None,
            processing: false,
        }
    }

    pub fn picked_name(&self) -> Option<&str> {
        self.picked.as_ref().map(|image| image.file_name.as_str())
    }

    /// Load the image named in the path field. A fresh photo invalidates any
    /// previously extracted text.
    pub fn pick(&mut self) -> Result<(), String> {
        let raw = self.path.value().trim().to_string();
        if raw.is_empty() {
            return Err("enter the path of an ingredient photo first".to_string());
        }
        let attachment = read_image_attachment(raw.as_ref())?;
        self.picked = Some(attachment);
        self.ingredients.clear();
        Ok(())
    }

    /// The attachment to send for extraction, unless there is nothing to
    /// send or an extraction is already running.
    pub fn extract_request(&self) -> Option<ImageAttachment> {
        if self.processing {
            return None;
        }
        self.picked.clone()
    }

    pub fn on_extracted(&mut self, text: String) {
        self.processing = false;
        self.ingredients.set_value(text);
    }

    pub fn on_extract_failed(&mut self) {
        self.processing = false;
    }

    /// The Clear action: drop the photo and the extracted text.
    pub fn clear_image(&mut self) {
        self.picked = None;
        self.ingredients.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pick_requires_a_path_and_a_real_image() {
        let mut section = OcrSection::new();
        assert!(section.pick().is_err());

        let dir = tempfile::tempdir().expect("tempdir");
        let png = dir.path().join("label.png");
        image::RgbaImage::new(2, 2).save(&png).expect("write png");
        section.path.set_value(png.display().to_string());
        assert!(section.pick().is_ok());
        assert_eq!(section.picked_name(), Some("label.png"));
    }

    #[test]
    fn picking_a_new_photo_clears_extracted_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = dir.path().join("label.png");
        image::RgbaImage::new(2, 2).save(&png).expect("write png");

        let mut section = OcrSection::new();
        section.path.set_value(png.display().to_string());
        section.pick().expect("pick");
        section.on_extracted("aqua, glycerin".to_string());
        assert_eq!(section.ingredients.value(), "aqua, glycerin");

        section.pick().expect("repick");
        assert_eq!(section.ingredients.value(), "");
    }

    #[test]
    fn extract_request_respects_in_flight_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = dir.path().join("label.png");
        image::RgbaImage::new(2, 2).save(&png).expect("write png");

        let mut section = OcrSection::new();
        assert!(section.extract_request().is_none());
        section.path.set_value(png.display().to_string());
        section.pick().expect("pick");
        assert!(section.extract_request().is_some());
        section.processing = true;
        assert!(section.extract_request().is_none());
    }
}
