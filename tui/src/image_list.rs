//! Ordered list of product images staged for upload.
//!
//! Entries hold the raw file bytes (validated as a decodable image when
//! added) so the submit path never touches the filesystem. The first entry
//! in final order is the product's primary image by convention; nothing
//! here enforces it, downstream consumers treat it that way.

use std::path::Path;

use dermascan_api::ImageAttachment;

use crate::scroll_state::ScrollState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Display identity, `<file name> #<position>`; recomputed whenever the
    /// list mutates so it always reflects the current position.
    pub label: String,
}

#[derive(Debug, Default)]
pub struct PendingImageList {
    items: Vec<PendingImage>,
    pub state: ScrollState,
}

impl PendingImageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[PendingImage] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read and append one image file. Rejects files that do not decode as a
    /// known image format, with a message suitable for showing to the user.
    pub fn add_file(&mut self, path: &Path) -> Result<(), String> {
        let attachment = read_image_attachment(path)?;
        self.items.push(PendingImage {
            file_name: attachment.file_name,
            bytes: attachment.bytes,
            label: String::new(),
        });
        self.relabel();
        Ok(())
    }

    /// Remove the entry at `idx`; later entries shift down and are
    /// re-identified from their new positions.
    pub fn remove(&mut self, idx: usize) {
        if idx >= self.items.len() {
            return;
        }
        self.items.remove(idx);
        self.relabel();
        self.state.clamp_selection(self.items.len());
    }

    /// Relocate the entry at `from` to position `to` (array move, not a
    /// swap): everything between the two positions shifts by one slot.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from == to || from >= self.items.len() || to >= self.items.len() {
            return;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.relabel();
        self.state.selected_idx = Some(to);
    }

    /// Snapshot of the ordered attachments for a submission.
    pub fn attachments(&self) -> Vec<ImageAttachment> {
        self.items
            .iter()
            .map(|item| ImageAttachment {
                file_name: item.file_name.clone(),
                bytes: item.bytes.clone(),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.state.reset();
    }

    fn relabel(&mut self) {
        for (idx, item) in self.items.iter_mut().enumerate() {
            item.label = format!("{} #{}", item.file_name, idx + 1);
        }
    }

    /// Append an entry without touching the filesystem. Test-only seam used
    /// by list and form tests.
    #[cfg(test)]
    pub(crate) fn push_raw(&mut self, file_name: &str) {
        self.items.push(PendingImage {
            file_name: file_name.to_string(),
            bytes: Vec::new(),
            label: String::new(),
        });
        self.relabel();
    }
}

/// Read a file and verify it decodes as a known image format.
pub fn read_image_attachment(path: &Path) -> Result<ImageAttachment, String> {
    let bytes =
        std::fs::read(path).map_err(|err| format!("could not read {}: {err}", path.display()))?;
    if image::guess_format(&bytes).is_err() {
        return Err(format!("{} is not recognized as an image", path.display()));
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ImageAttachment { file_name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list_of(names: &[&str]) -> PendingImageList {
        let mut list = PendingImageList::new();
        for name in names {
            list.push_raw(name);
        }
        list
    }

    fn names(list: &PendingImageList) -> Vec<&str> {
        list.items()
            .iter()
            .map(|item| item.file_name.as_str())
            .collect()
    }

    #[test]
    fn append_preserves_order_and_positions_labels() {
        let list = list_of(&["front.jpg", "back.jpg", "front.jpg"]);
        assert_eq!(names(&list), vec!["front.jpg", "back.jpg", "front.jpg"]);
        let labels: Vec<&str> = list.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["front.jpg #1", "back.jpg #2", "front.jpg #3"]);
    }

    #[test]
    fn remove_middle_shifts_and_relabels() {
        let mut list = list_of(&["a.png", "b.png", "c.png"]);
        list.remove(1);
        assert_eq!(names(&list), vec!["a.png", "c.png"]);
        let labels: Vec<&str> = list.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["a.png #1", "c.png #2"]);
    }

    #[test]
    fn move_relocates_single_element_preserving_relative_order() {
        let mut list = list_of(&["a", "b", "c", "d", "e"]);
        list.move_item(3, 0);
        assert_eq!(names(&list), vec!["d", "a", "b", "c", "e"]);
        list.move_item(0, 3);
        assert_eq!(names(&list), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn move_out_of_bounds_is_a_no_op() {
        let mut list = list_of(&["a", "b"]);
        list.move_item(0, 5);
        list.move_item(5, 0);
        list.move_item(1, 1);
        assert_eq!(names(&list), vec!["a", "b"]);
    }

    #[test]
    fn add_file_accepts_real_images_and_rejects_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = dir.path().join("swatch.png");
        image::RgbaImage::new(2, 2).save(&png).expect("write png");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "ingredients: water").expect("write txt");

        let mut list = PendingImageList::new();
        assert!(list.add_file(&png).is_ok());
        assert!(list.add_file(&txt).is_err());
        assert!(list.add_file(dir.path().join("missing.png").as_path()).is_err());
        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].label, "swatch.png #1");
    }
}
