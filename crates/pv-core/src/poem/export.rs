//! Plain-text export artifacts ("downloads").

use super::SavedPoem;

/// A rendered text file ready to be handed to an export sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemExport {
    pub file_name: String,
    pub content: String,
}

impl PoemExport {
    /// Export of the poem currently shown for a freshly uploaded image.
    ///
    /// Header is `Image: <name>`, the file is `<base>_poem.txt` where base is
    /// everything before the first `.` of the image name.
    pub fn for_upload(image_name: &str, poem_text: &str) -> Self {
        let base = image_name.split('.').next().unwrap_or_default();
        let base = if base.is_empty() { "photo" } else { base };
        Self {
            file_name: format!("{base}_poem.txt"),
            content: render(&format!("Image: {image_name}"), poem_text),
        }
    }

    /// Export of a record from the saved collection, keyed by its save date.
    pub fn for_saved(poem: &SavedPoem) -> Self {
        let date = poem.created_at.format("%Y-%m-%d");
        Self {
            file_name: format!("poem_{date}.txt"),
            content: render(&format!("Poem generated on: {date}"), &poem.poem_text),
        }
    }
}

fn render(header: &str, poem_text: &str) -> String {
    format!("{header}\n\n{poem_text}")
}
