use serde::{Deserialize, Serialize};

use crate::encode::png::ExportedImage;

/// Publication state of a planned post.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Created, not yet scheduled.
    #[default]
    Draft,
    /// Has a publication date.
    Scheduled,
    /// Already posted.
    Published,
}

/// One planned post as stored by a content planner.
///
/// Serialized with camelCase keys so records interchange with planner front ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Caller-chosen identifier.
    pub id: String,
    /// Text the caption was generated from.
    pub original_content: String,
    /// Caption text.
    pub generated_caption: String,
    /// Generated illustration before compositing, as a data URL.
    #[serde(default)]
    pub source_image: Option<String>,
    /// Composited image, as a data URL.
    #[serde(default)]
    pub final_image: Option<String>,
    /// Publication state.
    #[serde(default)]
    pub status: PostStatus,
    /// Planned publication date; empty when unscheduled.
    #[serde(default)]
    pub scheduled_date: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl PostRecord {
    /// New draft whose final image is the PNG data URL of `exported`.
    pub fn draft(
        id: impl Into<String>,
        original_content: impl Into<String>,
        generated_caption: impl Into<String>,
        source_image: Option<String>,
        exported: &ExportedImage,
        timestamp: u64,
    ) -> Self {
        Self {
            id: id.into(),
            original_content: original_content.into(),
            generated_caption: generated_caption.into(),
            source_image,
            final_image: Some(exported.to_data_url()),
            status: PostStatus::Draft,
            scheduled_date: String::new(),
            timestamp,
        }
    }

    /// Set the publication date and move to [`PostStatus::Scheduled`].
    pub fn schedule(&mut self, date: impl Into<String>) {
        self.scheduled_date = date.into();
        self.status = PostStatus::Scheduled;
    }

    /// Move to [`PostStatus::Published`].
    pub fn mark_published(&mut self) {
        self.status = PostStatus::Published;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/post.rs"]
mod tests;
