//! Extraction state and the image task queue, both scoped to one conversion.

use chrono::NaiveDate;

use crate::config::{ConvertConfig, COVER_RESIZE};
use crate::srcset::ImageSource;

/// Metadata captured as a side effect of the walk.
///
/// Every field is write-once: the first non-blank value wins and later
/// attempts are ignored. Setters report whether they took effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionState {
    title: Option<String>,
    author: Option<String>,
    publish_date: Option<NaiveDate>,
    cover_image: Option<String>,
}

fn fill(slot: &mut Option<String>, value: &str) -> bool {
    let value = value.trim();
    if slot.is_some() || value.is_empty() {
        return false;
    }
    *slot = Some(value.to_string());
    true
}

impl ExtractionState {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn publish_date(&self) -> Option<NaiveDate> {
        self.publish_date
    }

    /// Local file name of the cover thumbnail
    pub fn cover_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    pub fn set_title(&mut self, title: &str) -> bool {
        fill(&mut self.title, title)
    }

    pub fn set_author(&mut self, author: &str) -> bool {
        fill(&mut self.author, author)
    }

    pub fn set_cover_image(&mut self, filename: &str) -> bool {
        fill(&mut self.cover_image, filename)
    }

    pub fn set_publish_date(&mut self, date: NaiveDate) -> bool {
        if self.publish_date.is_some() {
            return false;
        }
        self.publish_date = Some(date);
        true
    }
}

/// Which transcoding of a source image a task fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    /// Original resolution, AVIF, referenced from the body
    Original,
    /// Resized PNG thumbnail, referenced from the frontmatter
    Cover,
}

/// A deferred download: where to fetch from and what to call it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub remote_url: String,
    pub local_filename: String,
    pub variant: ImageVariant,
}

impl ImageTask {
    pub fn original(config: &ConvertConfig, source: &ImageSource) -> Self {
        Self {
            remote_url: format!("{}/format:avif/{}", config.image_cdn, source.name),
            local_filename: source.original_file(),
            variant: ImageVariant::Original,
        }
    }

    pub fn cover(config: &ConvertConfig, source: &ImageSource) -> Self {
        Self {
            remote_url: format!("{}/format:png/{COVER_RESIZE}/{}", config.image_cdn, source.name),
            local_filename: source.cover_file(),
            variant: ImageVariant::Cover,
        }
    }
}

/// Append-only queue of image tasks, consumed once in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageQueue {
    tasks: Vec<ImageTask>,
}

impl ImageQueue {
    pub fn push(&mut self, task: ImageTask) {
        self.tasks.push(task);
    }

    pub fn tasks(&self) -> &[ImageTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn into_tasks(self) -> Vec<ImageTask> {
        self.tasks
    }
}

/// Traversal context threaded through the article rules.
#[derive(Debug, Default)]
pub struct ArticleContext {
    pub state: ExtractionState,
    pub images: ImageQueue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_write_once() {
        let mut state = ExtractionState::default();
        assert!(state.set_title("First"));
        assert!(!state.set_title("Second"));
        assert_eq!(state.title(), Some("First"));

        let first = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let second = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        assert!(state.set_publish_date(first));
        assert!(!state.set_publish_date(second));
        assert_eq!(state.publish_date(), Some(first));
    }

    #[test]
    fn blank_values_leave_the_slot_open() {
        let mut state = ExtractionState::default();
        assert!(!state.set_author("   "));
        assert_eq!(state.author(), None);
        assert!(state.set_author("  Nx Devtools Team "));
        assert_eq!(state.author(), Some("Nx Devtools Team"));
    }

    #[test]
    fn image_tasks_use_the_configured_cdn() {
        let config = ConvertConfig::new("https://blog.nrwl.io/post-1a2b");
        let source = ImageSource::from_srcset("https://miro.medium.com/v2/resize:fit:640/1*Xy9.png 640w").unwrap();

        let original = ImageTask::original(&config, &source);
        assert_eq!(original.remote_url, "https://miro.medium.com/v2/format:avif/1*Xy9.png");
        assert_eq!(original.local_filename, "Xy9.avif");

        let cover = ImageTask::cover(&config, &source);
        assert_eq!(
            cover.remote_url,
            "https://miro.medium.com/v2/format:png/resize:fit:1200/1*Xy9.png"
        );
        assert_eq!(cover.local_filename, "Xy9.png");
        assert_eq!(cover.variant, ImageVariant::Cover);
    }

    #[test]
    fn queue_preserves_insertion_order() {
        let mut queue = ImageQueue::default();
        for name in ["a", "b", "c"] {
            queue.push(ImageTask {
                remote_url: format!("https://cdn/{name}"),
                local_filename: format!("{name}.avif"),
                variant: ImageVariant::Original,
            });
        }
        let names: Vec<_> = queue.tasks().iter().map(|t| t.local_filename.as_str()).collect();
        assert_eq!(names, ["a.avif", "b.avif", "c.avif"]);
        assert_eq!(queue.into_tasks().len(), 3);
    }
}
