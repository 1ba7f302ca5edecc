use std::path::PathBuf;
use std::time::Duration;

use postdown_medium::config::{IMAGE_CDN, IMAGE_ROOT};

use crate::fetch::FetchSettings;

/// Directory under the output root that receives documents.
pub const BLOG_DIR: &str = "blog";

/// Text of the interstitial page served instead of the article when the
/// source is rate limiting.
pub const CHALLENGE_MARKER: &str = "Just a moment";

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub output_dir: PathBuf,
    /// Pause before every request, pages and images alike
    pub request_delay: Duration,
    pub fetch: FetchSettings,
    pub image_cdn: String,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            request_delay: Duration::from_millis(1000),
            fetch: FetchSettings::default(),
            image_cdn: IMAGE_CDN.to_string(),
        }
    }
}

impl HarvestSettings {
    /// `<out>/blog`
    pub fn blog_dir(&self) -> PathBuf {
        self.output_dir.join(BLOG_DIR)
    }

    /// `<out>/blog/images/<date>`
    pub fn image_dir(&self, asset_dir: &str) -> PathBuf {
        self.output_dir
            .join(IMAGE_ROOT.trim_start_matches('/'))
            .join(asset_dir)
    }
}
