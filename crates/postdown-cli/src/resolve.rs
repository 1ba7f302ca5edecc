//! Image task resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use postdown_medium::ImageTask;
use thiserror::Error;

use crate::fetch::{FetchError, Fetcher};
use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum ImageResolutionError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("write failed: {0}")]
    Persist(#[from] PersistError),
}

/// Result of one image task.
#[derive(Debug)]
pub struct ImageOutcome {
    pub task: ImageTask,
    pub result: Result<PathBuf, ImageResolutionError>,
}

impl ImageOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Pause between consecutive requests to the same host
pub(crate) async fn throttle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Download every task into `dir`, in order, one request per task.
///
/// A failed task is logged and reported; the remaining tasks still run.
pub async fn resolve_images(
    fetcher: &dyn Fetcher,
    tasks: &[ImageTask],
    dir: &Path,
    delay: Duration,
) -> Vec<ImageOutcome> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let mut outcomes = Vec::with_capacity(tasks.len());

    for task in tasks {
        throttle(delay).await;
        let result = resolve_one(fetcher, &writer, task).await;
        match &result {
            Ok(path) => info!("saved {} -> {}", task.remote_url, path.display()),
            Err(err) => warn!("image {} failed: {err}", task.remote_url),
        }
        outcomes.push(ImageOutcome {
            task: task.clone(),
            result,
        });
    }

    outcomes
}

async fn resolve_one(
    fetcher: &dyn Fetcher,
    writer: &AtomicFileWriter,
    task: &ImageTask,
) -> Result<PathBuf, ImageResolutionError> {
    let output = fetcher.fetch(&task.remote_url).await?;
    Ok(writer.write_bytes(&task.local_filename, &output.bytes)?)
}
