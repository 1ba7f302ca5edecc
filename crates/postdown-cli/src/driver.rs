//! Source processing: fetch, convert, download images, write the document.

use std::path::PathBuf;

use log::{info, warn};
use postdown_medium::{canonical_source, ArticleConverter, ConvertConfig};

use crate::fetch::Fetcher;
use crate::persist::AtomicFileWriter;
use crate::resolve::{resolve_images, throttle, ImageOutcome};
use crate::settings::{HarvestSettings, CHALLENGE_MARKER};
use crate::HarvestError;

/// What a successful source produced.
#[derive(Debug)]
pub struct HarvestSummary {
    pub document: PathBuf,
    pub images: Vec<ImageOutcome>,
    /// Nodes that were dropped because their rule failed
    pub warnings: usize,
}

impl HarvestSummary {
    pub fn failed_images(&self) -> usize {
        self.images.iter().filter(|image| !image.is_ok()).count()
    }
}

#[derive(Debug)]
pub struct SourceReport {
    pub source_url: String,
    pub outcome: Result<HarvestSummary, HarvestError>,
}

pub struct Harvester<F> {
    fetcher: F,
    settings: HarvestSettings,
}

impl<F: Fetcher> Harvester<F> {
    pub fn new(fetcher: F, settings: HarvestSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    /// Process sources one after another. A failed source is reported and
    /// skipped; it never stops the rest.
    pub async fn run(&self, sources: &[String]) -> Vec<SourceReport> {
        let mut reports = Vec::with_capacity(sources.len());
        for source in sources {
            let source_url = canonical_source(source).to_string();
            let outcome = self.harvest(&source_url).await;
            if let Err(err) = &outcome {
                warn!("skipping {source_url}: {err}");
            }
            reports.push(SourceReport {
                source_url,
                outcome,
            });
        }
        reports
    }

    /// Convert one article and write it with its images. Nothing is written
    /// unless the article converts and assembles.
    pub async fn harvest(&self, source: &str) -> Result<HarvestSummary, HarvestError> {
        let source_url = canonical_source(source);
        let delay = self.settings.request_delay;

        throttle(delay).await;
        let page = self.fetcher.fetch(source_url).await?;
        let html = page.text();
        if html.contains(CHALLENGE_MARKER) {
            return Err(HarvestError::SourceUnavailable {
                source_url: source_url.to_string(),
            });
        }

        let config = ConvertConfig::new(source_url).with_image_cdn(&self.settings.image_cdn);
        let conversion = ArticleConverter::new(config).convert_document(&html)?;
        let document = conversion.assemble(source_url)?;

        let image_dir = self.settings.image_dir(&document.asset_dir());
        let images = resolve_images(&self.fetcher, &conversion.image_tasks, &image_dir, delay).await;

        let writer = AtomicFileWriter::new(self.settings.blog_dir());
        let path = writer.write(&document.filename(), &document.render())?;
        info!("wrote {}", path.display());

        Ok(HarvestSummary {
            document: path,
            images,
            warnings: conversion.warnings.len(),
        })
    }
}
