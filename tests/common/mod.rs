//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};

use vibeboard::{
    AttemptOutcome, CandidateItem, CascadeLevel, CoverOutcome, CoverSource, FetchAttempt,
    FetchedImage,
};

// Reference colors and the mood each one classifies as.
pub const DARK_MOODY: [u8; 3] = [20, 20, 30];
pub const DARK_INTENSE: [u8; 3] = [80, 0, 10];
pub const MUTED_MELANCHOLIC: [u8; 3] = [120, 120, 130];
pub const VIVID_PLAYFUL: [u8; 3] = [30, 110, 150];
pub const SOFT_DREAMY: [u8; 3] = [230, 225, 235];
pub const BRIGHT_ENERGETIC: [u8; 3] = [250, 60, 40];

/// PNG bytes of a solid-color image.
pub fn png_bytes(rgb: [u8; 3]) -> Vec<u8> {
    encode_png(&RgbImage::from_pixel(16, 16, Rgb(rgb)))
}

pub fn encode_png(image: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn candidates(ids: &[&str]) -> Vec<CandidateItem> {
    ids.iter()
        .map(|id| CandidateItem::release_group(*id, format!("Album {id}")))
        .collect()
}

/// Cover source serving solid-color covers from a fixed table.
///
/// Unknown IDs yield an absent cover. Tracks in-flight calls so tests can
/// observe the concurrency bound.
#[derive(Default)]
pub struct StaticCovers {
    covers: HashMap<String, [u8; 3]>,
    delays: HashMap<String, Duration>,
    default_delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StaticCovers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cover(mut self, id: &str, rgb: [u8; 3]) -> Self {
        self.covers.insert(id.to_string(), rgb);
        self
    }

    pub fn delay(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }

    pub fn default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoverSource for StaticCovers {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_cover(&self, release_group_id: &str) -> CoverOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(release_group_id)
            .copied()
            .or(self.default_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let url = format!("https://covers.test/release-group/{release_group_id}/front-500");
        match self.covers.get(release_group_id) {
            Some(rgb) => {
                let pixels = RgbImage::from_pixel(16, 16, Rgb(*rgb));
                let image = FetchedImage {
                    source_url: url.clone(),
                    pixels,
                    width: 16,
                    height: 16,
                };
                CoverOutcome::found(
                    image,
                    vec![FetchAttempt::new(
                        url,
                        CascadeLevel::ReleaseGroup,
                        AttemptOutcome::Success,
                    )],
                )
            }
            None => CoverOutcome::absent(vec![FetchAttempt::new(
                url,
                CascadeLevel::ReleaseGroup,
                AttemptOutcome::Status(404),
            )]),
        }
    }
}
