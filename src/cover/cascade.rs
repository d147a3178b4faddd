//! Candidate URL lists and the short-circuiting scan over them.

use std::future::Future;

use crate::types::{AttemptOutcome, CascadeLevel, FetchAttempt};

/// Default Cover Art Archive base URL.
pub const DEFAULT_ARCHIVE_BASE_URL: &str = "https://coverartarchive.org";

/// Front-cover variants, from most to least specific.
const FRONT_VARIANTS: [&str; 5] = [
    "front-500",
    "front-250",
    "front",
    "front?size=500",
    "front?size=250",
];

fn entity_candidates(base_url: &str, entity: &str, id: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    FRONT_VARIANTS
        .iter()
        .map(|variant| format!("{base}/{entity}/{id}/{variant}"))
        .collect()
}

/// Release-group artwork URLs, in cascade order.
pub fn release_group_candidates(base_url: &str, release_group_id: &str) -> Vec<String> {
    entity_candidates(base_url, "release-group", release_group_id)
}

/// Release artwork URLs, in cascade order.
pub fn release_candidates(base_url: &str, release_id: &str) -> Vec<String> {
    entity_candidates(base_url, "release", release_id)
}

/// Try each URL in order and stop at the first success.
///
/// Every attempt is recorded, including the successful one. The scan holds no
/// state beyond its own locals, so independent candidates can run it
/// concurrently.
pub async fn first_success<T, F, Fut>(
    urls: &[String],
    level: &CascadeLevel,
    mut attempt: F,
    log: &mut Vec<FetchAttempt>,
) -> Option<(String, T)>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptOutcome>>,
{
    for url in urls {
        let result = attempt(url.clone()).await;
        let outcome = match &result {
            Ok(_) => AttemptOutcome::Success,
            Err(outcome) => outcome.clone(),
        };
        log.push(FetchAttempt::new(url.clone(), level.clone(), outcome));
        if let Ok(value) = result {
            return Some((url.clone(), value));
        }
    }
    None
}
