//! Telemetry metric name constants.
//!
//! Centralised metric names for vibeboard operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `vibeboard_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `level`: "release_group" or "release"
//! - `outcome`: attempt result (e.g. "success", "status", "timeout")
//! - `backend`: narrative backend name ("openai" | "ollama")
//! - `status`: "ok" or "error" ("hit" or "miss" for cover lookups)
//! - `source`: where a cover URL came from ("coverartarchive" | "itunes")

/// Total cover URLs attempted.
///
/// Labels: `level`, `outcome`.
pub const COVER_ATTEMPTS_TOTAL: &str = "vibeboard_cover_attempts_total";

/// Total covers looked up, one per candidate.
///
/// Labels: `status` ("hit" | "miss").
pub const COVERS_TOTAL: &str = "vibeboard_covers_total";

/// Board build duration in seconds.
pub const BOARD_BUILD_DURATION_SECONDS: &str = "vibeboard_board_build_duration_seconds";

/// Total narrative requests.
///
/// Labels: `backend`, `status` ("ok" | "error").
pub const NARRATIVE_REQUESTS_TOTAL: &str = "vibeboard_narrative_requests_total";

/// Narrative request duration in seconds.
///
/// Labels: `backend`.
pub const NARRATIVE_DURATION_SECONDS: &str = "vibeboard_narrative_duration_seconds";

/// Total catalog requests.
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const CATALOG_REQUESTS_TOTAL: &str = "vibeboard_catalog_requests_total";

/// Total cover URL lookups made by cover search.
///
/// Labels: `source` ("coverartarchive" | "itunes"), `status` ("hit" | "miss").
pub const COVER_LOOKUPS_TOTAL: &str = "vibeboard_cover_lookups_total";
