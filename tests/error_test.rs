use std::time::Duration;

use vibeboard::{Result, VibeError};

#[test]
fn test_error_display() {
    let err = VibeError::ImageUnavailable("rg-1".to_string());
    assert!(err.to_string().contains("rg-1"));

    let err = VibeError::Api {
        status: 401,
        message: "unauthorized".into(),
    };
    assert_eq!(err.to_string(), "API error (401): unauthorized");
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(VibeError::BackendNotConfigured)
    }
    assert!(returns_error().is_err());
}

#[test]
fn test_json_error_conversion() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{not json")?)
    }
    let err = parse().unwrap_err();
    assert_eq!(err.kind(), "json_error");
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn kinds_are_stable_codes() {
    let cases = [
        (VibeError::ImageUnavailable("x".into()), "image_unavailable"),
        (VibeError::Decode("x".into()), "decode_error"),
        (VibeError::CatalogLookupFailed("x".into()), "catalog_lookup_failed"),
        (VibeError::BackendNotConfigured, "backend_not_configured"),
        (VibeError::BackendUnavailable("x".into()), "backend_unavailable"),
        (
            VibeError::BackendRateLimited { retry_after: None },
            "backend_rate_limited",
        ),
        (VibeError::Http("x".into()), "http_error"),
        (VibeError::EmptyResponse, "empty_response"),
        (VibeError::InvalidInput("x".into()), "invalid_input"),
        (VibeError::Configuration("x".into()), "configuration_error"),
    ];
    for (err, kind) in cases {
        assert_eq!(err.kind(), kind);
    }
}

#[test]
fn only_request_level_errors_are_fatal() {
    assert!(VibeError::CatalogLookupFailed("down".into()).is_fatal());
    assert!(VibeError::Configuration("both backends".into()).is_fatal());
    assert!(VibeError::InvalidInput("empty".into()).is_fatal());

    assert!(!VibeError::ImageUnavailable("rg".into()).is_fatal());
    assert!(!VibeError::Decode("bad png".into()).is_fatal());
    assert!(!VibeError::BackendNotConfigured.is_fatal());
    assert!(!VibeError::BackendUnavailable("timeout".into()).is_fatal());
    assert!(!VibeError::BackendRateLimited { retry_after: None }.is_fatal());
}

#[test]
fn retry_after_hint() {
    let err = VibeError::BackendRateLimited {
        retry_after: Some(Duration::from_secs(30)),
    };
    assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
    assert_eq!(VibeError::EmptyResponse.retry_after(), None);
}
