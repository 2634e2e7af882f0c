//! Configuration Tests
//!
//! Tests for:
//! - ViewerConfig defaults and serde
//! - Query-string startup selection (`logref`, `test`)
//! - Tuning parameters and validation

use kinescope::config::{DEFAULT_FPS, StartupSource, ViewerConfig};
use kinescope::errors::KinescopeError;
use kinescope::loader::LoadSource;

// ============================================================================
// Defaults & Serde
// ============================================================================

#[test]
fn default_config_plays_at_sixty_fps() {
    let config = ViewerConfig::default();

    assert_eq!(config.fps, DEFAULT_FPS);
    assert!(config.autoplay);
    assert_eq!(config.speed, 1.0);
    assert!(config.source.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn partial_json_fills_defaults() {
    let config: ViewerConfig = serde_json::from_str(r#"{ "fps": 30 }"#).unwrap();

    assert_eq!(config.fps, 30.0);
    assert!(config.autoplay);
}

#[test]
fn json_startup_source() {
    let config: ViewerConfig =
        serde_json::from_str(r#"{ "source": { "log_ref": "run.json" } }"#).unwrap();
    assert_eq!(config.source, Some(StartupSource::LogRef("run.json".into())));
}

// ============================================================================
// Query String
// ============================================================================

#[test]
fn empty_query_waits_for_drop() {
    let config = ViewerConfig::from_query("").unwrap();
    assert_eq!(config, ViewerConfig::default());
}

#[test]
fn query_logref_selects_url() {
    let config = ViewerConfig::from_query("?logref=https%3A%2F%2Fhost%2Frun.json").unwrap();
    assert_eq!(
        config.source,
        Some(StartupSource::LogRef("https://host/run.json".into()))
    );
}

#[test]
fn query_test_selects_fixture() {
    let config = ViewerConfig::from_query("test=1").unwrap();
    assert_eq!(config.source, Some(StartupSource::Fixture(1)));
}

#[test]
fn query_logref_wins_over_test() {
    let config = ViewerConfig::from_query("test=0&logref=a.json").unwrap();
    assert_eq!(config.source, Some(StartupSource::LogRef("a.json".into())));
}

#[test]
fn query_tuning_parameters() {
    let config = ViewerConfig::from_query("fps=24&speed=-0.5&paused").unwrap();

    assert_eq!(config.fps, 24.0);
    assert_eq!(config.speed, -0.5);
    assert!(!config.autoplay);
}

#[test]
fn query_paused_false_keeps_autoplay() {
    assert!(ViewerConfig::from_query("paused=false").unwrap().autoplay);
}

#[test]
fn query_unknown_parameters_are_ignored() {
    assert!(ViewerConfig::from_query("theme=dark&test=0").is_ok());
}

#[test]
fn query_bad_fixture_index_is_config_error() {
    let err = ViewerConfig::from_query("test=abc").unwrap_err();
    assert!(matches!(err, KinescopeError::Config(_)));
}

#[test]
fn query_zero_fps_is_config_error() {
    assert!(matches!(
        ViewerConfig::from_query("fps=0"),
        Err(KinescopeError::Config(_))
    ));
}

// ============================================================================
// Validation & Conversion
// ============================================================================

#[test]
fn validate_rejects_non_finite_values() {
    let mut config = ViewerConfig::default();
    config.fps = f64::INFINITY;
    assert!(config.validate().is_err());

    config.fps = 30.0;
    config.speed = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn startup_source_converts_to_load_source() {
    assert_eq!(
        StartupSource::LogRef("a.json".into()).into_load_source(),
        LoadSource::Url("a.json".into())
    );
    assert_eq!(
        StartupSource::Fixture(2).into_load_source(),
        LoadSource::Fixture(2)
    );
}
