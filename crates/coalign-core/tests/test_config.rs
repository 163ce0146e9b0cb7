use std::path::PathBuf;

use coalign_core::consts::{DEFAULT_REFERENCE_WAVELENGTH, DEFAULT_ROTATION_RATE_DEG_PER_MIN};
use coalign_core::error::CoalignError;
use coalign_core::pipeline::AlignConfig;
use coalign_core::record::RecordLevel;

#[test]
fn test_default_config() {
    let config = AlignConfig::default();
    assert_eq!(config.reference_wavelength, DEFAULT_REFERENCE_WAVELENGTH);
    assert_eq!(config.rotation_rate_deg_per_min, DEFAULT_ROTATION_RATE_DEG_PER_MIN);
    assert_eq!(config.fill, 0.0);
    assert!(config.save);
    assert!(config.output_dir.is_none());
    assert!(config.name.is_none());
    assert_eq!(config.record_level(), RecordLevel::Level0);
}

#[test]
fn test_empty_toml_gives_defaults() {
    let config = AlignConfig::from_toml_str("").unwrap();
    assert_eq!(config, AlignConfig::default());
}

#[test]
fn test_partial_toml_overrides_fields() {
    let config = AlignConfig::from_toml_str(
        r#"
        reference_wavelength = -1.5
        pre_match_wcs = true
        output_dir = "out"
        "#,
    )
    .unwrap();
    assert_eq!(config.reference_wavelength, -1.5);
    assert_eq!(config.output_dir, Some(PathBuf::from("out")));
    assert_eq!(config.record_level(), RecordLevel::Level1);
    assert_eq!(config.rotation_rate_deg_per_min, DEFAULT_ROTATION_RATE_DEG_PER_MIN);
}

#[test]
fn test_config_toml_roundtrip() {
    let config = AlignConfig {
        name: Some("2014-06-03".into()),
        fill: -1.0,
        ..AlignConfig::default()
    };
    let text = toml::to_string_pretty(&config).unwrap();
    assert_eq!(AlignConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn test_invalid_toml_is_reported() {
    let err = AlignConfig::from_toml_str("fill = \"zero\"").unwrap_err();
    assert!(matches!(err, CoalignError::Toml(_)));
}

#[test]
fn test_record_level_display() {
    assert_eq!(format!("{}", RecordLevel::Level0), "level 0");
    assert_eq!(format!("{}", RecordLevel::Level1), "level 1");
}
