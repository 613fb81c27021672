use particle_fields::error::ConfigError;
use particle_fields::field_engine::{BoundaryPolicy, EffectConfig, FieldConfig, Rgba};
use particle_fields::scene::SceneConfig;
use particle_fields::theme::Theme;

#[test]
fn test_field_config_file_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("field.toml");
    let path = path.to_str().unwrap();

    let config = FieldConfig {
        seed: Some(5),
        ..FieldConfig::fading_network()
    };
    config.save_to_file(path).unwrap();
    let loaded = FieldConfig::from_file(path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("absent.toml");
    assert!(FieldConfig::from_file(path.to_str().unwrap()).is_err());
    assert!(SceneConfig::from_file(path.to_str().unwrap()).is_err());
}

#[test]
fn test_css_colors_in_toml() {
    let config = FieldConfig::from_toml_str(
        r#"
        color = "rgba(99, 102, 241, 0.8)"
        boundary = "wrap"
        glow = { size = 10.0 }
        "#,
    )
    .unwrap();
    assert_eq!(config.color, Rgba::from_hex(0x6366f1).with_alpha(0.8));
    assert_eq!(config.boundary, BoundaryPolicy::Wrap);
    let glow = config.glow.unwrap();
    assert_eq!(glow.size, 10.0);
    assert_eq!(glow.rate, 3.0);
}

#[test]
fn test_invalid_color_is_rejected() {
    assert!(FieldConfig::from_toml_str(r#"color = "rgba(1, 2, 3, 1.5)""#).is_err());
    assert!(FieldConfig::from_toml_str(r#"color = "blue""#).is_err());
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(matches!(
        FieldConfig::from_toml_str("connect = { distance = 0.0 }"),
        Err(ConfigError::InvalidValue {
            field: "connect.distance",
            ..
        })
    ));
    assert!(matches!(
        FieldConfig::from_toml_str("speed = { min = -1.0, max = 1.0 }"),
        Err(ConfigError::InvalidRange { field: "speed", .. })
    ));
}

#[test]
fn test_sample_scene_loads() {
    let scene = SceneConfig::from_file("assets/config/scene.toml").unwrap();
    assert_eq!(scene.theme, Theme::Dark);
    assert_eq!(scene.sections.len(), 4);
    assert_eq!(scene.toggle_theme_at, Some(150));

    let kinds: Vec<_> = scene.sections.iter().map(|s| s.effect.kind()).collect();
    assert_eq!(kinds, vec!["geometry", "particles", "particles", "particles"]);

    match &scene.sections[3].effect {
        EffectConfig::Particles(c) => {
            assert_eq!(c.boundary, BoundaryPolicy::Respawn);
            assert_eq!(c.lifespan, Some(3.0));
        }
        other => panic!("unexpected effect {:?}", other),
    }
}

#[test]
fn test_scene_with_invalid_section_is_rejected() {
    let result = SceneConfig::from_toml_str(
        r#"
        [[sections]]
        [sections.container]
        id = "hero"
        width = 100
        height = 100

        [sections.effect]
        kind = "particles"
        opacity = { min = 0.5, max = 2.0 }
        "#,
    );
    assert!(matches!(result, Err(ConfigError::InvalidRange { .. })));
}
