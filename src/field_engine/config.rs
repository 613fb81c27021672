use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field_engine::types::{Rgba, ValueRange, Vec2};

/// Politique appliquée quand une particule atteint le bord de la surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Réapparition sur le bord opposé, au-delà de la marge (glow ou taille).
    Wrap,
    /// Inversion de la composante de vitesse qui sort de `[0, bound]`.
    #[default]
    Bounce,
    /// Remplacement in-place par une particule fraîchement tirée.
    Respawn,
}

/// Couleurs reprises du thème par un champ de particules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeColors {
    /// Couleurs configurées conservées quel que soit le thème.
    #[default]
    Fixed,
    /// Couleur des particules lumineuses du thème.
    Light,
    /// Couleurs du réseau du thème, particules et lignes.
    Network,
}

/// Halo pulsé : `glow = size + size * sin(time * rate)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    pub size: f32,
    /// Pulsation en radians par seconde.
    pub rate: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            size: 15.0,
            rate: 3.0,
        }
    }
}

/// Passe de connexion (« constellation »).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Distance en dessous de laquelle deux particules sont reliées.
    pub distance: f32,
    /// Facteur appliqué à `1 - d / distance`.
    pub opacity: f32,
    pub width: f32,
    /// Couleur des lignes, celle des particules si absente.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            distance: 100.0,
            opacity: 0.5,
            width: 0.5,
            color: None,
        }
    }
}

/// Attraction vers le pointeur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractionConfig {
    pub radius: f32,
    pub strength: f32,
}

impl Default for AttractionConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            strength: 0.03,
        }
    }
}

/// Configuration d'un champ de particules 2D.
///
/// Les champs inconnus d'un fichier TOML sont ignorés, les champs absents
/// prennent la valeur par défaut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct FieldConfig {
    pub particle_count: usize,
    pub size: ValueRange,
    pub speed: ValueRange,
    pub opacity: ValueRange,
    pub color: Rgba,
    pub direction: Vec2,
    pub boundary: BoundaryPolicy,
    pub theme_colors: ThemeColors,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow: Option<GlowConfig>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect: Option<ConnectConfig>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifespan: Option<f32>,
    /// Vie retirée à chaque frame quand `lifespan` est défini.
    pub life_decay: f32,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attraction: Option<AttractionConfig>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            size: ValueRange::new(1.0, 3.0),
            speed: ValueRange::new(0.1, 0.5),
            opacity: ValueRange::new(0.1, 0.5),
            color: Rgba::WHITE,
            direction: Vec2::ONE,
            boundary: BoundaryPolicy::Bounce,
            theme_colors: ThemeColors::Fixed,
            glow: None,
            connect: None,
            lifespan: None,
            life_decay: 0.01,
            attraction: None,
            seed: None,
        }
    }
}

impl From<FieldConfigBuilderError> for ConfigError {
    fn from(e: FieldConfigBuilderError) -> Self {
        ConfigError::Builder(e.to_string())
    }
}

impl FieldConfig {
    pub fn builder() -> FieldConfigBuilder {
        FieldConfigBuilder::default()
    }

    /// Particules lumineuses des sections : halo pulsé, bords rebouclés,
    /// attraction vers la souris.
    pub fn light_particles() -> Self {
        Self {
            particle_count: 50,
            size: ValueRange::new(1.0, 3.0),
            speed: ValueRange::new(0.1, 0.3),
            color: Rgba::new(1.0, 1.0, 1.0, 0.8),
            opacity: ValueRange::fixed(1.0),
            boundary: BoundaryPolicy::Wrap,
            theme_colors: ThemeColors::Light,
            glow: Some(GlowConfig::default()),
            attraction: Some(AttractionConfig::default()),
            ..Self::default()
        }
    }

    /// Particules rebondissantes reliées entre elles.
    pub fn constellation() -> Self {
        Self {
            connect: Some(ConnectConfig::default()),
            ..Self::default()
        }
    }

    /// Réseau de particules à durée de vie limitée qui s'estompent.
    pub fn fading_network() -> Self {
        Self {
            particle_count: 50,
            size: ValueRange::new(0.0, 2.0),
            speed: ValueRange::new(0.0, 0.25),
            opacity: ValueRange::fixed(1.0),
            color: Rgba::from_hex(0x6366f1),
            boundary: BoundaryPolicy::Respawn,
            theme_colors: ThemeColors::Network,
            connect: Some(ConnectConfig {
                distance: 150.0,
                color: Some(Rgba::new(99.0 / 255.0, 102.0 / 255.0, 241.0 / 255.0, 0.1)),
                ..ConnectConfig::default()
            }),
            lifespan: Some(3.0),
            ..Self::default()
        }
    }

    /// Vérifie la cohérence numérique de la configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.size.validate("size")?;
        self.speed.validate("speed")?;
        self.opacity.validate("opacity")?;
        if self.opacity.max > 1.0 {
            return Err(ConfigError::InvalidRange {
                field: "opacity",
                min: self.opacity.min,
                max: self.opacity.max,
            });
        }
        if !self.direction.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "direction",
                value: self.direction.x,
            });
        }
        if let Some(glow) = &self.glow {
            positive("glow.size", glow.size, true)?;
            positive("glow.rate", glow.rate, true)?;
        }
        if let Some(connect) = &self.connect {
            positive("connect.distance", connect.distance, false)?;
            positive("connect.opacity", connect.opacity, true)?;
            positive("connect.width", connect.width, false)?;
        }
        if let Some(lifespan) = self.lifespan {
            positive("lifespan", lifespan, false)?;
            positive("life_decay", self.life_decay, false)?;
        }
        if let Some(attraction) = &self.attraction {
            positive("attraction.radius", attraction.radius, false)?;
            positive("attraction.strength", attraction.strength, true)?;
        }
        Ok(())
    }

    /// Marge maximale hors surface tolérée pour une particule.
    ///
    /// Halo maximal (`2 * glow.size`) en mode `Wrap` avec halo, taille
    /// maximale sinon ; plus un pas de vitesse en mode `Bounce`.
    pub fn max_margin(&self) -> f32 {
        let step = self.speed.max * self.direction.abs().max_element();
        match (self.boundary, &self.glow) {
            (BoundaryPolicy::Wrap, Some(glow)) => 2.0 * glow.size + step,
            (BoundaryPolicy::Wrap, None) => self.size.max + step,
            (BoundaryPolicy::Bounce, _) => step,
            (BoundaryPolicy::Respawn, _) => 0.0,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&text)?)
    }

    pub fn save_to_file(&self, path: &str) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32, allow_zero: bool) -> Result<(), ConfigError> {
    let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

// ------------------------
// Fond géométrique 3D
// ------------------------

/// Configuration du fond de solides en rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct GeometryConfig {
    pub solid_count: usize,
    /// Demi-étendue du volume de placement (x, y, z).
    pub spread: glam::Vec3,
    pub scale: ValueRange,
    /// Vitesse de rotation maximale par axe (radians par frame).
    pub max_rotation_speed: f32,
    pub float_speed: ValueRange,
    /// Vitesse de défilement de la teinte (tours par seconde).
    pub hue_rate: f32,
    /// Facteur de lissage de la rotation du groupe vers la cible pointeur.
    pub pointer_ease: f32,
    pub camera_distance: f32,
    /// Champ de vision vertical en degrés.
    pub fov_degrees: f32,
    pub palette: Vec<Rgba>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            solid_count: 15,
            spread: glam::Vec3::new(20.0, 20.0, 10.0),
            scale: ValueRange::new(0.5, 1.0),
            max_rotation_speed: 0.01,
            float_speed: ValueRange::new(0.001, 0.003),
            hue_rate: 0.1,
            pointer_ease: 0.05,
            camera_distance: 30.0,
            fov_degrees: 75.0,
            palette: vec![
                Rgba::from_hex(0x6366f1),
                Rgba::from_hex(0x10b981),
                Rgba::from_hex(0xf59e0b),
            ],
            seed: None,
        }
    }
}

impl From<GeometryConfigBuilderError> for ConfigError {
    fn from(e: GeometryConfigBuilderError) -> Self {
        ConfigError::Builder(e.to_string())
    }
}

impl GeometryConfig {
    pub fn builder() -> GeometryConfigBuilder {
        GeometryConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scale.validate("scale")?;
        self.float_speed.validate("float_speed")?;
        if !self.spread.is_finite() || self.spread.min_element() < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "spread",
                value: self.spread.min_element(),
            });
        }
        positive("max_rotation_speed", self.max_rotation_speed, true)?;
        positive("hue_rate", self.hue_rate, true)?;
        positive("camera_distance", self.camera_distance, false)?;
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "fov_degrees",
                value: self.fov_degrees,
            });
        }
        if !(0.0..=1.0).contains(&self.pointer_ease) {
            return Err(ConfigError::InvalidValue {
                field: "pointer_ease",
                value: self.pointer_ease,
            });
        }
        if self.palette.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "palette",
                value: 0.0,
            });
        }
        Ok(())
    }
}

// ------------------------
// EffectConfig
// ------------------------

/// Configuration d'un effet, quel que soit son type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectConfig {
    Particles(FieldConfig),
    Geometry(GeometryConfig),
}

impl EffectConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            EffectConfig::Particles(_) => "particles",
            EffectConfig::Geometry(_) => "geometry",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            EffectConfig::Particles(c) => c.validate(),
            EffectConfig::Geometry(c) => c.validate(),
        }
    }
}

impl From<FieldConfig> for EffectConfig {
    fn from(config: FieldConfig) -> Self {
        EffectConfig::Particles(config)
    }
}

impl From<GeometryConfig> for EffectConfig {
    fn from(config: GeometryConfig) -> Self {
        EffectConfig::Geometry(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FieldConfig::default().validate().is_ok());
        assert!(FieldConfig::light_particles().validate().is_ok());
        assert!(FieldConfig::constellation().validate().is_ok());
        assert!(FieldConfig::fading_network().validate().is_ok());
        assert!(GeometryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_keeps_defaults_for_unset_fields() {
        let config = FieldConfig::builder()
            .particle_count(12usize)
            .connect(ConnectConfig::default())
            .build()
            .unwrap();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.speed, FieldConfig::default().speed);
        assert!(config.connect.is_some());
        assert!(config.glow.is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let config = FieldConfig::from_toml_str(
            r##"
            particle_count = 7
            sparkle_mode = "max"
            color = "#6366f1"
            "##,
        )
        .unwrap();
        assert_eq!(config.particle_count, 7);
        assert_eq!(config.size, FieldConfig::default().size);
    }

    #[test]
    fn test_negative_count_is_rejected() {
        assert!(matches!(
            FieldConfig::from_toml_str("particle_count = -3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let config = FieldConfig {
            size: ValueRange::new(4.0, 2.0),
            ..FieldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { field: "size", .. })
        ));
    }

    #[test]
    fn test_effect_config_tagged_toml() {
        let effect: EffectConfig = toml::from_str(
            r#"
            kind = "geometry"
            solid_count = 4
            "#,
        )
        .unwrap();
        match effect {
            EffectConfig::Geometry(g) => assert_eq!(g.solid_count, 4),
            other => panic!("unexpected effect {:?}", other),
        }
    }
}
