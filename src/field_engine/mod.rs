pub mod r#trait;
pub use r#trait::{Effect, FrameStats};

pub mod types;
pub use self::types::{Rgba, ValueRange, Vec2, Vec3};

pub mod config;
pub use self::config::{
    AttractionConfig, BoundaryPolicy, ConnectConfig, EffectConfig, FieldConfig, GeometryConfig,
    GlowConfig, ThemeColors,
};

pub mod particle;
pub use self::particle::Particle;

pub mod particle_field;
pub use self::particle_field::ParticleField;

pub mod solid;
pub use self::solid::{Mesh, SolidKind};

pub mod geometry_field;
pub use self::geometry_field::{GeometryField, Solid};

use crate::error::ConfigError;

/// Construit l'effet correspondant à une configuration.
pub fn build_effect(config: &EffectConfig, bounds: Vec2) -> Result<Box<dyn Effect>, ConfigError> {
    let effect: Box<dyn Effect> = match config {
        EffectConfig::Particles(c) => Box::new(ParticleField::new(c.clone(), bounds)?),
        EffectConfig::Geometry(c) => Box::new(GeometryField::new(c.clone(), bounds)?),
    };
    Ok(effect)
}
