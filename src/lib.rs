pub mod error;
pub use error::{ConfigError, EffectError};

pub mod theme;
pub use theme::{Palette, Theme};

// Effets animés (particules 2D, solides 3D)
pub mod field_engine;
pub use field_engine::{Effect, EffectConfig, FieldConfig, GeometryConfig, ParticleField};

// Surfaces de dessin
pub mod renderer_engine;
pub use renderer_engine::Surface;

// Page hôte : rappels de frame, évènements, conteneurs
pub mod host;

pub mod animator;
pub use animator::Animator;

pub mod effects_manager;
pub use effects_manager::EffectsManager;

pub mod scene;
pub use scene::SceneConfig;

// Profiler
pub mod profiler;
// Utilities
pub mod utils;
