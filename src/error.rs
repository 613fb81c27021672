use thiserror::Error;

/// Configuration refusée au moment de `configure()` (ou du chargement TOML).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid range for `{field}`: min = {min}, max = {max}")]
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("effect kind mismatch: expected {expected}, got {got}")]
    KindMismatch {
        expected: &'static str,
        got: &'static str,
    },

    #[error("failed to build configuration: {0}")]
    Builder(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Erreurs du sous-système d'effets.
///
/// Aucune n'est fatale pour la page : le gestionnaire les journalise et
/// poursuit sans l'effet concerné.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("container `{0}` not found, effect not mounted")]
    Mount(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
}
