use serde::{Deserialize, Serialize};

use crate::field_engine::types::Rgba;

/// Thème de la page hôte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Palette dérivée du thème, appliquée à chaud aux effets en cours.
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                particle_color: Rgba::new(1.0, 1.0, 1.0, 0.8),
                network_color: Rgba::from_hex(0x818cf8),
                network_line_color: Rgba::from_hex(0x818cf8).with_alpha(0.1),
                solid_opacity: 0.8,
                solid_emissive: Rgba::from_hex(0x222222),
            },
            Theme::Light => Palette {
                particle_color: Rgba::from_hex(0x6366f1).with_alpha(0.8),
                network_color: Rgba::from_hex(0x6366f1),
                network_line_color: Rgba::from_hex(0x6366f1).with_alpha(0.1),
                solid_opacity: 0.6,
                solid_emissive: Rgba::BLACK,
            },
        }
    }
}

/// Paramètres de couleur partagés par tous les effets d'un même thème.
///
/// Un champ de particules ne reprend que les couleurs de son rôle
/// (`ThemeColors`) ; un champ `Fixed` garde les siennes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Particules lumineuses.
    pub particle_color: Rgba,
    /// Réseau à durée de vie : particules, puis lignes.
    pub network_color: Rgba,
    pub network_line_color: Rgba,
    pub solid_opacity: f32,
    pub solid_emissive: Rgba,
}
