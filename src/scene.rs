use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field_engine::{EffectConfig, FieldConfig, GeometryConfig, Vec2};
use crate::host::{Container, EventTarget, HostEvent, Page};
use crate::theme::Theme;

/// Section de la page : un conteneur et l'effet qui y est monté.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub container: Container,
    pub effect: EffectConfig,
}

impl Section {
    pub fn new(container: Container, effect: impl Into<EffectConfig>) -> Self {
        Self {
            container,
            effect: effect.into(),
        }
    }

    /// Position relative au conteneur si `point` (coordonnées fenêtre) y tombe.
    pub fn local_point(&self, point: Vec2) -> Option<Vec2> {
        let local = point - self.container.origin;
        let inside = local.x >= 0.0
            && local.y >= 0.0
            && local.x <= self.container.width as f32
            && local.y <= self.container.height as f32;
        inside.then_some(local)
    }
}

/// Trajet circulaire du pointeur simulé, en fraction de la fenêtre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerPath {
    pub center: Vec2,
    pub radius: Vec2,
    /// Tours par seconde.
    pub speed: f32,
}

impl Default for PointerPath {
    fn default() -> Self {
        Self {
            center: Vec2::splat(0.5),
            radius: Vec2::new(0.4, 0.45),
            speed: 0.25,
        }
    }
}

/// Description d'une page à animer hors navigateur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub theme: Theme,
    pub width: u32,
    pub height: u32,
    pub frames: u32,
    /// Intervalle entre deux captures PNG (0 : dernière frame seulement).
    pub snapshot_every: u32,
    pub refresh_rate: f64,
    /// Frame à laquelle le thème bascule, si définie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle_theme_at: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<PointerPath>,
    pub sections: Vec<Section>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            width: 1024,
            height: 768,
            frames: 240,
            snapshot_every: 60,
            refresh_rate: 60.0,
            toggle_theme_at: None,
            pointer: Some(PointerPath::default()),
            sections: vec![
                Section::new(
                    Container::new("background", 1024, 768),
                    GeometryConfig::default(),
                ),
                Section::new(
                    Container::new("hero", 1024, 256),
                    FieldConfig::light_particles(),
                ),
                Section::new(
                    Container::new("about", 1024, 256).with_origin(Vec2::new(0.0, 256.0)),
                    FieldConfig::constellation(),
                ),
                Section::new(
                    Container::new("contact", 1024, 256).with_origin(Vec2::new(0.0, 512.0)),
                    FieldConfig::fading_network(),
                ),
            ],
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let scene: Self = toml::from_str(text)?;
        scene.validate()?;
        Ok(scene)
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

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.refresh_rate.is_finite() && self.refresh_rate > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "refresh_rate",
                value: self.refresh_rate as f32,
            });
        }
        for section in &self.sections {
            section.effect.validate()?;
        }
        Ok(())
    }

    /// Page hôte contenant tous les conteneurs de la scène.
    pub fn page(&self) -> Page {
        self.sections
            .iter()
            .fold(Page::new(), |page, s| page.with_container(s.container.clone()))
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Faut-il capturer la frame `frame` (numérotée à partir de 1) ?
    pub fn is_snapshot_frame(&self, frame: u32) -> bool {
        frame == self.frames || (self.snapshot_every > 0 && frame % self.snapshot_every == 0)
    }

    /// Position du pointeur simulé (coordonnées fenêtre) à l'instant `time`.
    pub fn pointer_at(&self, time: f64) -> Option<Vec2> {
        let path = self.pointer?;
        let angle = (time * path.speed as f64 * std::f64::consts::TAU) as f32;
        let fraction = path.center + path.radius * Vec2::new(angle.cos(), angle.sin());
        Some(fraction * self.viewport())
    }

    /// Évènements pointeur pour la position `window_point`.
    ///
    /// Un `PointerMove` fenêtre, un `PointerMove` relatif pour chaque section
    /// survolée et un `PointerLeave` pour celles que le pointeur vient de
    /// quitter. `hovered` garde l'état entre deux appels.
    pub fn route_pointer(
        &self,
        window_point: Vec2,
        hovered: &mut HashSet<String>,
    ) -> Vec<HostEvent> {
        let mut events = vec![HostEvent::PointerMove {
            target: EventTarget::Window,
            position: window_point,
        }];
        for section in &self.sections {
            let id = &section.container.id;
            match section.local_point(window_point) {
                Some(local) => {
                    hovered.insert(id.clone());
                    events.push(HostEvent::PointerMove {
                        target: EventTarget::container(id.as_str()),
                        position: local,
                    });
                }
                None => {
                    if hovered.remove(id) {
                        events.push(HostEvent::PointerLeave {
                            target: EventTarget::container(id.as_str()),
                        });
                    }
                }
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_is_valid() {
        let scene = SceneConfig::default();
        assert!(scene.validate().is_ok());
        assert_eq!(scene.page().len(), 4);
    }

    #[test]
    fn test_snapshot_frames() {
        let scene = SceneConfig {
            frames: 100,
            snapshot_every: 30,
            ..SceneConfig::default()
        };
        let frames: Vec<u32> = (1..=100).filter(|f| scene.is_snapshot_frame(*f)).collect();
        assert_eq!(frames, vec![30, 60, 90, 100]);
    }

    #[test]
    fn test_route_pointer_emits_leave_once() {
        let scene = SceneConfig::default();
        let mut hovered = HashSet::new();

        let events = scene.route_pointer(Vec2::new(10.0, 10.0), &mut hovered);
        assert!(hovered.contains("hero"));
        assert!(events.contains(&HostEvent::PointerMove {
            target: EventTarget::container("hero"),
            position: Vec2::new(10.0, 10.0),
        }));

        let events = scene.route_pointer(Vec2::new(10.0, 300.0), &mut hovered);
        let leaves = |events: &[HostEvent]| {
            events
                .iter()
                .filter(|e| matches!(e, HostEvent::PointerLeave { .. }))
                .count()
        };
        assert_eq!(leaves(&events), 1);
        assert!(events.contains(&HostEvent::PointerMove {
            target: EventTarget::container("about"),
            position: Vec2::new(10.0, 44.0),
        }));

        let events = scene.route_pointer(Vec2::new(12.0, 300.0), &mut hovered);
        assert_eq!(leaves(&events), 0);
    }
}
