use particle_fields::error::ConfigError;
use particle_fields::field_engine::{Effect, EffectConfig, FieldConfig, FrameStats, ParticleField, Vec2};
use particle_fields::host::{Container, Page};
use particle_fields::renderer_engine::Surface;
use particle_fields::theme::Palette;
use std::cell::RefCell;
use std::rc::Rc;

#[allow(dead_code)]
pub const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

/// Champ déterministe de `count` particules dans `BOUNDS`.
#[allow(dead_code)]
pub fn seeded_field(config: FieldConfig, count: usize, seed: u64) -> ParticleField {
    ParticleField::new(
        FieldConfig {
            particle_count: count,
            seed: Some(seed),
            ..config
        },
        BOUNDS,
    )
    .unwrap()
}

/// Page avec un conteneur `800x600` par identifiant.
#[allow(dead_code)]
pub fn page_with(ids: &[&str]) -> Page {
    ids.iter().fold(Page::new(), |page, id| {
        page.with_container(Container::new(*id, BOUNDS.x as u32, BOUNDS.y as u32))
    })
}

/// Effet factice qui journalise les appels reçus.
#[allow(dead_code)]
pub struct LoggingEffect {
    pub log: Rc<RefCell<Vec<String>>>,
    pub on_window: bool,
}

#[allow(dead_code)]
impl LoggingEffect {
    pub fn new(log: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            log,
            on_window: false,
        }
    }

    pub fn on_window(mut self) -> Self {
        self.on_window = true;
        self
    }

    fn push(&self, entry: impl Into<String>) {
        self.log.borrow_mut().push(entry.into());
    }
}

impl Effect for LoggingEffect {
    fn kind(&self) -> &'static str {
        "logging"
    }
    fn configure(&mut self, config: &EffectConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.push("configure");
        Ok(())
    }
    fn resize(&mut self, bounds: Vec2) {
        self.push(format!("resize {}x{}", bounds.x, bounds.y));
    }
    fn set_pointer(&mut self, pointer: Option<Vec2>) {
        match pointer {
            Some(p) => self.push(format!("pointer {},{}", p.x, p.y)),
            None => self.push("pointer none"),
        }
    }
    fn apply_palette(&mut self, _palette: &Palette) {
        self.push("palette");
    }
    fn update(&mut self, _time: f64) {
        self.push("update");
    }
    fn draw(&self, _surface: &mut dyn Surface, _time: f64) -> FrameStats {
        self.push("draw");
        FrameStats::default()
    }
    fn listens_on_window(&self) -> bool {
        self.on_window
    }
    fn len(&self) -> usize {
        0
    }
}
