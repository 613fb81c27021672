use itertools::Itertools;
#[cfg(debug_assertions)]
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::ConfigError;
use crate::field_engine::{
    config::{AttractionConfig, BoundaryPolicy, EffectConfig, FieldConfig, ThemeColors},
    particle::Particle,
    types::Vec2,
    Effect, FrameStats,
};
use crate::renderer_engine::Surface;
use crate::theme::Palette;

/// Champ de particules 2D paramétrable.
///
/// Une seule implémentation couvre les variantes de la page (halo pulsé,
/// constellation, réseau à durée de vie) : elles ne diffèrent que par la
/// politique de bord, le halo, la durée de vie et la passe de connexion,
/// toutes portées par `FieldConfig`.
///
/// # Invariants
/// - `particles.len() == config.particle_count` en permanence ;
/// - une particule morte ou sortie (mode `Respawn`) est retirée *à la même
///   place* dans le tableau : ni compaction, ni croissance ;
/// - une reconfiguration construit un lot complet avant de remplacer l'ancien.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    bounds: Vec2,
    pointer: Option<Vec2>,
    rng: StdRng,
    generation: u32,
    respawned_last_frame: usize,
}

impl ParticleField {
    pub fn new(config: FieldConfig, bounds: Vec2) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut field = Self {
            rng: make_rng(config.seed),
            config: FieldConfig {
                particle_count: 0,
                ..FieldConfig::default()
            },
            particles: Vec::new(),
            bounds,
            pointer: None,
            generation: 0,
            respawned_last_frame: 0,
        };
        field.configure(config)?;
        Ok(field)
    }

    /// Valide puis régénère tout le lot de particules.
    pub fn configure(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if config.seed.is_some() {
            self.rng = make_rng(config.seed);
        }
        let generation = self.generation.wrapping_add(1);
        let batch: Vec<Particle> = (0..config.particle_count)
            .map(|_| Particle::seed_staggered(&mut self.rng, &config, self.bounds, generation))
            .collect();

        #[cfg(debug_assertions)]
        debug!(
            "ParticleField configured: {} particles (generation {}), boundary {:?}",
            batch.len(),
            generation,
            config.boundary
        );

        self.particles = batch;
        self.generation = generation;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Numéro du lot courant, incrémenté à chaque `configure`.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn respawned_last_frame(&self) -> usize {
        self.respawned_last_frame
    }

    /// Rayon du halo à l'instant `time`, partagé par toutes les particules.
    pub fn glow_at(&self, time: f64) -> Option<f32> {
        self.config
            .glow
            .map(|g| g.size + g.size * ((time * g.rate as f64).sin() as f32))
    }

    /// Avance toutes les particules d'une frame.
    fn step(&mut self, time: f64) {
        let glow = self.glow_at(time);
        let bounds = self.bounds;
        let direction = self.config.direction;
        let decay = self.config.lifespan.map(|_| self.config.life_decay);
        let policy = self.config.boundary;
        let mut respawned = 0;

        for p in self.particles.iter_mut() {
            let step = p.vel * direction;
            p.pos += step;
            if let Some(decay) = decay {
                p.life -= decay;
            }

            let margin = glow.unwrap_or(p.size);
            let exited = match policy {
                BoundaryPolicy::Wrap => {
                    wrap_axis(&mut p.pos.x, bounds.x, margin);
                    wrap_axis(&mut p.pos.y, bounds.y, margin);
                    false
                }
                BoundaryPolicy::Bounce => {
                    bounce_axis(p.pos.x, &mut p.vel.x, step.x, bounds.x);
                    bounce_axis(p.pos.y, &mut p.vel.y, step.y, bounds.y);
                    false
                }
                BoundaryPolicy::Respawn => {
                    p.pos.x < 0.0 || p.pos.x > bounds.x || p.pos.y < 0.0 || p.pos.y > bounds.y
                }
            };

            if exited || p.is_dead() || !p.pos.is_finite() {
                *p = Particle::seed(&mut self.rng, &self.config, bounds, self.generation);
                respawned += 1;
            }
        }

        // Attraction appliquée à toute particule dans le rayon, y compris
        // celles qui réapparaîtront à la frame suivante.
        if let (Some(pointer), Some(attraction)) = (self.pointer, self.config.attraction) {
            for p in self.particles.iter_mut() {
                attract(p, pointer, &attraction);
            }
        }

        self.respawned_last_frame = respawned;
    }

    /// Paires de particules à relier : `(a, b, opacité)`.
    ///
    /// O(n²) sur les paires non ordonnées ; acceptable pour quelques
    /// dizaines à centaines de particules.
    pub fn connections(&self) -> impl Iterator<Item = (Vec2, Vec2, f32)> + '_ {
        self.config.connect.into_iter().flat_map(move |connect| {
            self.particles
                .iter()
                .tuple_combinations()
                .filter_map(move |(a, b)| {
                    let distance = a.pos.distance(b.pos);
                    (distance < connect.distance).then(|| {
                        (
                            a.pos,
                            b.pos,
                            (1.0 - distance / connect.distance) * connect.opacity,
                        )
                    })
                })
        })
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Bord rebouclé : au-delà de `bound + margin`, réapparition à `-margin` (et inversement).
#[inline(always)]
fn wrap_axis(pos: &mut f32, bound: f32, margin: f32) {
    if *pos < -margin {
        *pos = bound + margin;
    } else if *pos > bound + margin {
        *pos = -margin;
    }
}

/// Rebond : hors de `[0, bound]` et en train de s'éloigner, on inverse la vitesse.
///
/// Le test sur le sens du déplacement évite qu'une particule hors bornes
/// (après un redimensionnement) oscille sur place.
#[inline(always)]
fn bounce_axis(pos: f32, vel: &mut f32, step: f32, bound: f32) {
    if (pos < 0.0 && step < 0.0) || (pos > bound && step > 0.0) {
        *vel = -*vel;
    }
}

/// Attire la particule vers le pointeur, proportionnellement à `(r - d) / r`.
#[inline(always)]
fn attract(p: &mut Particle, pointer: Vec2, attraction: &AttractionConfig) {
    let delta = pointer - p.pos;
    let distance = delta.length();
    if distance < attraction.radius {
        let force = (attraction.radius - distance) / attraction.radius;
        p.pos += delta * force * attraction.strength;
    }
}

// ==================================
// Trait Effect
// ==================================
impl Effect for ParticleField {
    fn kind(&self) -> &'static str {
        "particles"
    }

    fn configure(&mut self, config: &EffectConfig) -> Result<(), ConfigError> {
        match config {
            EffectConfig::Particles(c) => self.configure(c.clone()),
            other => Err(ConfigError::KindMismatch {
                expected: "particles",
                got: other.kind(),
            }),
        }
    }

    fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    fn apply_palette(&mut self, palette: &Palette) {
        match self.config.theme_colors {
            ThemeColors::Fixed => {}
            ThemeColors::Light => self.config.color = palette.particle_color,
            ThemeColors::Network => {
                self.config.color = palette.network_color;
                if let Some(connect) = self.config.connect.as_mut() {
                    connect.color = Some(palette.network_line_color);
                }
            }
        }
    }

    fn update(&mut self, time: f64) {
        self.step(time);
    }

    fn draw(&self, surface: &mut dyn Surface, time: f64) -> FrameStats {
        let glow = self.glow_at(time);
        let fade = self.config.lifespan.is_some();

        for p in &self.particles {
            let mut color = self.config.color.scale_alpha(p.opacity);
            if fade {
                color = color.scale_alpha(p.life_fraction());
            }
            match glow {
                Some(glow) => surface.fill_glow(p.pos, p.size + glow, color),
                None => surface.fill_circle(p.pos, p.size, color),
            }
        }

        let mut lines_drawn = 0;
        if let Some(connect) = &self.config.connect {
            let line_color = connect.color.unwrap_or(self.config.color);
            for (a, b, opacity) in self.connections() {
                surface.stroke_line(a, b, connect.width, line_color.scale_alpha(opacity));
                lines_drawn += 1;
            }
        }

        FrameStats {
            elements_drawn: self.particles.len(),
            lines_drawn,
            respawned: self.respawned_last_frame,
        }
    }

    fn len(&self) -> usize {
        self.particles.len()
    }
}

// ==================================
// Helpers pour tests
// ==================================
#[cfg(any(test, feature = "test_helpers"))]
pub trait ParticleFieldTestHelpers {
    fn particles_mut(&mut self) -> &mut [Particle];
    /// Place la particule `index` à `pos`, immobile.
    fn pin(&mut self, index: usize, pos: Vec2);
}

#[cfg(any(test, feature = "test_helpers"))]
impl ParticleFieldTestHelpers for ParticleField {
    fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    fn pin(&mut self, index: usize, pos: Vec2) {
        if let Some(p) = self.particles.get_mut(index) {
            p.pos = pos;
            p.vel = Vec2::ZERO;
        }
    }
}
