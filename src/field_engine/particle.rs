use rand::Rng;
use std::f32::consts::TAU;

use crate::field_engine::config::FieldConfig;
use crate::field_engine::types::Vec2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub life: f32,
    pub max_life: f32,

    /// Génération de configuration qui a tiré cette particule.
    pub generation: u32,
}

impl Particle {
    /// Tire une particule uniformément dans `[0, width] x [0, height]`,
    /// vitesse dans l'intervalle configuré, vie pleine.
    pub fn seed(
        rng: &mut impl Rng,
        config: &FieldConfig,
        bounds: Vec2,
        generation: u32,
    ) -> Self {
        let life = config.lifespan.unwrap_or(0.0);
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * bounds.x.max(0.0),
                rng.random::<f32>() * bounds.y.max(0.0),
            ),
            vel: random_velocity(rng, config),
            size: config.size.lerp(rng.random::<f32>()),
            opacity: config.opacity.lerp(rng.random::<f32>()),
            life,
            max_life: life,
            generation,
        }
    }

    /// Variante du lot initial : vie décalée aléatoirement dans `[0, lifespan]`
    /// pour que les particules ne meurent pas toutes à la même frame.
    pub fn seed_staggered(
        rng: &mut impl Rng,
        config: &FieldConfig,
        bounds: Vec2,
        generation: u32,
    ) -> Self {
        let mut p = Self::seed(rng, config, bounds, generation);
        if p.max_life > 0.0 {
            p.life = rng.random::<f32>() * p.max_life;
        }
        p
    }

    /// Une particule sans durée de vie configurée ne meurt jamais.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.max_life > 0.0 && self.life <= 0.0
    }

    /// Fraction de vie restante, `1.0` sans durée de vie.
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Direction uniforme sur le cercle, norme tirée dans `config.speed`.
fn random_velocity(rng: &mut impl Rng, config: &FieldConfig) -> Vec2 {
    let speed = config.speed.lerp(rng.random::<f32>());
    Vec2::from_angle(rng.random::<f32>() * TAU) * speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_engine::types::ValueRange;
    use rand::SeedableRng;

    #[test]
    fn test_seed_within_bounds_and_ranges() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let config = FieldConfig {
            size: ValueRange::new(2.0, 4.0),
            speed: ValueRange::new(0.5, 1.0),
            lifespan: Some(3.0),
            ..FieldConfig::default()
        };
        for _ in 0..200 {
            let p = Particle::seed(&mut rng, &config, Vec2::new(640.0, 480.0), 1);
            assert!((0.0..=640.0).contains(&p.pos.x));
            assert!((0.0..=480.0).contains(&p.pos.y));
            assert!(config.size.contains(p.size));
            let speed = p.vel.length();
            assert!(speed >= 0.5 - 1e-5 && speed <= 1.0 + 1e-5, "speed {}", speed);
            assert_eq!(p.life, 3.0);
            assert_eq!(p.generation, 1);
        }
    }

    #[test]
    fn test_fixed_speed_gives_constant_norm() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let config = FieldConfig {
            speed: ValueRange::fixed(1.0),
            ..FieldConfig::default()
        };
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for _ in 0..1000 {
            let p = Particle::seed(&mut rng, &config, Vec2::splat(100.0), 0);
            assert!((p.vel.length() - 1.0).abs() < 1e-5);
            min_x = min_x.min(p.vel.x);
            max_x = max_x.max(p.vel.x);
        }
        // toutes les directions sont tirées
        assert!(min_x < -0.9 && max_x > 0.9);
    }

    #[test]
    fn test_immortal_without_lifespan() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let p = Particle::seed(&mut rng, &FieldConfig::default(), Vec2::splat(100.0), 0);
        assert!(!p.is_dead());
        assert_eq!(p.life_fraction(), 1.0);
    }
}
