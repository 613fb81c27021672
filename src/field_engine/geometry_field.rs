#[cfg(debug_assertions)]
use log::debug;
use glam::{EulerRot, Mat4, Quat, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigError;
use crate::field_engine::{
    config::{EffectConfig, GeometryConfig},
    solid::{Mesh, SolidKind},
    types::{Rgba, Vec2, Vec3},
    Effect, FrameStats,
};
use crate::renderer_engine::Surface;
use crate::theme::{Palette, Theme};

/// Rayon des maillages avant mise à l'échelle.
const SOLID_RADIUS: f32 = 2.0;
const AMBIENT_LIGHT: f32 = 0.5;
const PULSE_AMPLITUDE: f32 = 0.1;
/// Lampes ponctuelles colorées : position monde, couleur, portée.
const POINT_LIGHTS: [(Vec3, u32, f32); 2] = [
    (Vec3::new(10.0, 10.0, 10.0), 0x6366f1, 50.0),
    (Vec3::new(-10.0, -10.0, -10.0), 0x10b981, 50.0),
];

/// Un solide animé du fond.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub kind: SolidKind,
    pub position: Vec3,
    /// Angles d'Euler XYZ.
    pub rotation: Vec3,
    pub rotation_speed: Vec3,
    pub float_speed: f32,
    /// Déphasage dans `[0, 2π)`, partagé par flottement, pulsation et teinte.
    pub float_offset: f32,
    pub base_scale: f32,
    pub scale: f32,
    pub color: Rgba,
}

impl Solid {
    fn seed(rng: &mut impl Rng, config: &GeometryConfig) -> Self {
        let kind = SolidKind::ALL[rng.random_range(0..SolidKind::ALL.len())];
        let color = config.palette[rng.random_range(0..config.palette.len())];
        let rot_speed = config.max_rotation_speed;
        let base_scale = config.scale.lerp(rng.random::<f32>());
        Self {
            kind,
            position: Vec3::new(
                centered(rng, config.spread.x),
                centered(rng, config.spread.y),
                centered(rng, config.spread.z),
            ),
            rotation: Vec3::new(
                rng.random::<f32>() * std::f32::consts::PI,
                rng.random::<f32>() * std::f32::consts::PI,
                0.0,
            ),
            rotation_speed: Vec3::new(
                centered(rng, rot_speed),
                centered(rng, rot_speed),
                centered(rng, rot_speed),
            ),
            float_speed: config.float_speed.lerp(rng.random::<f32>()),
            float_offset: rng.random::<f32>() * std::f32::consts::TAU,
            base_scale,
            scale: base_scale,
            color,
        }
    }

    fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z),
            self.position,
        )
    }
}

/// Face projetée, prête à être triée puis dessinée.
struct ProjectedFace {
    points: [Vec2; 3],
    depth: f32,
    color: Rgba,
}

/// Fond de solides en rotation.
///
/// Même boucle que le champ de particules, avec des transformations 3D :
/// rotation propre, flottement vertical sinusoïdal, pulsation d'échelle,
/// défilement de teinte. Le groupe entier s'oriente en douceur vers le pointeur.
#[derive(Debug)]
pub struct GeometryField {
    config: GeometryConfig,
    solids: Vec<Solid>,
    meshes: Vec<Mesh>,
    viewport: Vec2,
    group_rotation: Vec2,
    target_rotation: Vec2,
    opacity: f32,
    emissive: Rgba,
    rng: StdRng,
    generation: u32,
}

impl GeometryField {
    pub fn new(config: GeometryConfig, viewport: Vec2) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = Theme::default().palette();
        let mut field = Self {
            rng: make_rng(config.seed),
            config: GeometryConfig::default(),
            solids: Vec::new(),
            meshes: SolidKind::ALL
                .iter()
                .map(|kind| kind.mesh(SOLID_RADIUS))
                .collect(),
            viewport,
            group_rotation: Vec2::ZERO,
            target_rotation: Vec2::ZERO,
            opacity: palette.solid_opacity,
            emissive: palette.solid_emissive,
            generation: 0,
        };
        field.configure(config)?;
        Ok(field)
    }

    /// Valide puis régénère tous les solides.
    pub fn configure(&mut self, config: GeometryConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if config.seed.is_some() {
            self.rng = make_rng(config.seed);
        }
        let solids: Vec<Solid> = (0..config.solid_count)
            .map(|_| Solid::seed(&mut self.rng, &config))
            .collect();

        #[cfg(debug_assertions)]
        debug!("GeometryField configured: {} solids", solids.len());

        self.solids = solids;
        self.config = config;
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn group_rotation(&self) -> Vec2 {
        self.group_rotation
    }

    pub fn target_rotation(&self) -> Vec2 {
        self.target_rotation
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn emissive(&self) -> Rgba {
        self.emissive
    }

    fn view_projection(&self) -> Mat4 {
        let aspect = if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        };
        let projection =
            Mat4::perspective_rh(self.config.fov_degrees.to_radians(), aspect, 0.1, 1000.0);
        let view = Mat4::look_at_rh(self.camera_position(), Vec3::ZERO, Vec3::Y);
        projection * view
    }

    fn camera_position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.config.camera_distance)
    }

    /// Projette, éclaire et trie (du plus lointain au plus proche) les faces visibles.
    fn project_faces(&self) -> Vec<ProjectedFace> {
        let view_projection = self.view_projection();
        let group = Mat4::from_euler(
            EulerRot::XYZ,
            self.group_rotation.x,
            self.group_rotation.y,
            0.0,
        );
        let camera = self.camera_position();
        let light = Vec3::new(0.0, 1.0, 1.0).normalize();
        let viewport = self.viewport;

        let to_screen = |world: Vec3| -> Option<(Vec2, f32)> {
            let clip: Vec4 = view_projection * world.extend(1.0);
            if clip.w <= 0.0 {
                return None;
            }
            let ndc = clip.truncate() / clip.w;
            Some((
                Vec2::new(
                    (ndc.x + 1.0) * 0.5 * viewport.x,
                    (1.0 - ndc.y) * 0.5 * viewport.y,
                ),
                clip.w,
            ))
        };

        let mut faces = Vec::new();
        for solid in &self.solids {
            let model = group * solid.model_matrix();
            let mesh = &self.meshes[solid.kind.index()];
            let world: Vec<Vec3> = mesh
                .vertices
                .iter()
                .map(|v| model.transform_point3(*v))
                .collect();

            for [a, b, c] in &mesh.faces {
                let (a, b, c) = (world[*a], world[*b], world[*c]);
                let normal = (b - a).cross(c - a).normalize_or_zero();
                // Élimination des faces arrière
                if normal.dot(camera - a) <= 0.0 {
                    continue;
                }
                let (Some((pa, wa)), Some((pb, wb)), Some((pc, wc))) =
                    (to_screen(a), to_screen(b), to_screen(c))
                else {
                    continue;
                };
                let center = (a + b + c) / 3.0;
                let lit = POINT_LIGHTS.iter().fold(
                    Vec3::splat(AMBIENT_LIGHT + normal.dot(light).max(0.0)),
                    |lit, (position, hex, range)| {
                        let tint = Rgba::from_hex(*hex);
                        lit + Vec3::new(tint.r, tint.g, tint.b)
                            * point_light(center, normal, *position, *range)
                    },
                );
                let color = Rgba::new(
                    (solid.color.r * lit.x + self.emissive.r).min(1.0),
                    (solid.color.g * lit.y + self.emissive.g).min(1.0),
                    (solid.color.b * lit.z + self.emissive.b).min(1.0),
                    self.opacity,
                );
                faces.push(ProjectedFace {
                    points: [pa, pb, pc],
                    depth: (wa + wb + wc) / 3.0,
                    color,
                });
            }
        }

        faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        faces
    }
}

/// Éclairage diffus d'une lampe ponctuelle, nul au-delà de `range`.
fn point_light(point: Vec3, normal: Vec3, position: Vec3, range: f32) -> f32 {
    let to_light = position - point;
    let distance = to_light.length();
    if distance <= f32::EPSILON || distance >= range {
        return 0.0;
    }
    let falloff = (1.0 - distance / range).powi(2);
    normal.dot(to_light / distance).max(0.0) * falloff
}

/// Tirage uniforme dans `[-half, half]`.
fn centered(rng: &mut impl Rng, half: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0 * half
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

// ==================================
// Trait Effect
// ==================================
impl Effect for GeometryField {
    fn kind(&self) -> &'static str {
        "geometry"
    }

    fn configure(&mut self, config: &EffectConfig) -> Result<(), ConfigError> {
        match config {
            EffectConfig::Geometry(c) => self.configure(c.clone()),
            other => Err(ConfigError::KindMismatch {
                expected: "geometry",
                got: other.kind(),
            }),
        }
    }

    fn resize(&mut self, bounds: Vec2) {
        self.viewport = bounds;
    }

    /// Le pointeur (coordonnées fenêtre) fixe la rotation cible du groupe.
    /// Quand il quitte la fenêtre, la dernière cible est conservée.
    fn set_pointer(&mut self, pointer: Option<Vec2>) {
        let Some(pointer) = pointer else {
            return;
        };
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return;
        }
        let ndc = Vec2::new(
            pointer.x / self.viewport.x * 2.0 - 1.0,
            -(pointer.y / self.viewport.y) * 2.0 + 1.0,
        );
        self.target_rotation = Vec2::new(ndc.y * 0.5, ndc.x * 0.5);
    }

    fn apply_palette(&mut self, palette: &Palette) {
        self.opacity = palette.solid_opacity;
        self.emissive = palette.solid_emissive;
    }

    fn update(&mut self, time: f64) {
        let t = time as f32;
        self.group_rotation += (self.target_rotation - self.group_rotation) * self.config.pointer_ease;

        for solid in self.solids.iter_mut() {
            solid.rotation += solid.rotation_speed;
            solid.position.y += (t + solid.float_offset).sin() * solid.float_speed;
            solid.scale =
                solid.base_scale * (1.0 + (t * 2.0 + solid.float_offset).sin() * PULSE_AMPLITUDE);
            let hue = (t * self.config.hue_rate + solid.float_offset).rem_euclid(1.0);
            solid.color = Rgba::from_hsl(hue, 0.5, 0.5);
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _time: f64) -> FrameStats {
        for face in self.project_faces() {
            surface.fill_polygon(&face.points, face.color);
        }
        FrameStats {
            elements_drawn: self.solids.len(),
            ..FrameStats::default()
        }
    }

    fn listens_on_window(&self) -> bool {
        true
    }

    fn len(&self) -> usize {
        self.solids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: usize) -> GeometryField {
        GeometryField::new(
            GeometryConfig {
                solid_count: count,
                seed: Some(11),
                ..GeometryConfig::default()
            },
            Vec2::new(800.0, 600.0),
        )
        .unwrap()
    }

    #[test]
    fn test_solids_spawn_inside_spread() {
        let field = seeded(50);
        assert_eq!(field.solids().len(), 50);
        for s in field.solids() {
            assert!(s.position.x.abs() <= 20.0);
            assert!(s.position.y.abs() <= 20.0);
            assert!(s.position.z.abs() <= 10.0);
            assert!(s.rotation_speed.abs().max_element() <= 0.01);
            assert!((0.0..std::f32::consts::TAU).contains(&s.float_offset));
        }
    }

    #[test]
    fn test_point_light_falloff() {
        let light = Vec3::new(10.0, 0.0, 0.0);
        let facing = point_light(Vec3::ZERO, Vec3::X, light, 50.0);
        let farther = point_light(Vec3::new(-20.0, 0.0, 0.0), Vec3::X, light, 50.0);
        assert!((facing - 0.64).abs() < 1e-6);
        assert!(farther > 0.0 && farther < facing);
        assert_eq!(point_light(Vec3::ZERO, -Vec3::X, light, 50.0), 0.0);
        assert_eq!(point_light(Vec3::new(-45.0, 0.0, 0.0), Vec3::X, light, 50.0), 0.0);
    }

    #[test]
    fn test_pointer_center_gives_zero_target() {
        let mut field = seeded(1);
        field.set_pointer(Some(Vec2::new(400.0, 300.0)));
        assert!(field.target_rotation().length() < 1e-6);
        field.set_pointer(Some(Vec2::new(800.0, 0.0)));
        assert!((field.target_rotation() - Vec2::new(0.5, 0.5)).length() < 1e-6);
    }
}
