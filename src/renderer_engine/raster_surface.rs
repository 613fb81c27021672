use std::path::Path;

use image::{Rgba as Pixel, RgbaImage};
use log::debug;

use crate::error::EffectError;
use crate::field_engine::types::{Rgba, Vec2};
use crate::renderer_engine::Surface;

/// Surface logicielle : rasterise dans une image RGBA 8 bits (fond transparent),
/// avec anticrénelage simple sur les bords et composition *source-over*.
///
/// Sert de cible au binaire headless, qui exporte des instantanés PNG.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel `(x, y)`, transparent hors image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| p.0)
            .unwrap_or([0; 4])
    }

    /// Nombre de pixels non transparents.
    pub fn covered_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] > 0).count()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), EffectError> {
        let path = path.as_ref();
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        debug!("🖼️ Snapshot written to {}", path.display());
        Ok(())
    }

    /// Composition source-over d'une couleur avec une couverture `[0, 1]`.
    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let sa = (color.a * coverage).clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let [dr, dg, db, da] = dst.0.map(|c| c as f32 / 255.0);
        let out_a = sa + da * (1.0 - sa);
        let mix = |s: f32, d: f32| (s * sa + d * da * (1.0 - sa)) / out_a;
        *dst = Pixel(
            Rgba::new(
                mix(color.r, dr),
                mix(color.g, dg),
                mix(color.b, db),
                out_a,
            )
            .to_rgba8(),
        );
    }

    /// Parcourt les centres de pixels de la boîte englobante `[min, max]`.
    fn for_each_pixel(
        &mut self,
        min: Vec2,
        max: Vec2,
        mut coverage: impl FnMut(Vec2) -> Option<(Rgba, f32)>,
    ) {
        let x0 = min.x.floor().max(0.0) as i64;
        let y0 = min.y.floor().max(0.0) as i64;
        let x1 = (max.x.ceil() as i64).min(self.image.width() as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.image.height() as i64 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((color, cov)) = coverage(center) {
                    self.blend(x, y, color, cov);
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != self.image.dimensions() {
            self.image = RgbaImage::new(width, height);
        }
    }

    fn clear(&mut self) {
        self.image.pixels_mut().for_each(|p| *p = Pixel([0; 4]));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let extent = Vec2::splat(radius + 1.0);
        self.for_each_pixel(center - extent, center + extent, |p| {
            let cov = (radius - p.distance(center) + 0.5).clamp(0.0, 1.0);
            (cov > 0.0).then_some((color, cov))
        });
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let extent = Vec2::splat(radius);
        self.for_each_pixel(center - extent, center + extent, |p| {
            let t = p.distance(center) / radius;
            let alpha = if t <= 0.5 {
                1.0 - 1.4 * t
            } else if t <= 1.0 {
                0.3 * (1.0 - t) * 2.0
            } else {
                return None;
            };
            Some((color, alpha))
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if !from.is_finite() || !to.is_finite() {
            return;
        }
        let half = (width * 0.5).max(0.5);
        let extent = Vec2::splat(half + 1.0);
        let seg = to - from;
        let len_sq = seg.length_squared();
        self.for_each_pixel(from.min(to) - extent, from.max(to) + extent, |p| {
            let t = if len_sq > 0.0 {
                ((p - from).dot(seg) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let d = p.distance(from + seg * t);
            let cov = (half - d + 0.5).clamp(0.0, 1.0) * width.min(1.0);
            (cov > 0.0).then_some((color, cov))
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            return;
        }
        let (min, max) = points
            .iter()
            .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });
        // Orientation du polygone (aire signée)
        let area: f32 = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(a, b)| a.perp_dot(*b))
            .sum();
        if area == 0.0 {
            return;
        }
        let sign = area.signum();
        self.for_each_pixel(min, max, |p| {
            let inside = points
                .iter()
                .zip(points.iter().cycle().skip(1))
                .all(|(a, b)| (*b - *a).perp_dot(p - *a) * sign >= 0.0);
            inside.then_some((color, 1.0))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_covers_center_only() {
        let mut surface = RasterSurface::new(32, 32);
        surface.fill_circle(Vec2::new(16.0, 16.0), 4.0, Rgba::WHITE);
        assert_eq!(surface.pixel(16, 16), [255, 255, 255, 255]);
        assert_eq!(surface.pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_clear_resets_pixels() {
        let mut surface = RasterSurface::new(8, 8);
        surface.fill_circle(Vec2::new(4.0, 4.0), 3.0, Rgba::WHITE);
        assert!(surface.covered_pixels() > 0);
        surface.clear();
        assert_eq!(surface.covered_pixels(), 0);
    }

    #[test]
    fn test_polygon_either_winding() {
        let square = [
            Vec2::new(2.0, 2.0),
            Vec2::new(10.0, 2.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(2.0, 10.0),
        ];
        let mut cw = RasterSurface::new(12, 12);
        cw.fill_polygon(&square, Rgba::BLACK);
        let mut reversed = square;
        reversed.reverse();
        let mut ccw = RasterSurface::new(12, 12);
        ccw.fill_polygon(&reversed, Rgba::BLACK);
        assert_eq!(cw.covered_pixels(), 64);
        assert_eq!(ccw.covered_pixels(), 64);
    }

    #[test]
    fn test_drawing_outside_is_clipped() {
        let mut surface = RasterSurface::new(8, 8);
        surface.fill_circle(Vec2::new(-50.0, -50.0), 4.0, Rgba::WHITE);
        surface.stroke_line(Vec2::new(-10.0, -10.0), Vec2::new(-1.0, -20.0), 1.0, Rgba::WHITE);
        assert_eq!(surface.covered_pixels(), 0);
    }
}
