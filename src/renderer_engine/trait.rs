use crate::field_engine::types::{Rgba, Vec2};

/// 🎨 Trait `Surface`
///
/// Surface de dessin 2D sur laquelle les effets se redessinent à chaque frame.
/// Les coordonnées sont en unités logiques, origine en haut à gauche.
///
/// Le trait reste *dyn compatible* : les effets le reçoivent sous forme de
/// `&mut dyn Surface` et ignorent l'implémentation concrète (raster logiciel,
/// enregistrement de commandes, etc.).
pub trait Surface {
    /// Bornes logiques courantes `(largeur, hauteur)`.
    fn size(&self) -> Vec2;

    /// Redimensionne la surface (sans toucher aux effets).
    fn resize(&mut self, width: u32, height: u32);

    /// Efface entièrement la surface.
    fn clear(&mut self);

    /// Disque plein.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Disque à dégradé radial : opacité pleine au centre, `0.3` à mi-rayon,
    /// nulle au bord.
    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Segment de droite.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Polygone convexe plein (faces projetées du fond 3D).
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    /// Fin de frame. Par défaut, fait rien.
    fn present(&mut self) {}
}
