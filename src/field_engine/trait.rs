use crate::error::ConfigError;
use crate::field_engine::config::EffectConfig;
use crate::field_engine::types::Vec2;
use crate::renderer_engine::Surface;
use crate::theme::Palette;

/// Statistiques d'une frame dessinée.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub elements_drawn: usize,
    pub lines_drawn: usize,
    pub respawned: usize,
}

/// 🔧 Trait `Effect`
///
/// Interface commune aux effets animés (champ de particules 2D, fond de solides 3D).
/// La boucle de l'`Animator` est identique pour tous :
/// effacer → mettre à jour → dessiner → reprogrammer.
///
/// Le trait est *dyn compatible* : le gestionnaire stocke des `Box<dyn Effect>`
/// hétérogènes.
pub trait Effect {
    /// Nom court du type d'effet (`"particles"`, `"geometry"`).
    fn kind(&self) -> &'static str;

    /// Remplace la configuration et régénère tout le lot d'éléments.
    ///
    /// Une configuration refusée laisse l'état courant intact.
    fn configure(&mut self, config: &EffectConfig) -> Result<(), ConfigError>;

    /// Met à jour les bornes logiques, sans retirer les éléments.
    fn resize(&mut self, bounds: Vec2);

    /// Position du pointeur relative à la surface (`None` quand il la quitte).
    fn set_pointer(&mut self, pointer: Option<Vec2>);

    /// Applique les couleurs d'un thème sans recréer les éléments.
    fn apply_palette(&mut self, palette: &Palette);

    /// Avance la simulation d'une frame. `time` : horloge monotone en secondes.
    fn update(&mut self, time: f64);

    /// Dessine l'état courant. La surface a déjà été effacée.
    fn draw(&self, surface: &mut dyn Surface, time: f64) -> FrameStats;

    /// Les évènements pointeur/redimensionnement écoutés sont-ils ceux de la
    /// fenêtre (et non ceux du conteneur) ?
    fn listens_on_window(&self) -> bool {
        false
    }

    /// Nombre d'éléments animés.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Effect + ?Sized> Effect for Box<T> {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }
    fn configure(&mut self, config: &EffectConfig) -> Result<(), ConfigError> {
        (**self).configure(config)
    }
    fn resize(&mut self, bounds: Vec2) {
        (**self).resize(bounds)
    }
    fn set_pointer(&mut self, pointer: Option<Vec2>) {
        (**self).set_pointer(pointer)
    }
    fn apply_palette(&mut self, palette: &Palette) {
        (**self).apply_palette(palette)
    }
    fn update(&mut self, time: f64) {
        (**self).update(time)
    }
    fn draw(&self, surface: &mut dyn Surface, time: f64) -> FrameStats {
        (**self).draw(surface, time)
    }
    fn listens_on_window(&self) -> bool {
        (**self).listens_on_window()
    }
    fn len(&self) -> usize {
        (**self).len()
    }
}
