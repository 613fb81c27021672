/// Identifiant d'un rappel de frame programmé (équivalent de l'id renvoyé par
/// `requestAnimationFrame`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Hôte fournissant le rappel de frame : programmation, annulation et
/// horloge monotone.
pub trait FrameHost {
    /// Programme un rappel pour la prochaine frame d'affichage.
    fn request_frame(&mut self) -> FrameHandle;

    /// Annule un rappel programmé ; sans effet s'il a déjà été consommé.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Temps monotone écoulé, en secondes.
    fn now(&self) -> f64;
}
