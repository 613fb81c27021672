use log::debug;

use crate::error::ConfigError;
use crate::field_engine::{Effect, EffectConfig, FrameStats, Vec2};
use crate::host::{EventTarget, FrameHandle, FrameHost, HostEvent, Subscription};
use crate::renderer_engine::Surface;

/// État de la boucle d'animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

/// Boucle d'animation d'un effet monté dans un conteneur.
///
/// Cycle par frame : évènements → effacer → mettre à jour → dessiner → reprogrammer.
///
/// - `start()` est idempotent : une seule frame programmée à la fois ;
/// - `stop()` est idempotent : annule la frame en attente et libère l'abonnement
///   aux évènements ; la dernière frame complète reste affichée ;
/// - un rappel portant un handle périmé est ignoré.
pub struct Animator<S, E = Box<dyn Effect>>
where
    S: Surface,
    E: Effect,
{
    container_id: String,
    effect: E,
    surface: Option<S>,
    state: RunState,
    pending: Option<FrameHandle>,
    subscription: Option<Subscription>,
    frames: u64,
    last_stats: FrameStats,
}

impl<S, E> Animator<S, E>
where
    S: Surface,
    E: Effect,
{
    /// Animateur sans surface : `start()` restera sans effet jusqu'au `mount()`.
    pub fn new(container_id: impl Into<String>, effect: E) -> Self {
        Self {
            container_id: container_id.into(),
            effect,
            surface: None,
            state: RunState::Stopped,
            pending: None,
            subscription: None,
            frames: 0,
            last_stats: FrameStats::default(),
        }
    }

    pub fn mounted(container_id: impl Into<String>, effect: E, surface: S) -> Self {
        let mut animator = Self::new(container_id, effect);
        animator.mount(surface);
        animator
    }

    /// Attache la surface de dessin ; l'effet adopte ses bornes.
    pub fn mount(&mut self, surface: S) {
        self.effect.resize(surface.size());
        self.surface = Some(surface);
    }

    /// Abonnement aux évènements hôte, libéré au `stop()`.
    pub fn attach(&mut self, subscription: Subscription) {
        self.subscription = Some(subscription);
    }

    /// Remplace la configuration de l'effet.
    ///
    /// Le nouveau lot est construit d'un bloc entre deux frames : aucune frame
    /// ne mélange ancien et nouveau lot.
    pub fn configure(&mut self, config: &EffectConfig) -> Result<(), ConfigError> {
        self.effect.configure(config)?;
        debug!(
            "🔧 [{}] reconfigured ({} elements)",
            self.container_id,
            self.effect.len()
        );
        Ok(())
    }

    /// Démarre la boucle. Rend `true` si une frame vient d'être programmée.
    pub fn start<H: FrameHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.state == RunState::Running {
            return false;
        }
        if self.surface.is_none() {
            debug!("[{}] no surface mounted, start ignored", self.container_id);
            return false;
        }
        self.state = RunState::Running;
        self.pending = Some(host.request_frame());
        debug!(
            "▶️ [{}] {} effect started ({} elements)",
            self.container_id,
            self.effect.kind(),
            self.effect.len()
        );
        true
    }

    /// Arrête la boucle et libère l'abonnement.
    pub fn stop<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        self.subscription = None;
        if self.state == RunState::Running {
            self.state = RunState::Stopped;
            debug!(
                "⏹️ [{}] stopped after {} frames",
                self.container_id, self.frames
            );
        }
    }

    /// Redimensionne la surface et les bornes logiques de l'effet.
    ///
    /// Les éléments ne sont pas retirés : ceux qui se retrouvent hors bornes
    /// y sont ramenés par la politique de bord de l'effet.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
        self.effect.resize(Vec2::new(width as f32, height as f32));
    }

    /// Rappel de frame de l'hôte.
    ///
    /// Rend les statistiques de la frame dessinée, `None` si le rappel est
    /// ignoré (boucle arrêtée, handle périmé).
    pub fn on_frame<H: FrameHost + ?Sized>(
        &mut self,
        host: &mut H,
        handle: FrameHandle,
    ) -> Option<FrameStats> {
        if self.state != RunState::Running || self.pending != Some(handle) {
            return None;
        }
        self.pending = None;

        self.pump_events();

        let surface = self.surface.as_mut()?;
        let time = host.now();
        surface.clear();
        self.effect.update(time);
        let stats = self.effect.draw(surface, time);
        surface.present();

        self.frames += 1;
        self.last_stats = stats;
        self.pending = Some(host.request_frame());
        Some(stats)
    }

    /// Consomme les évènements en attente ; le dernier pointeur reçu l'emporte.
    fn pump_events(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };
        for event in subscription.drain() {
            self.handle_event(&event);
        }
        self.subscription = Some(subscription);
    }

    /// Applique un évènement hôte s'il concerne cet animateur.
    pub fn handle_event(&mut self, event: &HostEvent) {
        if let Some(target) = event.target() {
            if !self.accepts(target) {
                return;
            }
        }
        match event {
            HostEvent::PointerMove { position, .. } => self.effect.set_pointer(Some(*position)),
            HostEvent::PointerLeave { .. } => self.effect.set_pointer(None),
            HostEvent::Resize { width, height, .. } => self.resize(*width, *height),
            HostEvent::ThemeChange(theme) => self.effect.apply_palette(&theme.palette()),
        }
    }

    fn accepts(&self, target: &EventTarget) -> bool {
        match target {
            EventTarget::Window => self.effect.listens_on_window(),
            EventTarget::Container(id) => {
                !self.effect.listens_on_window() && *id == self.container_id
            }
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Nombre de frames complètes dessinées.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}
