use std::collections::HashMap;

use generational_arena::{Arena, Index};
use log::{info, warn};

use crate::animator::Animator;
use crate::error::EffectError;
use crate::field_engine::{build_effect, Effect, EffectConfig, FrameStats, Vec2};
use crate::host::{Container, EventBus, FrameHandle, FrameHost, HostEvent, Page, SimulatedHost};
use crate::renderer_engine::Surface;
use crate::theme::Theme;

/// Registre des effets actifs de la page, indexé par conteneur.
///
/// Les instances vivent dans une `Arena` : un `Index` détruit n'est jamais
/// réattribué, ce qui rend inoffensifs les identifiants conservés trop longtemps.
pub struct EffectsManager<S: Surface> {
    instances: Arena<Animator<S>>,
    by_container: HashMap<String, Index>,
    bus: EventBus,
    theme: Theme,
}

impl<S: Surface> Default for EffectsManager<S> {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl<S: Surface> EffectsManager<S> {
    pub fn new(theme: Theme) -> Self {
        Self {
            instances: Arena::new(),
            by_container: HashMap::new(),
            bus: EventBus::new(),
            theme,
        }
    }

    /// Crée, monte et démarre un effet dans le conteneur `container_id`.
    ///
    /// Conteneur absent ou configuration invalide : avertissement journalisé
    /// et `None`, sans effet sur les autres instances.
    pub fn create<H, F>(
        &mut self,
        page: &Page,
        container_id: &str,
        config: &EffectConfig,
        host: &mut H,
        make_surface: F,
    ) -> Option<Index>
    where
        H: FrameHost + ?Sized,
        F: FnOnce(&Container) -> S,
    {
        match self.try_create(page, container_id, config, host, make_surface) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!("⚠️ Effect not created in '{}': {}", container_id, e);
                None
            }
        }
    }

    /// Variante de `create` qui rend l'erreur au lieu de la journaliser.
    ///
    /// Un effet déjà présent dans le conteneur est arrêté puis remplacé.
    pub fn try_create<H, F>(
        &mut self,
        page: &Page,
        container_id: &str,
        config: &EffectConfig,
        host: &mut H,
        make_surface: F,
    ) -> Result<Index, EffectError>
    where
        H: FrameHost + ?Sized,
        F: FnOnce(&Container) -> S,
    {
        let (container, surface) = page.mount(container_id, make_surface)?;
        let bounds = Vec2::new(container.width as f32, container.height as f32);
        let mut effect = build_effect(config, bounds)?;
        effect.apply_palette(&self.theme.palette());

        self.destroy(container_id, host);

        let mut animator = Animator::mounted(container_id, effect, surface);
        animator.attach(self.bus.subscribe());
        animator.start(host);

        let index = self.instances.insert(animator);
        self.by_container.insert(container_id.to_string(), index);
        info!(
            "✨ {} effect created in '{}' ({} active)",
            config.kind(),
            container_id,
            self.instances.len()
        );
        Ok(index)
    }

    /// Arrête et retire l'effet du conteneur. Rend `false` s'il n'y en avait pas.
    pub fn destroy<H: FrameHost + ?Sized>(&mut self, container_id: &str, host: &mut H) -> bool {
        let Some(index) = self.by_container.remove(container_id) else {
            return false;
        };
        match self.instances.remove(index) {
            Some(mut animator) => {
                animator.stop(host);
                info!("🗑️ Effect destroyed in '{}'", container_id);
                true
            }
            None => false,
        }
    }

    pub fn destroy_all<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        let ids: Vec<String> = self.by_container.keys().cloned().collect();
        for id in ids {
            self.destroy(&id, host);
        }
    }

    /// Reprend la boucle d'un effet arrêté, avec un nouvel abonnement.
    pub fn start<H: FrameHost + ?Sized>(&mut self, container_id: &str, host: &mut H) -> bool {
        let Some(index) = self.by_container.get(container_id).copied() else {
            return false;
        };
        let Some(animator) = self.instances.get_mut(index) else {
            return false;
        };
        if animator.is_running() {
            return false;
        }
        animator.attach(self.bus.subscribe());
        animator.start(host)
    }

    pub fn stop<H: FrameHost + ?Sized>(&mut self, container_id: &str, host: &mut H) -> bool {
        match self.get_mut(container_id) {
            Some(animator) => {
                animator.stop(host);
                true
            }
            None => false,
        }
    }

    /// Reconfigure l'effet du conteneur ; une erreur laisse l'effet intact.
    ///
    /// Le nouveau lot reprend les couleurs du thème courant.
    pub fn configure(&mut self, container_id: &str, config: &EffectConfig) -> Result<(), EffectError> {
        let palette = self.theme.palette();
        let animator = self
            .get_mut(container_id)
            .ok_or_else(|| EffectError::Mount(container_id.to_string()))?;
        animator.configure(config)?;
        animator.effect_mut().apply_palette(&palette);
        Ok(())
    }

    /// Change de thème et recolore tous les effets actifs, sans les recréer.
    pub fn update_all(&mut self, theme: Theme) {
        self.theme = theme;
        let palette = theme.palette();
        for (_, animator) in self.instances.iter_mut() {
            animator.effect_mut().apply_palette(&palette);
        }
        info!(
            "🎨 Theme {:?} applied to {} effect(s)",
            theme,
            self.instances.len()
        );
    }

    /// Diffuse un évènement hôte ; rend le nombre d'abonnés atteints.
    pub fn publish(&mut self, event: HostEvent) -> usize {
        self.bus.publish(event)
    }

    /// Aiguille un rappel de frame vers l'instance qui l'attend.
    pub fn on_frame<H: FrameHost + ?Sized>(
        &mut self,
        host: &mut H,
        handle: FrameHandle,
    ) -> Option<FrameStats> {
        self.instances
            .iter_mut()
            .find(|(_, animator)| animator.pending_frame() == Some(handle))
            .and_then(|(_, animator)| animator.on_frame(host, handle))
    }

    /// Avance l'hôte simulé d'une frame et exécute les rappels dus.
    ///
    /// Rend les statistiques cumulées des frames dessinées.
    pub fn tick(&mut self, host: &mut SimulatedHost) -> FrameStats {
        let mut total = FrameStats::default();
        for handle in host.tick() {
            if let Some(stats) = self.on_frame(host, handle) {
                total.elements_drawn += stats.elements_drawn;
                total.lines_drawn += stats.lines_drawn;
                total.respawned += stats.respawned;
            }
        }
        total
    }

    pub fn get(&self, container_id: &str) -> Option<&Animator<S>> {
        self.by_container
            .get(container_id)
            .and_then(|index| self.instances.get(*index))
    }

    pub fn get_mut(&mut self, container_id: &str) -> Option<&mut Animator<S>> {
        let index = *self.by_container.get(container_id)?;
        self.instances.get_mut(index)
    }

    pub fn get_by_index(&self, index: Index) -> Option<&Animator<S>> {
        self.instances.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animator<S>> {
        self.instances.iter().map(|(_, animator)| animator)
    }

    pub fn contains(&self, container_id: &str) -> bool {
        self.by_container.contains_key(container_id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Abonnés vivants du bus (un par instance démarrée).
    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }
}
