use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EffectError;
use crate::field_engine::types::Vec2;

/// Conteneur de la page dans lequel une surface peut être montée.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    /// Coin haut-gauche dans les coordonnées de la fenêtre.
    #[serde(default)]
    pub origin: Vec2,
    pub width: u32,
    pub height: u32,
}

impl Container {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            origin: Vec2::ZERO,
            width,
            height,
        }
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }
}

/// Registre des conteneurs connus de la page hôte.
#[derive(Debug, Clone, Default)]
pub struct Page {
    containers: HashMap<String, Container>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.insert(container);
        self
    }

    pub fn insert(&mut self, container: Container) {
        self.containers.insert(container.id.clone(), container);
    }

    pub fn remove(&mut self, id: &str) -> Option<Container> {
        self.containers.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    /// Monte une surface dans le conteneur `id`.
    ///
    /// Un conteneur absent donne `EffectError::Mount`, que l'appelant traite
    /// comme un no-op journalisé.
    pub fn mount<S>(
        &self,
        id: &str,
        make_surface: impl FnOnce(&Container) -> S,
    ) -> Result<(Container, S), EffectError> {
        let container = self
            .containers
            .get(id)
            .ok_or_else(|| EffectError::Mount(id.to_string()))?;
        Ok((container.clone(), make_surface(container)))
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
