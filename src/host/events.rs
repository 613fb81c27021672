use crossbeam_channel::{unbounded, Receiver, Sender, TryIter};
#[cfg(debug_assertions)]
use log::debug;

use crate::field_engine::types::Vec2;
use crate::theme::Theme;

/// Cible d'un évènement : la fenêtre entière ou un conteneur précis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Container(String),
}

impl EventTarget {
    pub fn container(id: impl Into<String>) -> Self {
        EventTarget::Container(id.into())
    }
}

/// Notifications émises par la page hôte.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Position du pointeur, relative à la cible.
    PointerMove { target: EventTarget, position: Vec2 },
    PointerLeave { target: EventTarget },
    Resize {
        target: EventTarget,
        width: u32,
        height: u32,
    },
    ThemeChange(Theme),
}

impl HostEvent {
    /// Cible de l'évènement, `None` pour les évènements globaux (thème).
    pub fn target(&self) -> Option<&EventTarget> {
        match self {
            HostEvent::PointerMove { target, .. }
            | HostEvent::PointerLeave { target }
            | HostEvent::Resize { target, .. } => Some(target),
            HostEvent::ThemeChange(_) => None,
        }
    }
}

/// Abonnement d'une instance d'effet au bus.
///
/// Le `drop` ferme le canal : le bus retire l'abonné à la publication suivante.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: Receiver<HostEvent>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Vide les évènements en attente, dans l'ordre d'émission.
    pub fn drain(&self) -> TryIter<'_, HostEvent> {
        self.receiver.try_iter()
    }
}

/// Bus d'évènements hôte → effets.
///
/// Remplace les écouteurs ad hoc attachés à la fenêtre : une seule
/// souscription par instance, libérée au `stop()`.
#[derive(Debug, Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(u64, Sender<HostEvent>)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (sender, receiver) = unbounded();
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, sender));
        Subscription { id, receiver }
    }

    pub fn unsubscribe(&mut self, id: u64) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Diffuse l'évènement à tous les abonnés vivants et rend le nombre de
    /// destinataires. Les abonnés dont la `Subscription` a été libérée sont retirés.
    pub fn publish(&mut self, event: HostEvent) -> usize {
        #[cfg(debug_assertions)]
        let before = self.subscribers.len();
        self.subscribers
            .retain(|(_, sender)| sender.send(event.clone()).is_ok());
        #[cfg(debug_assertions)]
        if self.subscribers.len() != before {
            debug!(
                "EventBus pruned {} closed subscription(s)",
                before - self.subscribers.len()
            );
        }
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        let delivered = bus.publish(HostEvent::ThemeChange(Theme::Light));
        assert_eq!(delivered, 2);
        assert_eq!(a.drain().count(), 1);
        assert_eq!(b.drain().count(), 1);
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        let gone = bus.subscribe();
        drop(gone);
        assert_eq!(bus.publish(HostEvent::ThemeChange(Theme::Dark)), 1);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.drain().count(), 1);
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe();
        bus.unsubscribe(sub.id());
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(HostEvent::ThemeChange(Theme::Dark)), 0);
        assert_eq!(sub.drain().count(), 0);
    }
}
