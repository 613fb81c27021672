#[cfg(debug_assertions)]
use log::debug;
use std::collections::BTreeSet;

use crate::host::{FrameHandle, FrameHost};

/// Hôte simulé à fréquence de rafraîchissement fixe.
///
/// Les rappels programmés s'accumulent ; `tick()` avance l'horloge d'une
/// période et rend les handles à exécuter pour cette frame (ceux programmés
/// pendant l'exécution attendront la frame suivante).
#[derive(Debug)]
pub struct SimulatedHost {
    refresh_rate: f64,
    time: f64,
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
    registrations: u64,
    cancellations: u64,
    ticks: u64,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl SimulatedHost {
    pub fn new(refresh_rate: f64) -> Self {
        Self {
            refresh_rate: if refresh_rate > 0.0 { refresh_rate } else { 60.0 },
            time: 0.0,
            next_id: 1,
            pending: BTreeSet::new(),
            registrations: 0,
            cancellations: 0,
            ticks: 0,
        }
    }

    /// Avance d'une frame et rend les rappels dus.
    pub fn tick(&mut self) -> Vec<FrameHandle> {
        self.ticks += 1;
        self.time += 1.0 / self.refresh_rate;
        let due: Vec<_> = std::mem::take(&mut self.pending).into_iter().collect();
        #[cfg(debug_assertions)]
        if due.is_empty() {
            debug!("Tick {} without pending frame callback", self.ticks);
        }
        due
    }

    /// Nombre total d'appels à `request_frame`.
    pub fn registrations(&self) -> u64 {
        self.registrations
    }

    pub fn cancellations(&self) -> u64 {
        self.cancellations
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn refresh_rate(&self) -> f64 {
        self.refresh_rate
    }
}

impl FrameHost for SimulatedHost {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.registrations += 1;
        self.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.remove(&handle) {
            self.cancellations += 1;
        }
    }

    fn now(&self) -> f64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_drains_pending_and_advances_time() {
        let mut host = SimulatedHost::new(50.0);
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.tick(), vec![a, b]);
        assert!((host.now() - 0.02).abs() < 1e-9);
        assert!(host.tick().is_empty());
    }

    #[test]
    fn test_cancelled_frame_never_fires() {
        let mut host = SimulatedHost::default();
        let handle = host.request_frame();
        host.cancel_frame(handle);
        host.cancel_frame(handle);
        assert_eq!(host.cancellations(), 1);
        assert!(host.tick().is_empty());
    }
}
