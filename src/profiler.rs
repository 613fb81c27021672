use log::info;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Instant;

/// Statistiques d'une série : moyenne, min, max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesSummary {
    fn of(series: &VecDeque<f64>) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        let (sum, min, max) = series.iter().fold(
            (0.0, f64::INFINITY, f64::NEG_INFINITY),
            |(sum, min, max), v| (sum + v, min.min(*v), max.max(*v)),
        );
        Some(Self {
            avg: sum / series.len() as f64,
            min,
            max,
        })
    }
}

#[derive(Debug, Default)]
struct ProfilerInner {
    /// Durées des blocs labelisés (ms)
    timings: BTreeMap<String, VecDeque<f64>>,
    /// Compteurs par frame (particules dessinées, lignes, ...)
    counters: BTreeMap<String, VecDeque<f64>>,
    frame_times: VecDeque<f64>,
    max_samples: usize,
}

fn push_bounded(series: &mut VecDeque<f64>, value: f64, max_samples: usize) {
    if series.len() >= max_samples {
        series.pop_front();
    }
    series.push_back(value);
}

/// Profiler de frames pour la boucle d'animation (mono-thread).
///
/// Garde les `max_samples` dernières valeurs de chaque série.
#[derive(Debug, Clone)]
pub struct Profiler {
    inner: Rc<RefCell<ProfilerInner>>,
}

impl Profiler {
    pub fn new(max_samples: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ProfilerInner {
                max_samples: max_samples.max(1),
                ..ProfilerInner::default()
            })),
        }
    }

    /// Mesure d'une frame complète (RAII).
    pub fn frame(&self) -> FrameGuard {
        FrameGuard {
            profiler: self.clone(),
            start: Instant::now(),
        }
    }

    /// Exécute `f` et enregistre sa durée sous `label`.
    pub fn profile_block<T>(&self, label: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        let mut inner = self.inner.borrow_mut();
        let max_samples = inner.max_samples;
        push_bounded(
            inner.timings.entry(label.to_string()).or_default(),
            ms,
            max_samples,
        );
        result
    }

    /// Enregistre un compteur de frame.
    pub fn record_count(&self, label: &str, value: usize) {
        let mut inner = self.inner.borrow_mut();
        let max_samples = inner.max_samples;
        push_bounded(
            inner.counters.entry(label.to_string()).or_default(),
            value as f64,
            max_samples,
        );
    }

    /// FPS moyen sur la fenêtre d'échantillons (temps de calcul, pas d'affichage).
    pub fn fps(&self) -> f64 {
        match SeriesSummary::of(&self.inner.borrow().frame_times) {
            Some(s) if s.avg > 0.0 => 1000.0 / s.avg,
            _ => 0.0,
        }
    }

    pub fn frames_sampled(&self) -> usize {
        self.inner.borrow().frame_times.len()
    }

    pub fn timing(&self, label: &str) -> Option<SeriesSummary> {
        self.inner
            .borrow()
            .timings
            .get(label)
            .and_then(SeriesSummary::of)
    }

    pub fn count(&self, label: &str) -> Option<SeriesSummary> {
        self.inner
            .borrow()
            .counters
            .get(label)
            .and_then(SeriesSummary::of)
    }

    /// Journalise toutes les séries sous le target `target`.
    pub fn log_metrics_for_target(&self, target: &str, show_fps: bool) {
        if show_fps {
            info!(target: target, "{:.2} FPS (compute)", self.fps());
        }
        let inner = self.inner.borrow();
        for (label, series) in &inner.timings {
            if let Some(s) = SeriesSummary::of(series) {
                info!(
                    target: target,
                    "{}: avg = {:.3} ms | min = {:.3} ms | max = {:.3} ms",
                    label, s.avg, s.min, s.max
                );
            }
        }
        for (label, series) in &inner.counters {
            if let Some(s) = SeriesSummary::of(series) {
                info!(
                    target: target,
                    "{}: avg = {:.1} | min = {} | max = {}",
                    label, s.avg, s.min, s.max
                );
            }
        }
    }
}

/// Mesure d'une frame, enregistrée au `drop`.
pub struct FrameGuard {
    profiler: Profiler,
    start: Instant,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        let mut inner = self.profiler.inner.borrow_mut();
        let max_samples = inner.max_samples;
        push_bounded(&mut inner.frame_times, ms, max_samples);
    }
}

/// Journalise les métriques avec le module appelant comme target.
#[macro_export]
macro_rules! log_metrics {
    ($profiler:expr) => {
        $profiler.log_metrics_for_target(module_path!(), false);
    };
}

#[macro_export]
macro_rules! log_metrics_and_fps {
    ($profiler:expr) => {
        $profiler.log_metrics_for_target(module_path!(), true);
    };
}
