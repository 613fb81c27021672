use anyhow::Result;
use image::RgbaImage;
use log::{info, warn};
use std::collections::HashSet;
use std::{env, path::Path, path::PathBuf};

use particle_fields::host::{FrameHost, SimulatedHost};
use particle_fields::log_metrics_and_fps;
use particle_fields::profiler::Profiler;
use particle_fields::renderer_engine::RasterSurface;
use particle_fields::utils::show_rust_core_dependencies;
use particle_fields::{EffectsManager, SceneConfig};

const DEFAULT_SCENE: &str = "assets/config/scene.toml";

/// Anime une page de sections hors navigateur et exporte des instantanés PNG.
fn main() -> Result<()> {
    env_logger::init();

    info!("🚀 Starting Particle Fields...");

    show_rust_core_dependencies();

    // --------------------------
    // Scène et dossier de sortie
    // --------------------------
    let mut args = env::args().skip(1);
    let scene_path = args.next().unwrap_or_else(|| DEFAULT_SCENE.to_string());
    let scene = match SceneConfig::from_file(&scene_path) {
        Ok(scene) => scene,
        Err(e) => {
            warn!("Scene '{}' not loaded ({}), using defaults", scene_path, e);
            SceneConfig::default()
        }
    };
    info!(
        "Scene: {}x{}, {} frames @ {} Hz, {} section(s), theme {:?}",
        scene.width,
        scene.height,
        scene.frames,
        scene.refresh_rate,
        scene.sections.len(),
        scene.theme
    );

    let output_dir = args
        .next() // priorité à l'argument CLI
        .map(PathBuf::from)
        .or_else(|| env::var("PARTICLE_FIELDS_OUTPUT").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("output"));
    std::fs::create_dir_all(&output_dir)?;
    info!("Snapshots written to: {}", output_dir.display());

    // --------------------------
    // Montage des effets
    // --------------------------
    let page = scene.page();
    let mut host = SimulatedHost::new(scene.refresh_rate);
    let mut effects: EffectsManager<RasterSurface> = EffectsManager::new(scene.theme);
    for section in &scene.sections {
        effects.create(
            &page,
            &section.container.id,
            &section.effect,
            &mut host,
            |c| RasterSurface::new(c.width, c.height),
        );
    }

    // --------------------------
    // Boucle de frames
    // --------------------------
    let profiler = Profiler::new(scene.frames.max(1) as usize);
    let mut hovered = HashSet::new();
    for frame in 1..=scene.frames {
        let _frame_guard = profiler.frame();

        if scene.toggle_theme_at == Some(frame) {
            effects.update_all(effects.theme().toggled());
        }
        if let Some(pointer) = scene.pointer_at(host.now()) {
            for event in scene.route_pointer(pointer, &mut hovered) {
                effects.publish(event);
            }
        }

        let stats = profiler.profile_block("effects - tick", || effects.tick(&mut host));
        profiler.record_count("elements drawn", stats.elements_drawn);
        profiler.record_count("lines drawn", stats.lines_drawn);
        profiler.record_count("respawned", stats.respawned);

        if scene.is_snapshot_frame(frame) {
            profiler.profile_block("snapshot", || {
                write_snapshots(&scene, &effects, &output_dir, frame)
            })?;
        }
    }

    log_metrics_and_fps!(profiler);

    effects.destroy_all(&mut host);
    info!("👋 Done");

    Ok(())
}

/// Écrit une image par section, puis la page composée dans l'ordre des sections.
fn write_snapshots(
    scene: &SceneConfig,
    effects: &EffectsManager<RasterSurface>,
    output_dir: &Path,
    frame: u32,
) -> Result<()> {
    let mut composed = RgbaImage::new(scene.width, scene.height);
    for section in &scene.sections {
        let Some(surface) = effects
            .get(&section.container.id)
            .and_then(|animator| animator.surface())
        else {
            continue;
        };
        surface.save_png(output_dir.join(format!("{}_{:05}.png", section.container.id, frame)))?;
        image::imageops::overlay(
            &mut composed,
            surface.image(),
            section.container.origin.x as i64,
            section.container.origin.y as i64,
        );
    }
    let page_path = output_dir.join(format!("page_{:05}.png", frame));
    composed.save(&page_path)?;
    info!("📸 Frame {} captured to {}", frame, page_path.display());
    Ok(())
}
