use log::info;

/// Affiche la version du compilateur et celles des dépendances principales
/// (relevées par `build.rs` via `cargo metadata`).
pub fn show_rust_core_dependencies() {
    info!(
        "Rust compiler version: {}",
        rustc_version_runtime::version()
    );
    info!("  Platform    : {}", std::env::consts::OS);
    info!("  Arch        : {}", std::env::consts::ARCH);

    info!("Rust core dependencies");
    for (name, version) in core_dependencies() {
        info!("  {:<6} version: {}", name, version);
    }
}

/// Couples `(crate, version)` ; `"Unknown"` si `cargo metadata` était indisponible au build.
pub fn core_dependencies() -> [(&'static str, &'static str); 3] {
    [
        ("glam", option_env!("GLAM").unwrap_or("Unknown")),
        ("rand", option_env!("RAND").unwrap_or("Unknown")),
        ("image", option_env!("IMAGE").unwrap_or("Unknown")),
    ]
}
