use solids3d::logging::{LoggingConfig, init_logging};
use solids3d::{AppConfig, ScenePreset};

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = solids3d::run(ScenePreset::Sketch, AppConfig::default()) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
