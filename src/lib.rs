pub mod app;
pub mod calc;
pub mod config;
pub mod logging;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod ui;

pub use app::run;
pub use config::AppConfig;
pub use scene::ScenePreset;
