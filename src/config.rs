use std::path::PathBuf;

/// Window and renderer settings. Built in code; nothing is read from disk.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Overrides the scene's own title when set.
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
    pub texture_dir: PathBuf,
    pub vsync: bool,
    pub clear_color: [f64; 4],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: 800,
            height: 600,
            texture_dir: PathBuf::from("resources/textures"),
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl AppConfig {
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_desk_window() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.clear_color().a, 1.0);
        assert!(config.texture_dir.ends_with("textures"));
    }
}
