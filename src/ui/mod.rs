pub mod panels;
pub mod theme;

pub use panels::draw_help_overlay;
pub use theme::apply_theme;
