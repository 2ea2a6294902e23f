use ratatui::style::Color;

pub const THEME_BG: Color = Color::Rgb(20, 20, 25); // Dark slate
pub const THEME_FG: Color = Color::Rgb(220, 220, 240); // Soft white
pub const THEME_ACCENT: Color = Color::Rgb(26, 183, 234); // Vimeo blue
pub const THEME_HIGHLIGHT: Color = Color::Rgb(0, 120, 180);
pub const THEME_BORDER: Color = Color::Rgb(80, 80, 120); // Muted blue-purple
pub const THEME_DIM: Color = Color::Rgb(130, 130, 150);
pub const THEME_ERROR: Color = Color::Rgb(230, 80, 80);
