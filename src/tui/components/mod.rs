pub mod main_content;
pub mod status_bar;
pub mod theme;
pub mod title_bar;
pub mod widgets;
