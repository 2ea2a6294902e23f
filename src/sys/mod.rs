pub mod config;
pub mod format;
pub mod image;
pub mod logging;
pub mod vimeo;
