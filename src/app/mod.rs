pub mod actions;
pub mod adapter;
pub mod app;
pub mod bind;
pub mod handlers;
pub mod requests;
pub mod screen;
pub mod updates;

pub use app::App;
pub use screen::{NavEvent, Screen};
