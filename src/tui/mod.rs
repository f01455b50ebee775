pub mod app;
pub mod command_actions;
pub mod input;
pub mod render;
pub mod search;
pub mod theme;
pub mod undo;

pub use app::run;
