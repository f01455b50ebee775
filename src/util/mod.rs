pub mod clipboard;
pub mod unicode;
