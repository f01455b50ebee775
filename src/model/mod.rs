pub mod config;
pub mod document;
pub mod inline;
pub mod item;
pub mod metadata;

pub use config::*;
pub use document::*;
pub use inline::*;
pub use item::*;
pub use metadata::*;
