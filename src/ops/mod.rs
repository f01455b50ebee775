pub mod filter;
pub mod item_ops;
pub mod nav;
