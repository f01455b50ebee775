pub mod document_parser;
pub mod document_serializer;
pub mod inline_parser;
pub mod prelude;
pub mod tokens;

pub use document_parser::{parse_blocks, parse_document, parse_item_line};
pub use document_serializer::{item_line, serialize_document};
pub use inline_parser::parse_inlines;
pub use prelude::MetadataError;
