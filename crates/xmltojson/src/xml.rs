//! XML parsing capability consumed by the tree builder

pub mod model;
pub mod parser;

pub use model::{Content, Document, Element};
pub use parser::Parser;
