//! xmltojson - XML to JSON tree conversion with dot-path queries
//!
//! Parses an XML document into a JSON-like [`Value`] tree, then lets
//! callers read and reshape it with a small dot-path language:
//! `root.items.item[2]` style lookups, conditional `find`, and ordered
//! move/rename rules applied at conversion time.
//!
//! # Quick Start
//!
//! ```
//! use xmltojson::{Converter, Options};
//!
//! let converter = Converter::from_str("<root><name>John</name></root>", Options::default());
//! let name = converter
//!     .get("root.name.$")
//!     .map(xmltojson::Value::display_string)
//!     .unwrap_or_default();
//! assert_eq!(name, "John");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Failure, Pos, Result, Span};

pub mod cursor;

pub mod value;
pub use value::{Array, Object, Value};

pub mod xml;
pub use xml::{Content, Document, Element, Parser};

pub mod coerce;

pub mod options;
pub use options::Options;

pub mod convert;

pub mod query;
pub use query::{Path, PathStep};

pub mod condition;
pub use condition::{Condition, Operator};

pub mod edit;
pub mod rules;

pub mod json;

pub mod fetch;
pub use fetch::Fetch;
#[cfg(feature = "http")]
pub use fetch::HttpFetch;

pub mod converter;
pub use converter::Converter;

/// Convert an XML string with default options, returning the tree
pub fn from_str(xml: &str) -> Value {
    Converter::from_str(xml, Options::default()).into_json()
}
