//! Conversion configuration

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Failure;

/// Hook applied to every attribute and text value before type detection
pub type Filter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Hook invoked with a structured failure when fetching or parsing fails
pub type Fallback = Arc<dyn Fn(&Failure) + Send + Sync>;

/// Conversion options
#[derive(Clone)]
pub struct Options {
    /// Include the full accumulated namespace table per element instead
    /// of only the prefixes the element itself activates
    pub namespaces: bool,
    /// Key used for element text content
    pub value_identifier: String,
    /// Prefix for attribute-derived keys
    pub attribute_identifier: String,
    /// Store empty attribute/node values as null instead of ""
    pub empty_values_as_null: bool,
    /// Ordered source-path -> destination-path move rules applied after
    /// conversion; order is semantically significant
    pub modify: IndexMap<String, String>,
    /// Remove a source parent left empty by a move
    pub clear_empty_nodes: bool,
    /// Coerce textual values to bool/null/integer where they match
    pub detect_types: bool,
    /// Value filter hook, applied before type detection
    pub filter: Option<Filter>,
    /// Failure hook for fetch/parse problems
    pub fallback: Option<Fallback>,
    /// Emit diagnostics for error and converting problems
    pub log: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            namespaces: false,
            value_identifier: "$".to_string(),
            attribute_identifier: "_".to_string(),
            empty_values_as_null: false,
            modify: IndexMap::new(),
            clear_empty_nodes: false,
            detect_types: false,
            filter: None,
            fallback: None,
            log: false,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("namespaces", &self.namespaces)
            .field("value_identifier", &self.value_identifier)
            .field("attribute_identifier", &self.attribute_identifier)
            .field("empty_values_as_null", &self.empty_values_as_null)
            .field("modify", &self.modify)
            .field("clear_empty_nodes", &self.clear_empty_nodes)
            .field("detect_types", &self.detect_types)
            .field("filter", &self.filter.is_some())
            .field("fallback", &self.fallback.is_some())
            .field("log", &self.log)
            .finish()
    }
}

impl Options {
    /// True when `key` addresses an attribute-derived entry
    pub fn is_attribute_key(&self, key: &str) -> bool {
        key.starts_with(&self.attribute_identifier)
    }
}
