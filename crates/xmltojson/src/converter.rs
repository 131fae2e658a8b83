//! One conversion: raw XML in, queryable tree out

use std::time::Instant;

use tracing::warn;

use crate::convert::build;
use crate::edit;
use crate::error::{Error, ErrorKind, Failure};
use crate::fetch::Fetch;
use crate::options::Options;
use crate::query::{self, Path};
use crate::rules;
use crate::value::{Object, Value};
use crate::xml::Parser;

/// Owns the result of one XML conversion: the raw text (declaration
/// stripped), the JSON-like tree after rule application, the options,
/// and the wall-clock duration of the whole run. Fetch and parse
/// failures degrade to an empty tree; nothing here panics or aborts.
pub struct Converter {
    xml: String,
    json: Value,
    options: Options,
    duration_ms: u128,
}

impl Converter {
    /// Convert from a literal XML string
    pub fn from_str(xml: &str, options: Options) -> Self {
        let start = Instant::now();
        Self::build_from_xml(start, xml, options)
    }

    /// Convert from a URL source through a fetch capability. The fetch
    /// blocks until complete; its time counts towards the duration.
    pub fn from_url(url: &str, options: Options, fetcher: &dyn Fetch) -> Self {
        let start = Instant::now();
        match fetcher.fetch(url) {
            Ok(text) => Self::build_from_xml(start, &text, options),
            Err(err) => {
                report(&options, &err);
                Self {
                    xml: String::new(),
                    json: Value::Object(Object::new()),
                    options,
                    duration_ms: start.elapsed().as_millis(),
                }
            }
        }
    }

    fn build_from_xml(start: Instant, xml: &str, options: Options) -> Self {
        let xml = strip_declaration(xml);
        let mut json = match Parser::new(xml.as_bytes()).parse() {
            Ok(doc) => build(&doc, &options),
            Err(err) => {
                let err = Error::with_message(
                    ErrorKind::ParseFailed,
                    err.span(),
                    format!("cannot parse XML: {err}"),
                );
                report(&options, &err);
                Value::Object(Object::new())
            }
        };

        rules::apply(&mut json, &options);

        Self {
            xml,
            json,
            options,
            duration_ms: start.elapsed().as_millis(),
        }
    }

    /// The converted tree
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Consume the converter, returning the tree
    pub fn into_json(self) -> Value {
        self.json
    }

    /// The raw XML text, minus a stripped leading declaration
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Wall-clock milliseconds from construction start to finish
    pub fn duration_ms(&self) -> u128 {
        self.duration_ms
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Strict dot-path lookup; absent segments and falsy leaves read
    /// as nothing
    pub fn get(&self, path: &str) -> Option<&Value> {
        query::get(&self.json, &Path::parse(path), &self.options)
    }

    /// Tolerant lookup with sequence fan-out and an optional condition
    pub fn find(&self, path: &str, condition: Option<&str>) -> Option<Value> {
        query::find(&self.json, &Path::parse(path), condition, &self.options)
    }

    /// Create empty nodes along the path where missing
    pub fn create_nodes(&mut self, path: &str) {
        edit::create_nodes(&mut self.json, &Path::parse(path), &self.options);
    }

    /// Remove the addressed subtree, compacting arrays after indexed
    /// removal
    pub fn remove(&mut self, path: &str) {
        edit::remove(&mut self.json, &Path::parse(path), &self.options);
    }
}

fn report(options: &Options, err: &Error) {
    if options.log {
        warn!(code = err.code(), "{err}");
    }
    if let Some(fallback) = &options.fallback {
        fallback(&Failure::from(err));
    }
}

/// Drop leading whitespace and one leading `<?xml ...?>` declaration,
/// keeping the rest of the document verbatim.
fn strip_declaration(xml: &str) -> String {
    let trimmed = xml.trim_start();
    if let Some(rest) = trimmed.strip_prefix("<?xml") {
        if let Some(end) = rest.find("?>") {
            return rest.get(end + 2..).unwrap_or("").to_string();
        }
    }
    trimmed.to_string()
}
