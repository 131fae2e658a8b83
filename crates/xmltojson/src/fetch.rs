//! Network fetch capability for URL sources

use crate::error::Result;

/// Synchronous fetch of raw XML text. The converter blocks on the
/// fetch; callers needing a timeout wrap their implementation.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

#[cfg(feature = "http")]
pub use http::HttpFetch;

#[cfg(feature = "http")]
mod http {
    use super::Fetch;
    use crate::error::{Error, ErrorKind, Result, Span};

    /// Blocking HTTP fetch backed by reqwest
    #[derive(Clone, Copy, Debug, Default)]
    pub struct HttpFetch;

    impl Fetch for HttpFetch {
        fn fetch(&self, url: &str) -> Result<String> {
            reqwest::blocking::get(url)
                .and_then(reqwest::blocking::Response::error_for_status)
                .and_then(|response| response.text())
                .map_err(|err| {
                    Error::with_message(
                        ErrorKind::FetchFailed,
                        Span::empty(),
                        format!("cannot receive XML from {url}: {err}"),
                    )
                })
        }
    }
}
