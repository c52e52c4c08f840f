//! Seam for the page parsers built on top of the fetcher.

use crate::error::Result;

/// Turns a fetched HTML document into a domain record.
///
/// Implementations hold all knowledge of the page layout; the fetcher only
/// supplies the document text.
pub trait PageParser {
    type Output;

    fn parse(&self, html: &str) -> Result<Self::Output>;
}

impl<F, T> PageParser for F
where
    F: Fn(&str) -> Result<T>,
{
    type Output = T;

    fn parse(&self, html: &str) -> Result<T> {
        self(html)
    }
}
