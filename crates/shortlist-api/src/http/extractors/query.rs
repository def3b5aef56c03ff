//! Query parameter extractors.

use serde::Deserialize;

/// Query parameters for fetching one shortlist.
#[derive(Debug, Deserialize, Default)]
pub struct ShortlistQuery {
    /// `markdown` downloads the report instead of returning JSON.
    pub format: Option<String>,
}

impl ShortlistQuery {
    pub fn wants_markdown(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("markdown"))
    }
}
