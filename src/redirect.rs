use url::Url;

const IMDB_FIND_URL: &str = "https://www.imdb.com/find/";
/// IMDb result-category parameter: `tt` restricts the search to titles.
const TITLE_CATEGORY: &str = "tt";

/// Build the external search URL for a trimmed, non-empty query.
///
/// Pure URL construction; the query goes through `query_pairs_mut` so it is
/// percent-encoded by the `url` crate, never concatenated into the string.
/// Blank queries are rejected upstream and never reach this function.
#[allow(clippy::missing_panics_doc, clippy::expect_used)]
pub fn build_redirect_url(query: &str) -> Url {
    // The base URL is a literal and always parses.
    let mut url = Url::parse(IMDB_FIND_URL).expect("base URL literal is valid");
    url.query_pairs_mut()
        .append_pair("s", TITLE_CATEGORY)
        .append_pair("q", query);
    url
}
