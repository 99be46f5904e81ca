//! Gist identifier handling
//!
//! A gist ID is 20 or 32 hexadecimal characters. Used as a whole path
//! segment it stands for a saved snippet rather than a file.

/// Lengths of the two gist ID generations
const GIST_ID_LENGTHS: [usize; 2] = [20, 32];

/// Query parameter the main page reads the gist from
pub const GIST_QUERY_PARAM: &str = "id";

pub fn is_gist_id(candidate: &str) -> bool {
    GIST_ID_LENGTHS.contains(&candidate.len()) && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Build the redirect target `/?...&id=<gist>` keeping the other query parameters
///
/// An existing `id` keeps its position and takes the new value; repeated
/// `id` parameters collapse into that one.
pub fn redirect_location(gist_id: &str, query: Option<&str>) -> String {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut replaced = false;

    for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        if key == GIST_QUERY_PARAM {
            if !replaced {
                pairs.push((key.into_owned(), gist_id.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((key.into_owned(), value.into_owned()));
        }
    }
    if !replaced {
        pairs.push((GIST_QUERY_PARAM.to_string(), gist_id.to_string()));
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&pairs)
        .finish();
    format!("/?{encoded}")
}
