//! Request path classification
//!
//! Maps a request path to the resource that answers it. Rules are kept as
//! an ordered list and evaluated first-match-wins, so the priority order is
//! data that can be inspected and tested on its own.

use crate::config::{GistMode, ReservedPrefix, SiteConfig, Strategy};

use super::gist::is_gist_id;

/// Outcome of classifying a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Serve this path, relative to the site root
    ServeFile(String),
    /// Serve the main page (device-dependent)
    MainPage,
    /// Permanent redirect to `/?id=<gist>`
    GistRedirect(String),
    NotFound,
}

/// A single classification rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The path names a file under the site root
    ExistingFile,
    /// Segment 1 looks like a file name (`/style.css`)
    DottedSegment,
    /// The whole path is a single gist ID segment
    BareGistId,
    /// A lone top-level segment such as `/flutter`
    TopLevelRoute,
    /// Segment 1 is a reserved prefix such as `packages`
    ReservedPrefix,
    /// Segment 1 is a gist ID standing in front of a real path
    GistPlaceholder,
    /// Exactly `/`
    Root,
    /// `/<item>` where item is a known file
    KnownFile,
    /// `/<item>` where item is a known pseudo-route
    KnownRoute,
}

/// Rule order of the segmented strategy
pub const SEGMENTED_RULES: &[Rule] = &[
    Rule::ExistingFile,
    Rule::DottedSegment,
    Rule::BareGistId,
    Rule::TopLevelRoute,
    Rule::ReservedPrefix,
    Rule::GistPlaceholder,
];

/// Rule order of the flat strategy; anything unmatched is not found
pub const FLAT_RULES: &[Rule] = &[
    Rule::Root,
    Rule::KnownFile,
    Rule::KnownRoute,
    Rule::BareGistId,
];

/// Path classifier configured from the site settings
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: &'static [Rule],
    gist_mode: GistMode,
    reserved_prefixes: Vec<ReservedPrefix>,
    known_files: Vec<String>,
    known_routes: Vec<String>,
}

impl Classifier {
    pub fn from_config(site: &SiteConfig) -> Self {
        let rules = match site.strategy {
            Strategy::Segmented => SEGMENTED_RULES,
            Strategy::Flat => FLAT_RULES,
        };
        Self {
            rules,
            gist_mode: site.gist_mode,
            reserved_prefixes: site.reserved_prefixes.clone(),
            known_files: site.known_files.clone(),
            known_routes: site.known_routes.clone(),
        }
    }

    pub const fn rules(&self) -> &[Rule] {
        self.rules
    }

    /// Classify a decoded request path
    ///
    /// `exists` reports whether a root-relative path names a servable file.
    pub fn classify<F>(&self, path: &str, exists: F) -> Classification
    where
        F: Fn(&str) -> bool,
    {
        let path = if path.is_empty() { "/" } else { path };
        let segments: Vec<&str> = path.split('/').collect();

        self.rules
            .iter()
            .find_map(|rule| self.apply(*rule, path, &segments, &exists))
            .unwrap_or(Classification::NotFound)
    }

    fn apply<F>(
        &self,
        rule: Rule,
        path: &str,
        segments: &[&str],
        exists: &F,
    ) -> Option<Classification>
    where
        F: Fn(&str) -> bool,
    {
        match rule {
            Rule::ExistingFile => {
                let relative = path.trim_start_matches('/');
                (!relative.is_empty() && exists(relative))
                    .then(|| Classification::ServeFile(relative.to_string()))
            }
            Rule::DottedSegment => segments
                .get(1)
                .is_some_and(|s| s.contains('.'))
                .then(|| rejoin(&segments[1..])),
            Rule::BareGistId => single_item(segments)
                .filter(|item| is_gist_id(item))
                .map(|id| match self.gist_mode {
                    GistMode::Rewrite => Classification::MainPage,
                    GistMode::Redirect => Classification::GistRedirect(id.to_string()),
                }),
            Rule::TopLevelRoute => (segments.len() < 3).then_some(Classification::MainPage),
            Rule::ReservedPrefix => self
                .is_reserved(segments)
                .then(|| rejoin(&segments[1..])),
            Rule::GistPlaceholder => Some(rejoin(segments.get(2..).unwrap_or_default())),
            Rule::Root => (path == "/").then_some(Classification::MainPage),
            Rule::KnownFile => single_item(segments)
                .filter(|item| self.known_files.iter().any(|f| f == item))
                .map(|item| Classification::ServeFile(item.to_string())),
            Rule::KnownRoute => single_item(segments)
                .filter(|item| self.known_routes.iter().any(|r| r == item))
                .map(|_| Classification::MainPage),
        }
    }

    fn is_reserved(&self, segments: &[&str]) -> bool {
        let Some(first) = segments.get(1) else {
            return false;
        };
        self.reserved_prefixes.iter().any(|prefix| {
            prefix.segment == *first
                && prefix
                    .followed_by
                    .as_deref()
                    .map_or(true, |next| segments.get(2) == Some(&next))
        })
    }
}

/// The item of a `/<item>` path
fn single_item<'a>(segments: &[&'a str]) -> Option<&'a str> {
    match segments {
        ["", item] if !item.is_empty() => Some(*item),
        _ => None,
    }
}

fn rejoin(segments: &[&str]) -> Classification {
    let joined = segments.join("/");
    if joined.is_empty() {
        Classification::MainPage
    } else {
        Classification::ServeFile(joined)
    }
}
