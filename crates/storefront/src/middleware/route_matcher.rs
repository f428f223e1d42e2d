//! Public route patterns.
//!
//! Each pattern is a regular expression anchored at both ends, so
//! `/products(.*)` covers `/products` and everything below it while `/`
//! covers only the home page.

use regex::RegexSet;

/// Paths reachable without a session.
pub const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/sign-in(.*)",
    "/sign-up(.*)",
    "/products(.*)",
    "/product(.*)",
    "/category(.*)",
    "/search(.*)",
    "/about",
    "/contact",
    "/help",
    "/static(.*)",
    "/health(.*)",
];

/// Compiled set of anchored path patterns.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    patterns: RegexSet,
}

impl RouteMatcher {
    /// Compile a matcher from path patterns.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if a pattern is not a valid regular expression.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let anchored = patterns
            .into_iter()
            .map(|pattern| format!("^(?:{})$", pattern.as_ref()));
        Ok(Self {
            patterns: RegexSet::new(anchored)?,
        })
    }

    /// Matcher for [`PUBLIC_ROUTES`].
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if a built-in pattern fails to compile.
    pub fn public() -> Result<Self, regex::Error> {
        Self::new(PUBLIC_ROUTES)
    }

    /// Whether the path matches any pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.is_match(path)
    }
}
