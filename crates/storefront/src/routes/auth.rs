//! Sign-in and sign-up redirects.
//!
//! The identity provider hosts both pages; the storefront only forwards
//! the visitor with a `redirect_url` pointing back at itself.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use url::Url;

use crate::state::AppState;

/// Where to return after authenticating.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnQuery {
    pub redirect_url: Option<String>,
}

/// Redirect to the hosted sign-in page.
pub async fn sign_in(
    State(state): State<AppState>,
    Query(query): Query<ReturnQuery>,
) -> Redirect {
    let config = state.config();
    Redirect::to(
        hosted_url(&config.auth.sign_in_url, &config.base_url, query.redirect_url.as_deref())
            .as_str(),
    )
}

/// Redirect to the hosted sign-up page.
pub async fn sign_up(
    State(state): State<AppState>,
    Query(query): Query<ReturnQuery>,
) -> Redirect {
    let config = state.config();
    Redirect::to(
        hosted_url(&config.auth.sign_up_url, &config.base_url, query.redirect_url.as_deref())
            .as_str(),
    )
}

/// Hosted page URL with an absolute `redirect_url` back to this site.
///
/// Only same-site paths are honoured; anything else returns to `/`.
fn hosted_url(hosted: &Url, base_url: &Url, return_to: Option<&str>) -> Url {
    let path = return_to
        .filter(|p| p.starts_with('/') && !p.starts_with("//"))
        .filter(|p| !p.contains(['\\', '\t', '\n', '\r']))
        .unwrap_or("/");
    // The URL parser drops tabs and newlines, so re-check the joined origin
    let back = base_url
        .join(path)
        .ok()
        .filter(|url| url.origin() == base_url.origin())
        .unwrap_or_else(|| base_url.clone());

    let mut url = hosted.clone();
    url.query_pairs_mut().append_pair("redirect_url", back.as_str());
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn urls() -> (Url, Url) {
        (
            Url::parse("https://accounts.example.com/sign-in").unwrap(),
            Url::parse("https://shop.example.com").unwrap(),
        )
    }

    #[test]
    fn test_hosted_url_returns_to_path() {
        let (hosted, base) = urls();
        let url = hosted_url(&hosted, &base, Some("/cart?x=1"));
        assert_eq!(
            url.as_str(),
            "https://accounts.example.com/sign-in?redirect_url=https%3A%2F%2Fshop.example.com%2Fcart%3Fx%3D1"
        );
    }

    #[test]
    fn test_hosted_url_rejects_offsite_return() {
        let (hosted, base) = urls();
        for evil in [
            "https://evil.test/",
            "//evil.test",
            "/\\evil.test",
            "/\t/evil.test",
            "/\n/evil.test/",
            "/\r/evil.test",
        ] {
            let url = hosted_url(&hosted, &base, Some(evil));
            assert!(
                url.as_str().ends_with("redirect_url=https%3A%2F%2Fshop.example.com%2F"),
                "{evil:?}"
            );
        }
    }

    #[test]
    fn test_hosted_url_defaults_home() {
        let (hosted, base) = urls();
        let url = hosted_url(&hosted, &base, None);
        assert!(url.as_str().ends_with("redirect_url=https%3A%2F%2Fshop.example.com%2F"));
    }
}
