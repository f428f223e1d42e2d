//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::filters;
use crate::middleware::{AuthRejection, OptionalUser};
use crate::routes::Layout;
use crate::routes::products::{ProductView, load_or_empty};
use crate::routes::stores::render_landing;
use crate::services::SessionUser;
use crate::state::AppState;

/// Products highlighted on the landing page.
const HIGHLIGHTS: usize = 3;

/// A store listed on the landing page.
#[derive(Debug, Clone)]
pub struct StoreLink {
    pub name: String,
    pub href: String,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub stores: Vec<StoreLink>,
    pub highlights: Vec<ProductView>,
}

/// Store pages need a signed-in visitor, on a custom domain as under `/{store_slug}`.
fn store_visitor(user: Option<&SessionUser>) -> Result<&SessionUser, AuthRejection> {
    user.ok_or_else(|| AuthRejection::RedirectToSignIn("/".to_string()))
}

/// Display the landing page, or the store whose custom domain was requested.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    headers: HeaderMap,
) -> Response {
    let layout = Layout::new(user.as_ref(), &state);

    if let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        match state.tenants().find_by_host(host).await {
            Ok(Some(tenant)) => {
                if let Err(rejection) = store_visitor(user.as_ref()) {
                    return rejection.into_response();
                }
                tracing::debug!(store = %tenant.slug, "Serving custom-domain store");
                return render_landing(&state, layout, &tenant).await.into_response();
            }
            Ok(None) => {}
            Err(e) => tracing::error!(error = %e, "Failed to resolve tenant by host"),
        }
    }

    let stores = match state.tenants().list().await {
        Ok(tenants) => tenants
            .into_iter()
            .map(|t| StoreLink {
                href: format!("/{}", t.slug),
                name: t.name,
            })
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list stores");
            Vec::new()
        }
    };

    let products = load_or_empty(state.catalog().all_products()).await;

    HomeTemplate {
        layout,
        stores,
        highlights: products
            .iter()
            .take(HIGHLIGHTS)
            .map(|p| ProductView::new(p, "/products"))
            .collect(),
    }
    .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_custom_domain_store_requires_sign_in() {
        let rejection = store_visitor(None).unwrap_err();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/sign-in?redirect_url=%2F")
        );
    }

    #[test]
    fn test_custom_domain_store_admits_signed_in_user() {
        let user = SessionUser {
            user_id: "user_1".to_string(),
            session_id: None,
            email: None,
            first_name: None,
            last_name: None,
            role: None,
        };
        assert!(store_visitor(Some(&user)).is_ok());
    }
}
