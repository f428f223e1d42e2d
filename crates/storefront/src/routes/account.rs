//! Account pages built from session token claims.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::{Cart, Wishlist};
use crate::routes::Layout;
use crate::services::SessionUser;
use crate::state::AppState;

/// Profile fields shown to the user.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user_id: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl From<&SessionUser> for ProfileView {
    fn from(user: &SessionUser) -> Self {
        Self {
            user_id: user.user_id.clone(),
            display_name: user.display_name(),
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            email: user.email.as_ref().map(ToString::to_string).unwrap_or_default(),
            role: user.role.clone().unwrap_or_else(|| "customer".to_string()),
        }
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub profile: ProfileView,
}

/// Account dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "account/dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub profile: ProfileView,
    pub cart_items: u32,
    pub wishlist_items: usize,
}

/// Display the signed-in user's profile.
#[instrument(skip_all)]
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> impl IntoResponse {
    ProfileTemplate {
        layout: Layout::new(Some(&user), &state),
        profile: ProfileView::from(&user),
    }
}

/// Display the account overview.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
) -> Result<impl IntoResponse> {
    let cart = Cart::load(&session).await?;
    let wishlist = Wishlist::load(&session).await?;

    Ok(DashboardTemplate {
        layout: Layout::new(Some(&user), &state),
        profile: ProfileView::from(&user),
        cart_items: cart.item_count(),
        wishlist_items: wishlist.slugs().len(),
    })
}
