//! Session middleware configuration.
//!
//! Sets up in-memory cookie sessions using tower-sessions, stored in a
//! bounded [`SessionCache`]. Sessions do not survive a restart.

use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::services::SessionCache;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tringl_session";

/// Create the session layer with a bounded in-memory store.
///
/// The cookie expires after the same idle period as the checkout registry,
/// so a cookie never outlives the cart it points to by much.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<SessionCache> {
    let store = SessionCache::new(config.session_idle);
    let idle_seconds = i64::try_from(config.session_idle.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_seconds),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
