//! Explicitly constructed API client with a request/response middleware chain
//!
//! Token injection and logout-on-401 are ordinary middleware; what "logout"
//! means to the application is a callback supplied when the client is built.

pub mod api;
pub mod auth;
pub mod middleware;
pub mod transport;

pub use api::{ApiClient, ApiClientBuilder};
pub use auth::TokenStore;
pub use middleware::{BearerAuth, Middleware, UnauthorizedHook};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

use crate::config::Config;

/// Build the standard client: configured base URL and keys, bearer auth,
/// and the given handler for expired sessions
pub fn from_config(
    config: &Config,
    tokens: TokenStore,
    on_unauthorized: impl Fn() + Send + Sync + 'static,
) -> crate::Result<ApiClient> {
    ApiClient::builder(config.api.base_url.clone())
        .timeout(config.api.timeout())
        .normalize_config(config.normalize.clone())
        .with(BearerAuth::new(tokens.clone()))
        .with(UnauthorizedHook::new(tokens, on_unauthorized))
        .build()
}
