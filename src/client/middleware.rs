use crate::client::auth::TokenStore;
use crate::client::transport::{HttpRequest, HttpResponse};

/// Hook run around every request the client sends
///
/// Request hooks run in registration order; response hooks run in reverse,
/// so the outermost middleware sees the response last.
pub trait Middleware: Send + Sync {
    fn on_request(&self, _request: &mut HttpRequest) {}

    fn on_response(&self, _request: &HttpRequest, _response: &HttpResponse) {}
}

/// Adds `Authorization: Bearer <token>` while a session token is stored
pub struct BearerAuth {
    tokens: TokenStore,
}

impl BearerAuth {
    pub fn new(tokens: TokenStore) -> Self {
        BearerAuth { tokens }
    }
}

impl Middleware for BearerAuth {
    fn on_request(&self, request: &mut HttpRequest) {
        if let Some(token) = self.tokens.token() {
            request.set_header("Authorization", format!("Bearer {}", token));
        }
    }
}

/// Ends the session when the backend answers 401
///
/// The token is dropped and the callback supplied by the application
/// decides what happens next (typically navigating to the login screen).
pub struct UnauthorizedHook {
    tokens: TokenStore,
    on_unauthorized: Box<dyn Fn() + Send + Sync>,
}

impl UnauthorizedHook {
    pub fn new(tokens: TokenStore, on_unauthorized: impl Fn() + Send + Sync + 'static) -> Self {
        UnauthorizedHook {
            tokens,
            on_unauthorized: Box::new(on_unauthorized),
        }
    }
}

impl Middleware for UnauthorizedHook {
    fn on_response(&self, request: &HttpRequest, response: &HttpResponse) {
        if response.status == 401 {
            tracing::warn!(path = %request.path, "Session rejected by backend, logging out");
            self.tokens.clear();
            (self.on_unauthorized)();
        }
    }
}
