use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::middleware::Middleware;
use crate::client::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::error::{Error, Result};
use crate::normalize::{NormalizeConfig, Normalizer, Page};

/// HTTP client for the ERP backend
///
/// Every successful JSON body is normalized before it is returned, so
/// callers always see `id` keys. The client carries no global state: it is
/// built once by the application and handed to whatever needs it.
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
    middleware: Vec<Arc<dyn Middleware>>,
    normalizer: Normalizer,
}

pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    transport: Option<Box<dyn Transport>>,
    middleware: Vec<Arc<dyn Middleware>>,
    normalize: NormalizeConfig,
}

impl ApiClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the default reqwest transport
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Append a middleware to the chain
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn normalize_config(mut self, config: NormalizeConfig) -> Self {
        self.normalize = config;
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Box::new(ReqwestTransport::new(self.timeout)?),
        };

        Ok(ApiClient {
            base_url: self.base_url,
            transport,
            middleware: self.middleware,
            normalizer: Normalizer::new(self.normalize),
        })
    }
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            transport: None,
            middleware: Vec::new(),
            normalize: NormalizeConfig::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// GET a single resource
    pub fn get(&self, path: &str) -> Result<Value> {
        let body = self.execute(HttpRequest::new(Method::GET, path))?;
        Ok(self.normalizer.normalize(&body))
    }

    /// GET a resource and deserialize the normalized body
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.get(path)?;
        Ok(serde_json::from_value(value)?)
    }

    /// GET a collection; a non-array body yields an empty list
    pub fn get_list(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Value>> {
        let request = HttpRequest::new(Method::GET, path).with_query(query);
        let body = self.execute(request)?;
        Ok(self.normalizer.normalize_list(&body))
    }

    /// GET one page of a paginated collection
    pub fn get_page(&self, path: &str, page: u64, page_size: u64) -> Result<Page> {
        let request = HttpRequest::new(Method::GET, path).with_query(&[
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ]);
        let body = self.execute(request)?;
        Ok(self.normalizer.normalize_page(&body))
    }

    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send_with_body(Method::POST, path, body)
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send_with_body(Method::PUT, path, body)
    }

    pub fn delete(&self, path: &str) -> Result<Value> {
        let body = self.execute(HttpRequest::new(Method::DELETE, path))?;
        Ok(self.normalizer.normalize(&body))
    }

    fn send_with_body<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<Value> {
        let request = HttpRequest::new(method, path).with_body(serde_json::to_value(body)?);
        let body = self.execute(request)?;
        Ok(self.normalizer.normalize(&body))
    }

    /// Run the middleware chain around one round trip and decode the body
    fn execute(&self, mut request: HttpRequest) -> Result<Value> {
        for middleware in &self.middleware {
            middleware.on_request(&mut request);
        }

        tracing::debug!(method = %request.method, path = %request.path, "Sending API request");
        let response = self.transport.send(&self.base_url, &request)?;

        for middleware in self.middleware.iter().rev() {
            middleware.on_response(&request, &response);
        }

        Self::decode(&request, response)
    }

    fn decode(request: &HttpRequest, response: HttpResponse) -> Result<Value> {
        if response.status == 401 {
            return Err(Error::Unauthorized);
        }

        if !response.is_success() {
            tracing::error!(
                method = %request.method,
                path = %request.path,
                status = response.status,
                "API request failed"
            );
            return Err(Error::Status {
                status: response.status,
                body: response.body,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response.body).map_err(|e| {
            let preview: String = response.body.chars().take(200).collect();
            tracing::error!(path = %request.path, "Failed to parse API response: {} (body: {})", e, preview);
            Error::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::auth::TokenStore;
    use crate::client::middleware::{BearerAuth, UnauthorizedHook};
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Replays canned responses and records what was sent
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        responses: Arc<Mutex<VecDeque<HttpResponse>>>,
        sent: Arc<Mutex<Vec<(String, HttpRequest)>>>,
    }

    impl ScriptedTransport {
        fn replying(responses: Vec<HttpResponse>) -> Self {
            let transport = Self::default();
            transport.responses.lock().unwrap().extend(responses);
            transport
        }

        fn sent(&self) -> Vec<(String, HttpRequest)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, base_url: &str, request: &HttpRequest) -> Result<HttpResponse> {
            self.sent.lock().unwrap().push((base_url.to_string(), request.clone()));
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| HttpResponse::new(404, "no scripted response")))
        }
    }

    fn client(transport: ScriptedTransport) -> ApiClient {
        ApiClient::builder("http://erp.local/api")
            .transport(transport)
            .build()
            .unwrap()
    }

    #[test]
    fn test_get_normalizes_body() {
        let transport = ScriptedTransport::replying(vec![HttpResponse::new(
            200,
            r#"{"_id": "s1", "contacts": [{"_id": "c1"}]}"#,
        )]);
        let api = client(transport.clone());

        let supplier = api.get("/suppliers/s1").unwrap();

        assert_eq!(supplier, json!({"id": "s1", "contacts": [{"id": "c1"}]}));
        let sent = transport.sent();
        assert_eq!(sent[0].0, "http://erp.local/api");
        assert_eq!(sent[0].1.method, Method::GET);
        assert_eq!(sent[0].1.path, "/suppliers/s1");
    }

    #[test]
    fn test_get_as_deserializes() {
        #[derive(Deserialize)]
        struct Product {
            id: String,
            name: String,
        }

        let transport = ScriptedTransport::replying(vec![HttpResponse::new(200, r#"{"_id": "p1", "name": "Hinge"}"#)]);
        let product: Product = client(transport).get_as("/products/p1").unwrap();

        assert_eq!(product.id, "p1");
        assert_eq!(product.name, "Hinge");
    }

    #[test]
    fn test_get_page_sends_query_and_normalizes() {
        let transport = ScriptedTransport::replying(vec![HttpResponse::new(
            200,
            r#"{"items": [{"_id": "a"}, {"_id": "b"}], "total_count": 57}"#,
        )]);
        let api = client(transport.clone());

        let page = api.get_page("/customers", 2, 25).unwrap();

        assert_eq!(page.items, vec![json!({"id": "a"}), json!({"id": "b"})]);
        assert_eq!(page.total(), 57);
        assert_eq!(
            transport.sent()[0].1.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "25".to_string())
            ]
        );
    }

    #[test]
    fn test_malformed_page_is_empty() {
        let transport = ScriptedTransport::replying(vec![HttpResponse::new(200, r#"{"detail": "ok"}"#)]);
        let page = client(transport).get_page("/customers", 1, 10).unwrap();

        assert_eq!(page, Page::empty());
    }

    #[test]
    fn test_get_list_tolerates_non_array() {
        let transport = ScriptedTransport::replying(vec![
            HttpResponse::new(200, r#"[{"_id": 1}]"#),
            HttpResponse::new(200, r#"{"_id": 1}"#),
        ]);
        let api = client(transport);

        assert_eq!(api.get_list("/categories", &[]).unwrap(), vec![json!({"id": 1})]);
        assert!(api.get_list("/categories", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_post_sends_json_body() {
        let transport = ScriptedTransport::replying(vec![HttpResponse::new(201, r#"{"_id": "new", "name": "Acme"}"#)]);
        let api = client(transport.clone());

        let created = api.post("/suppliers", &json!({"name": "Acme"})).unwrap();

        assert_eq!(created, json!({"id": "new", "name": "Acme"}));
        let (_, request) = &transport.sent()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(json!({"name": "Acme"})));
    }

    #[test]
    fn test_put_returns_normalized_body() {
        let transport = ScriptedTransport::replying(vec![HttpResponse::new(200, r#"{"_id": "u1", "role": "admin"}"#)]);
        let api = client(transport.clone());

        let updated = api.put("/users/u1", &json!({"role": "admin"})).unwrap();

        assert_eq!(updated, json!({"id": "u1", "role": "admin"}));
        assert_eq!(transport.sent()[0].1.method, Method::PUT);
    }

    #[test]
    fn test_empty_body_is_null() {
        let transport = ScriptedTransport::replying(vec![HttpResponse::new(204, "")]);
        assert_eq!(client(transport).delete("/suppliers/s1").unwrap(), Value::Null);
    }

    #[test]
    fn test_error_status_is_not_normalized() {
        let transport = ScriptedTransport::replying(vec![HttpResponse::new(422, r#"{"_id": "x"}"#)]);

        match client(transport).get("/orders/x") {
            Err(Error::Status { status, body }) => {
                assert_eq!(status, 422);
                assert_eq!(body, r#"{"_id": "x"}"#);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_error() {
        let transport = ScriptedTransport::replying(vec![HttpResponse::new(200, "<html>")]);
        assert!(matches!(client(transport).get("/"), Err(Error::Json(_))));
    }

    #[test]
    fn test_bearer_header_and_logout_on_401() {
        let tokens = TokenStore::with_token("secret");
        let redirected = Arc::new(AtomicBool::new(false));
        let flag = redirected.clone();

        let transport = ScriptedTransport::replying(vec![
            HttpResponse::new(200, "[]"),
            HttpResponse::new(401, r#"{"detail": "expired"}"#),
            HttpResponse::new(200, "[]"),
        ]);
        let api = ApiClient::builder("http://erp.local/api")
            .transport(transport.clone())
            .with(BearerAuth::new(tokens.clone()))
            .with(UnauthorizedHook::new(tokens.clone(), move || flag.store(true, Ordering::SeqCst)))
            .build()
            .unwrap();

        api.get_list("/users", &[]).unwrap();
        assert!(matches!(api.get_list("/users", &[]), Err(Error::Unauthorized)));
        assert!(redirected.load(Ordering::SeqCst));
        assert!(!tokens.is_authenticated());

        api.get_list("/users", &[]).unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].1.header("Authorization"), Some("Bearer secret"));
        assert_eq!(sent[1].1.header("Authorization"), Some("Bearer secret"));
        assert_eq!(sent[2].1.header("Authorization"), None);
    }

    #[test]
    fn test_custom_keys() {
        let transport = ScriptedTransport::replying(vec![HttpResponse::new(200, r#"{"uuid": "u1"}"#)]);
        let api = ApiClient::builder("http://erp.local")
            .transport(transport)
            .normalize_config(NormalizeConfig {
                backend_key: "uuid".to_string(),
                ..NormalizeConfig::default()
            })
            .build()
            .unwrap();

        assert_eq!(api.get("/x").unwrap(), json!({"id": "u1"}));
    }
}
