//! SubSlayer Web Server
//!
//! Axum-based REST API for the SubSlayer subscription tracker.
//!
//! Security features:
//! - Cloudflare Access / API key / trusted network authentication (secure by default,
//!   use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Per-caller data isolation (subscriptions are owned by the authenticated identity)
//! - Full audit logging for all API access (reads and writes)
//! - Sanitized error responses

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use subslayer_core::db::Database;

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Maximum accepted JSON body size (16 KB)
pub const MAX_BODY_SIZE: usize = 16 * 1024;

/// Cloudflare Access header for authenticated user email
const CF_ACCESS_USER_HEADER: &str = "cf-access-authenticated-user-email";

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys for service authentication, sent as "Bearer <key>"
    pub api_keys: Vec<String>,
    /// Networks that bypass authentication (e.g., "192.168.1.0/24", "10.0.0.5")
    pub trusted_networks: Vec<ipnet::IpNet>,
    /// Proxies whose X-Forwarded-For headers are trusted
    pub trusted_proxies: Vec<ipnet::IpNet>,
    /// Give first-time callers the sample subscription set
    pub seed_sample_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
            trusted_networks: vec![],
            trusted_proxies: vec![],
            seed_sample_data: false,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// How a caller was authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    CloudflareHeader,
    ApiKey,
    TrustedNetwork,
    None,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::CloudflareHeader => "cloudflare_header",
            AuthMethod::ApiKey => "api_key",
            AuthMethod::TrustedNetwork => "trusted_network",
            AuthMethod::None => "none",
        }
    }
}

/// Identity attached to every request by the auth middleware
///
/// `user` doubles as the owner key for subscription data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user: String,
    pub auth_method: AuthMethod,
}

/// Authentication middleware - validates Cloudflare Access headers, API keys, or trusted networks
///
/// # Security Notes
///
/// **Trusted networks**: Requests from IPs in `trusted_networks` bypass authentication.
/// The client IP is the TCP peer address unless the peer is a trusted proxy.
///
/// **Cloudflare Access header**: `CF-Access-Authenticated-User-Email` is safe behind
/// Cloudflare Tunnel (which strips/rewrites CF headers), but can be spoofed if the
/// server is exposed directly to the internet.
///
/// **API keys**: Compared using constant-time comparison to prevent timing attacks.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let caller = if !state.config.require_auth {
        Some(Caller {
            user: get_user_email(request.headers()),
            auth_method: AuthMethod::None,
        })
    } else {
        authenticate(&state.config, &request, connect_info.as_ref())
    };

    match caller {
        Some(caller) => {
            debug!(user = %caller.user, method = caller.auth_method.as_str(), %path, "Authenticated");
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        None => {
            warn!(%path, "Unauthorized request - no valid auth");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "Authentication required"
                })),
            )
                .into_response()
        }
    }
}

fn authenticate(
    config: &ServerConfig,
    request: &Request,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
) -> Option<Caller> {
    if !config.trusted_networks.is_empty() {
        let client_ip = get_client_ip(request, connect_info, &config.trusted_proxies);
        debug!(
            ?client_ip,
            trusted_networks = ?config.trusted_networks,
            "Checking trusted network auth"
        );

        if let Some(ip) = client_ip {
            if is_ip_trusted(&ip, &config.trusted_networks) {
                info!(ip = %ip, "Authenticated via trusted network");
                return Some(Caller {
                    user: ip.to_string(),
                    auth_method: AuthMethod::TrustedNetwork,
                });
            }
        }
    }

    if let Some(email) = cf_user(request.headers()) {
        return Some(Caller {
            user: email.to_string(),
            auth_method: AuthMethod::CloudflareHeader,
        });
    }

    let api_key_valid = bearer_token(request.headers())
        .map(|key| validate_api_key(key, &config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        return Some(Caller {
            user: "api-key".to_string(),
            auth_method: AuthMethod::ApiKey,
        });
    }

    None
}

fn cf_user(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CF_ACCESS_USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
}

/// Validate an API key against the configured keys using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    valid_keys.iter().any(|key| {
        let key_bytes = key.as_bytes();
        // Only compare if lengths match (constant-time for same-length keys)
        provided_bytes.len() == key_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes))
    })
}

/// Extract client IP address, respecting trusted proxies
///
/// SECURITY: X-Forwarded-For is ONLY trusted when the TCP connection comes from a
/// configured trusted proxy. Otherwise the TCP peer address is used.
pub(crate) fn get_client_ip(
    request: &Request,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trusted_proxies: &[ipnet::IpNet],
) -> Option<IpAddr> {
    let peer_ip = connect_info.map(|ci| ci.0.ip())?;

    let peer_is_trusted_proxy = trusted_proxies.iter().any(|net| net.contains(&peer_ip));
    if !peer_is_trusted_proxy {
        return Some(peer_ip);
    }

    // "client, proxy1, proxy2" - the first entry is the original client
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        request
            .headers()
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
    };

    Some(forwarded.or_else(real_ip).unwrap_or(peer_ip))
}

fn is_ip_trusted(ip: &IpAddr, trusted_networks: &[ipnet::IpNet]) -> bool {
    trusted_networks.iter().any(|network| network.contains(ip))
}

/// Parse a comma-separated list of IP addresses and CIDR networks
///
/// Examples:
/// - "192.168.1.0/24" - entire subnet
/// - "10.0.0.5" - single IP (parsed as /32 for IPv4 or /128 for IPv6)
/// - "192.168.1.0/24,10.0.0.0/8" - multiple networks
pub fn parse_trusted_networks(input: &str) -> Vec<ipnet::IpNet> {
    input
        .split(',')
        .filter_map(|s| {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Ok(net) = s.parse::<ipnet::IpNet>() {
                return Some(net);
            }
            if let Ok(ip) = s.parse::<IpAddr>() {
                return Some(ipnet::IpNet::from(ip));
            }
            warn!(input = s, "Failed to parse trusted network entry");
            None
        })
        .collect()
}

/// Extract the caller identity from request headers alone
///
/// Returns the CF Access email, "api-key" for API key auth, or "local-dev" otherwise.
pub fn get_user_email(headers: &HeaderMap) -> String {
    if let Some(email) = cf_user(headers) {
        return email.to_string();
    }
    if bearer_token(headers).is_some() {
        return "api-key".to_string();
    }
    "local-dev".to_string()
}

/// Identity for a request that passed the auth middleware
pub(crate) fn caller(request: &Request) -> Caller {
    request
        .extensions()
        .get::<Caller>()
        .cloned()
        .unwrap_or_else(|| Caller {
            user: get_user_email(request.headers()),
            auth_method: AuthMethod::None,
        })
}

/// Read a JSON request body
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    request: Request,
) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Auth
        .route("/me", get(handlers::get_me))
        // Reference data
        .route("/categories", get(handlers::list_categories))
        // Subscriptions
        .route(
            "/subscriptions",
            get(handlers::list_subscriptions).post(handlers::create_subscription),
        )
        .route(
            "/subscriptions/:id",
            get(handlers::get_subscription)
                .put(handlers::update_subscription)
                .delete(handlers::delete_subscription),
        )
        // Spend summary
        .route("/summary", get(handlers::get_summary))
        .route("/renewals/upcoming", get(handlers::list_upcoming_renewals))
        // Audit
        .route("/audit", get(handlers::list_audit_log));

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    // CSP: scripts from same origin only, inline styles allowed
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve the web UI if a directory was provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() && config.trusted_networks.is_empty() {
        info!("Only Cloudflare Access requests will be accepted (no API keys or trusted networks configured)");
    }

    let app = create_router(db, static_dir, config)
        .into_make_service_with_connect_info::<SocketAddr>();
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error, surfacing validation and lookup failures to the client
    pub fn from_core(err: subslayer_core::Error) -> Self {
        match err {
            subslayer_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            subslayer_core::Error::NotFound(msg) => Self::not_found(&msg),
            other => other.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            internal: Some(err),
        }
    }
}
