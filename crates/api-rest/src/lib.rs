//! # API REST
//!
//! REST API implementation for the clinic portal.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (cookies, JSON serialization, CORS)
//!
//! The persisted session keys travel as cookies; see [`cookies::CookieStore`]. All decisions are
//! delegated to `portal-core`.

#![warn(rust_2018_idioms)]

pub mod cookies;

use api_shared::{
    GuardRes, HealthRes, HealthService, IdentityRes, LoginReq, MenuRes, NavEntryRes,
    RouteRes, RoutesRes, ScreenRes, SessionRes, ThemeReq, ThemeRes,
};
use axum::{
    extract::{Path as AxumPath, Query, RawQuery, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{AppendHeaders, IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use cookies::CookieStore;
use portal_core::config::{
    login_path_from_env_value, resolve_route_table, store_path_from_env_value,
};
use portal_core::guard::NOT_AUTHORIZED_MESSAGE;
use portal_core::{
    build_menu, Access, Clock, Credential, GuardDecision, Menu, PortalConfig, PortalError,
    Presentation, RouteGuard, RouteRule, Session, SessionStore, SystemClock, Theme, UserProfile,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

type SetCookies = AppendHeaders<Vec<(HeaderName, String)>>;
type ApiError = (StatusCode, &'static str);

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    guard: Arc<RouteGuard>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl AppState {
    pub fn new(cfg: &PortalConfig) -> Self {
        Self::with_clock(cfg, Arc::new(SystemClock))
    }

    /// State with an explicit time source, for deterministic expiry checks.
    pub fn with_clock(cfg: &PortalConfig, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            guard: Arc::new(cfg.route_guard()),
            clock,
        }
    }

    fn sessions(&self, headers: &HeaderMap) -> SessionStore<CookieStore, &(dyn Clock + Send + Sync)> {
        SessionStore::with_clock(CookieStore::from_headers(headers), self.clock.as_ref())
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        get_session,
        login,
        logout,
        menu,
        guard,
        routes,
        get_theme,
        put_theme,
        screen,
    ),
    components(schemas(
        HealthRes,
        IdentityRes,
        SessionRes,
        LoginReq,
        NavEntryRes,
        MenuRes,
        GuardRes,
        RouteRes,
        RoutesRes,
        ThemeReq,
        ThemeRes,
        ScreenRes,
    ))
)]
pub struct ApiDoc;

/// Resolve the portal configuration from the process environment.
///
/// # Environment Variables
/// - `PORTAL_STORE_PATH`: file used by file-backed stores (default: ".portal/session.json")
/// - `PORTAL_LOGIN_PATH`: login screen path (default: "/auth/login")
/// - `PORTAL_ROUTES_FILE`: optional YAML route table replacing the built-in one
///
/// # Errors
/// Returns an error if the login path is invalid, the route table cannot be loaded, or the login
/// path is not public in that table.
pub fn resolve_config_from_env() -> anyhow::Result<PortalConfig> {
    let store_path = store_path_from_env_value(std::env::var("PORTAL_STORE_PATH").ok());
    let login_path = login_path_from_env_value(std::env::var("PORTAL_LOGIN_PATH").ok())?;
    let routes_file = std::env::var("PORTAL_ROUTES_FILE").ok().map(PathBuf::from);
    let routes = resolve_route_table(routes_file)?;

    Ok(PortalConfig::new(store_path, login_path, routes)?)
}

/// Build the REST router with OpenAPI docs and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(get_session).post(login).delete(logout))
        .route("/menu", get(menu))
        .route("/guard", get(guard))
        .route("/routes", get(routes))
        .route("/theme", get(get_theme).put(put_theme))
        .route("/screens", get(screen_root))
        .route("/screens/*path", get(screen))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Current session read from cookies", body = SessionRes)
    )
)]
/// Read the current session
///
/// Never fails: a missing, malformed or expired credential reads as an anonymous session.
#[axum::debug_handler]
async fn get_session(State(state): State<AppState>, headers: HeaderMap) -> Json<SessionRes> {
    Json(session_res(&state.sessions(&headers).read_session()))
}

#[utoipa::path(
    post,
    path = "/session",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Credential stored; cookies set", body = SessionRes),
        (status = 400, description = "Unreadable token or malformed profile"),
        (status = 500, description = "Internal server error")
    )
)]
/// Store a credential issued by the backend login flow
///
/// Writes the token, the profile record and the user id together, then returns the session as
/// it now reads.
#[axum::debug_handler]
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginReq>,
) -> Result<(SetCookies, Json<SessionRes>), ApiError> {
    let user: UserProfile = serde_json::from_value(req.user).map_err(|e| {
        tracing::error!("Login profile rejected: {}", e);
        (StatusCode::BAD_REQUEST, "Malformed user profile")
    })?;

    let mut sessions = state.sessions(&headers);
    let credential = Credential {
        token: req.token,
        user,
    };
    match sessions.login(&credential) {
        Ok(()) => {}
        Err(PortalError::InvalidInput(msg)) => {
            tracing::error!("Login rejected: {}", msg);
            return Err((StatusCode::BAD_REQUEST, "Invalid credential"));
        }
        Err(e) => {
            tracing::error!("Login error: {:?}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
        }
    }

    let session = sessions.read_session();
    Ok((set_cookies(sessions.store()), Json(session_res(&session))))
}

#[utoipa::path(
    delete,
    path = "/session",
    responses(
        (status = 200, description = "Session cookies cleared", body = SessionRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Log out: clear the token, profile and user id cookies together
#[axum::debug_handler]
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(SetCookies, Json<SessionRes>), ApiError> {
    let mut sessions = state.sessions(&headers);
    sessions.logout().map_err(|e| {
        tracing::error!("Logout error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })?;

    Ok((
        set_cookies(sessions.store()),
        Json(session_res(&Session::anonymous())),
    ))
}

#[derive(Debug, Deserialize)]
struct MenuQuery {
    #[serde(default)]
    presentation: Presentation,
}

#[utoipa::path(
    get,
    path = "/menu",
    params(
        ("presentation" = Option<String>, Query, description = "`desktop` (default) or `mobile`")
    ),
    responses(
        (status = 200, description = "Navigation entries visible to the current role", body = MenuRes)
    )
)]
/// Menu for the current visitor
#[axum::debug_handler]
async fn menu(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MenuQuery>,
) -> Json<MenuRes> {
    let session = state.sessions(&headers).read_session();
    Json(menu_res(&build_menu(session.role(), query.presentation)))
}

#[derive(Debug, Deserialize)]
struct GuardQuery {
    path: String,
}

#[utoipa::path(
    get,
    path = "/guard",
    params(
        ("path" = String, Query, description = "Screen path to check, e.g. /dashboard/users")
    ),
    responses(
        (status = 200, description = "Guard decision for the current visitor", body = GuardRes),
        (status = 404, description = "No route matches the path")
    )
)]
/// Guard decision for a screen path, without navigating to it
#[axum::debug_handler]
async fn guard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GuardQuery>,
) -> Result<Json<GuardRes>, ApiError> {
    let session = state.sessions(&headers).read_session();
    let decision = self::check(&state, &query.path, &session)?;
    Ok(Json(guard_res(&query.path, &decision)))
}

#[utoipa::path(
    get,
    path = "/routes",
    responses(
        (status = 200, description = "Route access table", body = RoutesRes)
    )
)]
/// The route-to-access table the guard uses
#[axum::debug_handler]
async fn routes(State(state): State<AppState>) -> Json<RoutesRes> {
    Json(RoutesRes {
        routes: state.guard.table().rules().iter().map(route_res).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/theme",
    responses(
        (status = 200, description = "Stored theme preference", body = ThemeRes)
    )
)]
/// Current theme preference
#[axum::debug_handler]
async fn get_theme(State(state): State<AppState>, headers: HeaderMap) -> Json<ThemeRes> {
    Json(ThemeRes {
        theme: state.sessions(&headers).theme().to_string(),
    })
}

#[utoipa::path(
    put,
    path = "/theme",
    request_body = ThemeReq,
    responses(
        (status = 200, description = "Theme stored", body = ThemeRes),
        (status = 400, description = "Unknown theme")
    )
)]
/// Store a theme preference (`light`, `dark` or `toggle`)
#[axum::debug_handler]
async fn put_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ThemeReq>,
) -> Result<(SetCookies, Json<ThemeRes>), ApiError> {
    let mut sessions = state.sessions(&headers);
    let theme = if req.theme.trim() == "toggle" {
        sessions.theme().toggle()
    } else {
        req.theme
            .parse::<Theme>()
            .map_err(|_| (StatusCode::BAD_REQUEST, "Unknown theme"))?
    };

    sessions.set_theme(theme).map_err(|e| {
        tracing::error!("Theme error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })?;

    Ok((
        set_cookies(sessions.store()),
        Json(ThemeRes {
            theme: theme.to_string(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/screens/{path}",
    params(
        ("path" = String, Path, description = "Screen path below the portal root")
    ),
    responses(
        (status = 200, description = "Screen may be rendered", body = ScreenRes),
        (status = 303, description = "Not signed in; redirected to the login screen"),
        (status = 403, description = "Signed in but not authorized; placeholder returned", body = GuardRes),
        (status = 404, description = "No route matches the path")
    )
)]
/// Open a screen through the route guard
///
/// Redirects anonymous visitors to login, answers `403` with the not-authorized placeholder
/// (leaving the URL unchanged) for roles the route does not admit, and otherwise returns the
/// screen descriptor with the visitor's menu.
#[axum::debug_handler]
async fn screen(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(path): AxumPath<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    open_screen(&state, &headers, &format!("/{path}"), query)
}

async fn screen_root(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    open_screen(&state, &headers, "/", query)
}

fn open_screen(
    state: &AppState,
    headers: &HeaderMap,
    path: &str,
    query: Option<String>,
) -> Result<Response, ApiError> {
    let requested = match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_owned(),
    };

    let session = state.sessions(headers).read_session();
    let response = match check(state, &requested, &session)? {
        GuardDecision::Redirect { to } => Redirect::to(&to).into_response(),
        decision @ GuardDecision::Forbidden => {
            (StatusCode::FORBIDDEN, Json(guard_res(&requested, &decision))).into_response()
        }
        GuardDecision::Allow => {
            let rule = state.guard.table().lookup(&requested).map_err(|_| not_found())?;
            Json(ScreenRes {
                path: path.to_owned(),
                pattern: rule.pattern.as_str().to_owned(),
                menu: menu_res(&build_menu(session.role(), Presentation::Desktop)),
            })
            .into_response()
        }
    };
    Ok(response)
}

fn check(state: &AppState, path: &str, session: &Session) -> Result<GuardDecision, ApiError> {
    match state.guard.check(path, session) {
        Ok(decision) => Ok(decision),
        Err(PortalError::UnknownRoute(_)) => Err(not_found()),
        Err(e) => {
            tracing::error!("Guard error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, "No route matches the path")
}

fn set_cookies(store: &CookieStore) -> SetCookies {
    AppendHeaders(
        store
            .set_cookie_headers()
            .iter()
            .map(|value| (header::SET_COOKIE, value.clone()))
            .collect(),
    )
}

fn session_res(session: &Session) -> SessionRes {
    SessionRes {
        authenticated: session.is_authenticated(),
        identity: session.identity().map(|identity| IdentityRes {
            id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            role: identity.role.to_string(),
        }),
    }
}

fn menu_res(menu: &Menu) -> MenuRes {
    MenuRes {
        presentation: match menu.presentation {
            Presentation::Desktop => "desktop".into(),
            Presentation::Mobile => "mobile".into(),
        },
        role: menu.role.map(|role| role.to_string()),
        entries: menu
            .entries
            .iter()
            .map(|entry| NavEntryRes {
                label: entry.label.into(),
                destination: entry.destination.into(),
                icon: entry.icon.into(),
            })
            .collect(),
    }
}

fn guard_res(path: &str, decision: &GuardDecision) -> GuardRes {
    let (outcome, to, message) = match decision {
        GuardDecision::Allow => ("allow", None, None),
        GuardDecision::Forbidden => ("forbidden", None, Some(NOT_AUTHORIZED_MESSAGE.to_owned())),
        GuardDecision::Redirect { to } => ("redirect", Some(to.clone()), None),
    };
    GuardRes {
        path: path.to_owned(),
        outcome: outcome.into(),
        to,
        message,
    }
}

fn route_res(rule: &RouteRule) -> RouteRes {
    let (access, roles) = match rule.access {
        Access::Public => ("public", Vec::new()),
        Access::Authenticated => ("authenticated", Vec::new()),
        Access::Roles(roles) => ("roles", roles.iter().map(|r| r.to_string()).collect()),
    };
    RouteRes {
        pattern: rule.pattern.as_str().to_owned(),
        access: access.into(),
        roles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::auth::encode_cookie_value;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use portal_core::FixedClock;
    use tower::ServiceExt;

    const NOW: i64 = 1_760_000_000;

    fn app() -> Router {
        router(AppState::with_clock(
            &PortalConfig::default(),
            Arc::new(FixedClock(NOW)),
        ))
    }

    fn token(exp: i64) -> String {
        format!(
            "{}.{}.c2ln",
            encode_cookie_value(r#"{"alg":"HS256"}"#),
            encode_cookie_value(&format!(r#"{{"exp":{exp}}}"#))
        )
    }

    fn user_json(role: &str) -> String {
        format!(r#"{{"user":{{"id":"64f1c","name":"Asha Rao","email":"asha@clinic.example","role":"{role}"}}}}"#)
    }

    fn cookie_for(role: &str) -> String {
        format!(
            "token={}; userData={}; userId={}",
            encode_cookie_value(&token(NOW + 3600)),
            encode_cookie_value(&user_json(role)),
            encode_cookie_value("64f1c")
        )
    }

    async fn send(request: Request<Body>) -> Response {
        app().oneshot(request).await.unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie_values(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = send(get("/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ok"], true);
    }

    #[tokio::test]
    async fn session_without_cookies_is_anonymous() {
        let body = body_json(send(get("/session", None)).await).await;
        assert_eq!(body, serde_json::json!({"authenticated": false, "identity": null}));
    }

    #[tokio::test]
    async fn session_reads_role_from_cookies() {
        let cookie = cookie_for("admin");
        let body = body_json(send(get("/session", Some(&cookie))).await).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["identity"]["role"], "admin");
    }

    #[tokio::test]
    async fn expired_cookie_token_reads_as_anonymous() {
        let cookie = format!(
            "token={}; userData={}",
            encode_cookie_value(&token(1)),
            encode_cookie_value(&user_json("admin"))
        );
        let body = body_json(send(get("/session", Some(&cookie))).await).await;
        assert_eq!(body["authenticated"], false);
    }

    #[tokio::test]
    async fn login_sets_three_cookies() {
        let request = json_request(
            "POST",
            "/session",
            serde_json::json!({
                "token": token(NOW + 60),
                "user": {"id": 9, "name": "Front Desk", "email": "desk@clinic.example", "role": "recp"}
            }),
        );
        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookie_values(&response);
        assert_eq!(cookies.len(), 3);
        assert!(cookies.iter().any(|c| c.starts_with("userId=OQ;")));

        let body = body_json(response).await;
        assert_eq!(body["identity"]["role"], "recp");
        assert_eq!(body["identity"]["id"], "9");
    }

    #[tokio::test]
    async fn login_with_two_segment_token_is_rejected() {
        let request = json_request(
            "POST",
            "/session",
            serde_json::json!({
                "token": "abc.def",
                "user": {"id": "1", "name": "X", "email": "x@clinic.example", "role": "user"}
            }),
        );
        assert_eq!(send(request).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_with_unknown_role_is_rejected() {
        let request = json_request(
            "POST",
            "/session",
            serde_json::json!({
                "token": token(NOW + 60),
                "user": {"id": "1", "name": "X", "email": "x@clinic.example", "role": "owner"}
            }),
        );
        assert_eq!(send(request).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_with_blank_name_is_rejected() {
        let request = json_request(
            "POST",
            "/session",
            serde_json::json!({
                "token": token(NOW + 60),
                "user": {"id": "1", "name": "  ", "role": "user"}
            }),
        );
        assert_eq!(send(request).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_accepts_profile_without_email() {
        let request = json_request(
            "POST",
            "/session",
            serde_json::json!({
                "token": token(NOW + 60),
                "user": {"id": "1", "name": "Root", "role": "admin"}
            }),
        );
        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["identity"]["role"], "admin");
        assert!(body["identity"]["email"].is_null());
    }

    #[tokio::test]
    async fn logout_clears_session_cookies_only() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/session")
            .header(header::COOKIE, cookie_for("doctor"))
            .body(Body::empty())
            .unwrap();
        let response = send(request).await;

        let cookies = set_cookie_values(&response);
        assert_eq!(cookies.len(), 3);
        assert!(cookies.iter().all(|c| c.ends_with("Max-Age=0")));
        assert!(!cookies.iter().any(|c| c.starts_with("theme=")));
    }

    #[tokio::test]
    async fn anonymous_screen_request_redirects_to_login() {
        let response = send(get("/screens/dashboard/users", None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/auth/login?next=/dashboard/users"
        );
    }

    #[tokio::test]
    async fn doctor_gets_placeholder_for_user_management() {
        let cookie = cookie_for("doctor");
        let response = send(get("/screens/dashboard/users", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["outcome"], "forbidden");
        assert_eq!(body["path"], "/dashboard/users");
        assert_eq!(body["message"], NOT_AUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn admin_opens_user_management() {
        let cookie = cookie_for("admin");
        let response = send(get("/screens/dashboard/users", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["pattern"], "/dashboard/users");
        assert_eq!(body["menu"]["role"], "admin");
    }

    #[tokio::test]
    async fn public_root_screen_is_open() {
        assert_eq!(send(get("/screens", None)).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn guard_endpoint_reports_unknown_routes() {
        let response = send(get("/guard?path=/billing", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn guard_endpoint_reports_redirect_target() {
        let body = body_json(send(get("/guard?path=/profile", None)).await).await;
        assert_eq!(body["outcome"], "redirect");
        assert_eq!(body["to"], "/auth/login?next=/profile");
    }

    #[tokio::test]
    async fn mobile_menu_for_receptionist() {
        let cookie = cookie_for("recp");
        let body = body_json(send(get("/menu?presentation=mobile", Some(&cookie))).await).await;
        assert_eq!(body["presentation"], "mobile");
        assert_eq!(body["entries"][0]["label"], "New Appointment (Existing User)");
    }

    #[tokio::test]
    async fn routes_lists_the_table() {
        let body = body_json(send(get("/routes", None)).await).await;
        let routes = body["routes"].as_array().unwrap();
        assert!(routes
            .iter()
            .any(|r| r["pattern"] == "/dashboard/users/export" && r["roles"] == serde_json::json!(["admin"])));
    }

    #[tokio::test]
    async fn theme_toggle_sets_cookie() {
        let request = Request::builder()
            .method("PUT")
            .uri("/theme")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, format!("theme={}", encode_cookie_value("dark")))
            .body(Body::from(r#"{"theme":"toggle"}"#))
            .unwrap();
        let response = send(request).await;

        assert_eq!(set_cookie_values(&response), vec![api_shared::auth::set_cookie("theme", "light")]);
        assert_eq!(body_json(response).await["theme"], "light");
    }

    #[tokio::test]
    async fn unknown_theme_is_rejected() {
        let request = json_request("PUT", "/theme", serde_json::json!({"theme": "sepia"}));
        assert_eq!(send(request).await.status(), StatusCode::BAD_REQUEST);
    }
}
