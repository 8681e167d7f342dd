use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, favorites, grocery, pantry, preferences, recipes, support};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(pantry::router())
        .merge(grocery::router())
        .merge(preferences::router())
        .merge(favorites::router())
        .merge(recipes::router())
        .merge(support::router())
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Easy Kitchen API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api_router())
        // Older clients post support messages without the /api prefix.
        .merge(support::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;

    async fn status_of(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<(&str, &str)>,
    ) -> StatusCode {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some((content_type, payload)) => builder
                .header(CONTENT_TYPE, content_type)
                .body(Body::from(payload.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn root_reports_version() {
        let Json(body) = root().await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn public_routes_are_mounted() {
        let app = build_app(AppState::fake());
        assert_eq!(status_of(&app, Method::GET, "/", None).await, StatusCode::OK);
        assert_eq!(status_of(&app, Method::GET, "/health", None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn collection_routes_accept_trailing_slash() {
        let app = build_app(AppState::fake());
        let json = Some(("application/json", "{}"));
        for (method, uri, body) in [
            (Method::GET, "/api/pantry", None),
            (Method::GET, "/api/pantry/", None),
            (Method::POST, "/api/pantry/", json),
            (Method::GET, "/api/favorites/", None),
            (Method::POST, "/api/preferences/", json),
        ] {
            // reaching the auth check means the route matched
            assert_eq!(
                status_of(&app, method.clone(), uri, body).await,
                StatusCode::UNAUTHORIZED,
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn login_accepts_password_form() {
        let app = build_app(AppState::fake());
        let form = "application/x-www-form-urlencoded";

        let unknown = status_of(
            &app,
            Method::POST,
            "/api/login",
            Some((form, "username=a%40b.co&password=pantry-pass")),
        )
        .await;
        assert_eq!(unknown, StatusCode::UNAUTHORIZED);

        let created = status_of(
            &app,
            Method::POST,
            "/api/register",
            Some((
                "application/json",
                r#"{"username":"chef","email":"a@b.co","password":"pantry-pass"}"#,
            )),
        )
        .await;
        assert_eq!(created, StatusCode::CREATED);

        for body in [
            "username=a%40b.co&password=pantry-pass",
            "grant_type=password&username=chef&password=pantry-pass",
        ] {
            assert_eq!(
                status_of(&app, Method::POST, "/api/login", Some((form, body))).await,
                StatusCode::OK,
                "{body}"
            );
        }
    }

    #[tokio::test]
    async fn support_alias_is_mounted_at_root() {
        let app = build_app(AppState::fake());
        let invalid = Some((
            "application/json",
            r#"{"name":"Ada","email":"nope","message":"hi"}"#,
        ));
        assert_eq!(
            status_of(&app, Method::POST, "/support/send_message", invalid).await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(&app, Method::POST, "/api/support/send_message", invalid).await,
            StatusCode::BAD_REQUEST
        );
    }
}
