use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    auth::{
        dto::{LoginResponse, PublicAccount, RegisterRequest, RegisterResponse},
        extractors::{AuthUser, LoginPayload},
        services,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let account = services::register(
        state.accounts.as_ref(),
        payload.username.as_deref(),
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user: account.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    LoginPayload(payload): LoginPayload,
) -> Result<Json<LoginResponse>, AppError> {
    let (account, access_token) = services::login(
        state.accounts.as_ref(),
        &state.tokens,
        &payload.identifier,
        &payload.password,
    )
    .await?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.tokens.ttl().whole_seconds(),
        username: account.username.clone(),
        user: account.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<PublicAccount>, AppError> {
    let account = state.accounts.find_by_id(account_id).await?.ok_or_else(|| {
        error!(account_id, "token subject has no account");
        AppError::Unauthorized
    })?;
    Ok(Json(account.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::dto::LoginRequest;
    use crate::auth::repo::memory::MemoryAccountDirectory;
    use crate::state::testing::StubCatalog;

    fn register_body(email: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some("chef".into()),
            email: email.into(),
            password: "pantry-pass".into(),
        }
    }

    #[tokio::test]
    async fn register_login_me_flow() {
        let dir = Arc::new(MemoryAccountDirectory::default());
        let state = AppState::fake_with(dir.clone(), StubCatalog::default());

        let (status, Json(created)) =
            register(State(state.clone()), Json(register_body("chef@example.com")))
                .await
                .expect("register");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.user.email, "chef@example.com");

        let Json(session) = login(
            State(state.clone()),
            LoginPayload(LoginRequest {
                identifier: "chef@example.com".into(),
                password: "pantry-pass".into(),
            }),
        )
        .await
        .expect("login");
        assert_eq!(session.token_type, "bearer");
        assert_eq!(session.expires_in, 30 * 60);
        assert_eq!(session.username.as_deref(), Some("chef"));

        let subject = state.tokens.verify(&session.access_token).unwrap().subject_id;
        let Json(me) = get_me(State(state.clone()), AuthUser(subject))
            .await
            .expect("me");
        assert_eq!(me.id, created.user.id);
        assert!(me.last_login.is_some());
    }

    #[tokio::test]
    async fn second_registration_conflicts() {
        let dir = Arc::new(MemoryAccountDirectory::default());
        let state = AppState::fake_with(dir.clone(), StubCatalog::default());

        register(State(state.clone()), Json(register_body("dup@example.com")))
            .await
            .unwrap();
        let err = register(State(state), Json(register_body("dup@example.com")))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(dir.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn me_for_unknown_account_is_unauthorized() {
        let state = AppState::fake();
        let err = get_me(State(state), AuthUser(404)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn login_request_accepts_email_or_username_keys() {
        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.co","password":"x"}"#).unwrap();
        assert_eq!(by_email.identifier, "a@b.co");
        let by_username: LoginRequest =
            serde_json::from_str(r#"{"username":"chef","password":"x"}"#).unwrap();
        assert_eq!(by_username.identifier, "chef");
    }
}
