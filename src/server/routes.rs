//! HTTP route handlers for the Pet Connect API.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::catalog::{PetFilterParams, PetFilters, PetReport};
use crate::core::errors::{AppError, AppResult};
use crate::core::ids::{FaqId, PetId, SessionId, UserId};
use crate::faq::{FaqMatcher, load_corpus};

use super::state::AppState;

/// Header carrying the user id asserted by the identity-provider gateway.
pub const USER_HEADER: &str = "x-user-id";

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/faq/match", post(match_faq))
        .route("/api/faqs", get(list_faqs))
        .route("/api/chat/sessions", post(open_session))
        .route(
            "/api/chat/sessions/{id}",
            get(get_session).delete(close_session),
        )
        .route("/api/chat/sessions/{id}/messages", post(send_message))
        .route("/api/pets", get(list_pets).post(report_pet))
        .route("/api/pets/{id}", get(get_pet))
        .route("/api/pets/{id}/applications", post(apply_for_pet))
        .route("/api/pets/{id}/adopted", post(mark_adopted))
        .route("/api/me/profile", get(my_profile))
        .route("/api/me/applications", get(my_applications))
        .route("/api/me/pets", get(my_pets))
        .with_state(state)
}

/// Resolve the authenticated user from request headers.
///
/// # Errors
/// Returns `Unauthorized` if the header is missing or malformed.
pub fn current_user(headers: &HeaderMap) -> AppResult<UserId> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .ok_or(AppError::Unauthorized)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pet-connect",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// FAQ match request.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Free-text user query.
    pub query: String,
}

/// FAQ match response.
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    /// Matched answer or the fallback reply.
    pub answer: String,
    /// Whether an FAQ entry matched.
    pub matched: bool,
    /// Matched entry, if any.
    pub faq_id: Option<FaqId>,
}

/// Stateless matcher endpoint over the current corpus.
async fn match_faq(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MatchRequest>,
) -> Json<MatchResponse> {
    let corpus = load_corpus(state.faqs.as_ref()).await;
    let matcher = FaqMatcher::new(&corpus);
    let hit = matcher.find(&request.query);

    Json(MatchResponse {
        answer: matcher.answer(&request.query).to_string(),
        matched: hit.is_some(),
        faq_id: hit.map(|entry| entry.id),
    })
}

async fn list_faqs(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let entries = state.faqs.list().await?;
    Ok(Json(entries))
}

/// Open a widget session; the corpus is loaded once here.
async fn open_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let corpus = load_corpus(state.faqs.as_ref()).await;
    let session = state.sessions.open(corpus).await;
    (StatusCode::CREATED, Json(session.snapshot().await))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("chat session {id}")))?;
    Ok(Json(session.snapshot().await))
}

/// Chat message request.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message text as typed.
    pub text: String,
}

/// Append a user message; the bot reply shows up in the transcript later.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(request): Json<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("chat session {id}")))?;
    let message = session.send(&request.text).await?;
    Ok((StatusCode::ACCEPTED, Json(message)))
}

async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> AppResult<StatusCode> {
    if state.sessions.close(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("chat session {id}")))
    }
}

async fn list_pets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PetFilterParams>,
) -> AppResult<impl IntoResponse> {
    let pets = state.pets.list(PetFilters::from(params)).await?;
    Ok(Json(pets))
}

async fn get_pet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PetId>,
) -> AppResult<impl IntoResponse> {
    let pet = state
        .pets
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pet {id}")))?;
    Ok(Json(pet))
}

async fn report_pet(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(report): Json<PetReport>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers)?;
    let pet = state.pets.report(user, report).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// Only the user who listed a pet may mark it adopted.
async fn mark_adopted(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PetId>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers)?;
    let pet = state
        .pets
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pet {id}")))?;
    if pet.reported_by != Some(user) {
        return Err(AppError::Unauthorized);
    }

    state.pets.mark_adopted(id).await?;
    let pet = state
        .pets
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pet {id}")))?;
    Ok(Json(pet))
}

/// Adoption application request.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicationRequest {
    /// Why the applicant would be a good match.
    #[serde(default)]
    pub reason: Option<String>,
}

async fn apply_for_pet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PetId>,
    headers: HeaderMap,
    Json(request): Json<ApplicationRequest>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers)?;
    let application = state.applications.submit(user, id, request.reason).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

async fn my_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers)?;
    let profile = state
        .profiles
        .get(user)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {user}")))?;
    Ok(Json(profile))
}

async fn my_applications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers)?;
    let applications = state.applications.list_for_user(user).await?;
    Ok(Json(applications))
}

async fn my_pets(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers)?;
    let pets = state.pets.list_reported_by(user).await?;
    Ok(Json(pets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::core::config::{AppConfig, ChatConfig};
    use crate::faq::{FALLBACK_ANSWER, FaqEntry};
    use crate::storage::Database;

    async fn test_state() -> Arc<AppState> {
        let db = Database::open_in_memory().await.unwrap();
        let config = AppConfig {
            chat: ChatConfig {
                reply_delay_ms: 0,
                session_capacity: 8,
            },
            ..AppConfig::default()
        };
        let state = AppState::with_database(&db, config).unwrap();
        state
            .faqs
            .insert(FaqEntry::new("fee", "$50"))
            .await
            .unwrap();
        state
            .faqs
            .insert(FaqEntry::new("fees for adoption", "$75"))
            .await
            .unwrap();
        state
    }

    async fn call(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        user: Option<UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = create_router(Arc::clone(state))
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state().await;
        let (status, body) = call(&state, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_match_endpoint_first_match_wins() {
        let state = test_state().await;
        let (status, body) = call(
            &state,
            Method::POST,
            "/api/faq/match",
            None,
            Some(serde_json::json!({ "query": "what are the adoption fees" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "$50");
        assert_eq!(body["matched"], true);

        let (_, body) = call(
            &state,
            Method::POST,
            "/api/faq/match",
            None,
            Some(serde_json::json!({ "query": "do you have parrots" })),
        )
        .await;
        assert_eq!(body["answer"], FALLBACK_ANSWER);
        assert_eq!(body["matched"], false);
        assert!(body["faq_id"].is_null());
    }

    #[tokio::test]
    async fn test_chat_session_flow() {
        let state = test_state().await;
        let (status, body) = call(&state, Method::POST, "/api/chat/sessions", None, None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["suggested_questions"].as_array().map(Vec::len), Some(3));
        let id = body["session_id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &state,
            Method::POST,
            &format!("/api/chat/sessions/{id}/messages"),
            None,
            Some(serde_json::json!({ "text": "Any FEE?" })),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["sender"], "user");

        let session = state.sessions.get(id.parse().unwrap()).await.unwrap();
        session.wait_idle().await;

        let (status, body) = call(
            &state,
            Method::GET,
            &format!("/api/chat/sessions/{id}"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"][2]["text"], "$50");
        assert_eq!(body["messages"][2]["sender"], "bot");
        assert_eq!(body["typing"], false);

        let (status, _) = call(
            &state,
            Method::POST,
            &format!("/api/chat/sessions/{id}/messages"),
            None,
            Some(serde_json::json!({ "text": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let uri = format!("/api/chat/sessions/{id}");
        let (status, _) = call(&state, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&state, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_apply_and_dashboard() {
        let state = test_state().await;
        let user = UserId::new();

        let (status, _) = call(
            &state,
            Method::POST,
            "/api/pets",
            None,
            Some(serde_json::json!({ "name": "Rex", "species": "Dog" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, pet) = call(
            &state,
            Method::POST,
            "/api/pets",
            Some(user),
            Some(serde_json::json!({ "name": "Rex", "species": "Dog", "size": "Large" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let pet_id = pet["id"].as_str().unwrap().to_string();

        let (status, pets) = call(&state, Method::GET, "/api/pets?species=Dog&adopted=false", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pets.as_array().map(Vec::len), Some(1));

        let (_, pets) = call(&state, Method::GET, "/api/pets?species=Cat", None, None).await;
        assert_eq!(pets.as_array().map(Vec::len), Some(0));

        let (status, _) = call(&state, Method::GET, &format!("/api/pets/{pet_id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);

        let apply_uri = format!("/api/pets/{pet_id}/applications");
        let reason = serde_json::json!({ "reason": "Big garden" });
        let (status, application) =
            call(&state, Method::POST, &apply_uri, Some(user), Some(reason.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(application["status"], "Pending");

        let (status, _) = call(&state, Method::POST, &apply_uri, Some(user), Some(reason)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, mine) = call(&state, Method::GET, "/api/me/applications", Some(user), None).await;
        assert_eq!(mine[0]["pet"]["name"], "Rex");

        let (_, reported) = call(&state, Method::GET, "/api/me/pets", Some(user), None).await;
        assert_eq!(reported.as_array().map(Vec::len), Some(1));

        let (status, profile) = call(&state, Method::GET, "/api/me/profile", Some(user), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["full_name"], "User");

        let adopted_uri = format!("/api/pets/{pet_id}/adopted");
        let (status, _) = call(&state, Method::POST, &adopted_uri, Some(UserId::new()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, pet) = call(&state, Method::POST, &adopted_uri, Some(user), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pet["is_adopted"], true);

        let (status, _) = call(
            &state,
            Method::POST,
            &apply_uri,
            Some(UserId::new()),
            Some(serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_pet_is_not_found() {
        let state = test_state().await;
        let uri = format!("/api/pets/{}", PetId::new());
        let (status, body) = call(&state, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("pet"));
    }

    #[test]
    fn test_current_user_requires_valid_header() {
        let mut headers = HeaderMap::new();
        assert!(matches!(current_user(&headers), Err(AppError::Unauthorized)));

        headers.insert(USER_HEADER, "nope".parse().unwrap());
        assert!(current_user(&headers).is_err());

        let user = UserId::new();
        headers.insert(USER_HEADER, user.to_string().parse().unwrap());
        assert_eq!(current_user(&headers).unwrap(), user);
    }
}
