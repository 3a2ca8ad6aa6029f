// Handler for PUT /login
//
// The token is a plain SHA-1 of username + password. It identifies a caller,
// it does not authenticate one.
use axum::Json;
use sha1::{Digest, Sha1};
use shared::models::{LoginRequest, LoginResponse};

use super::helpers::BoundBody;

pub async fn handle_login(BoundBody(request): BoundBody<LoginRequest>) -> Json<LoginResponse> {
    tracing::info!(username = %request.username, "Issuing login token");
    Json(LoginResponse {
        token: login_token(&request.username, &request.password),
    })
}

pub fn login_token(username: &str, password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(username.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
