//! Authentication endpoints.

use loco_common::auth::{ResendVerificationRequest, VerifyEmailRequest};
use loco_common::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, User};

use crate::error::ClientError;
use crate::gateway::request::{paths, ApiRequest};
use crate::gateway::Gateway;

pub async fn login(gateway: &Gateway, req: &LoginRequest) -> Result<AuthResponse, ClientError> {
    gateway.send(ApiRequest::post(paths::LOGIN).json(req)).await
}

pub async fn register(
    gateway: &Gateway,
    req: &RegisterRequest,
) -> Result<AuthResponse, ClientError> {
    gateway.send(ApiRequest::post(paths::REGISTER).json(req)).await
}

pub async fn logout(gateway: &Gateway) -> Result<MessageResponse, ClientError> {
    gateway.send(ApiRequest::post(paths::LOGOUT)).await
}

/// Explicit refresh. The gateway normally does this on its own; exposed for
/// warm-up flows. A 401 here clears the session and is final.
pub async fn refresh(gateway: &Gateway) -> Result<MessageResponse, ClientError> {
    gateway.send(ApiRequest::post(paths::REFRESH)).await
}

pub async fn me(gateway: &Gateway) -> Result<User, ClientError> {
    gateway.send(ApiRequest::get(paths::ME)).await
}

pub async fn verify_email(
    gateway: &Gateway,
    req: &VerifyEmailRequest,
) -> Result<MessageResponse, ClientError> {
    gateway.send(ApiRequest::post(paths::VERIFY_EMAIL).json(req)).await
}

pub async fn resend_verification(
    gateway: &Gateway,
    req: &ResendVerificationRequest,
) -> Result<MessageResponse, ClientError> {
    gateway
        .send(ApiRequest::post(paths::RESEND_VERIFICATION).json(req))
        .await
}
