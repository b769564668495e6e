//! Submission endpoints.
//!
//! The platform double-wraps these payloads in a `{ data }` envelope; the
//! wrappers here unwrap it so callers see the domain types.

use loco_common::{DataEnvelope, Paginated, RunResult, Submission};
use serde_json::json;

use crate::error::ClientError;
use crate::gateway::request::ApiRequest;
use crate::gateway::Gateway;

/// Create a submission. The returned record is `Pending`; watch it with
/// the poller.
pub async fn submit(
    gateway: &Gateway,
    problem_id: i64,
    language_id: i64,
    code: &str,
) -> Result<Submission, ClientError> {
    let envelope: DataEnvelope<Submission> = gateway
        .send(
            ApiRequest::post(format!("/problems/{problem_id}/submissions")).json(&json!({
                "language_id": language_id,
                "code": code,
            })),
        )
        .await?;
    Ok(envelope.data)
}

/// Run code against the sample tests without creating a submission.
pub async fn run(
    gateway: &Gateway,
    problem_id: i64,
    language_id: i64,
    code: &str,
) -> Result<RunResult, ClientError> {
    let envelope: DataEnvelope<RunResult> = gateway
        .send(ApiRequest::post(format!("/problems/{problem_id}/run")).json(&json!({
            "language_id": language_id,
            "code": code,
        })))
        .await?;
    Ok(envelope.data)
}

/// Current state of one submission.
pub async fn get(gateway: &Gateway, id: i64) -> Result<Submission, ClientError> {
    let envelope: DataEnvelope<Submission> = gateway
        .send(ApiRequest::get(format!("/submissions/{id}")))
        .await?;
    Ok(envelope.data)
}

pub async fn list_for_problem(
    gateway: &Gateway,
    problem_id: i64,
    page: i64,
    limit: i64,
) -> Result<Paginated<Submission>, ClientError> {
    let envelope: DataEnvelope<Paginated<Submission>> = gateway
        .send(
            ApiRequest::get(format!("/problems/{problem_id}/submissions"))
                .query("page", page)
                .query("limit", limit),
        )
        .await?;
    Ok(envelope.data)
}

pub async fn list_mine(
    gateway: &Gateway,
    page: i64,
    limit: i64,
) -> Result<Paginated<Submission>, ClientError> {
    let envelope: DataEnvelope<Paginated<Submission>> = gateway
        .send(
            ApiRequest::get("/submissions")
                .query("page", page)
                .query("limit", limit),
        )
        .await?;
    Ok(envelope.data)
}
