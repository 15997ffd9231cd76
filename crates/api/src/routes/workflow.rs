//! Approval workflow routes.
//!
//! The acting role is never taken from the request body; it resolves
//! from the authenticated approver's user record inside the decision
//! transaction.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::routes::workflow_error_response;
use mikopo_core::workflow::{Decision, FinalResult};
use mikopo_db::WorkflowRepository;

/// Creates the workflow routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans/{id}/workflow", get(get_workflow))
        .route("/loans/{id}/decision", post(submit_decision))
}

/// Request body for submitting a decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// The decision to apply.
    pub action: Decision,
    /// Optional free-text notes.
    pub notes: Option<String>,
}

/// Response body for an applied decision.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    /// The applied decision.
    pub action: Decision,
    /// The application's new status.
    pub status: String,
    /// The stage now awaiting action, absent once terminal.
    pub current_stage: Option<String>,
    /// Whether this decision ended the workflow.
    pub is_final_decision: bool,
    /// Terminal result, present only on the final decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_result: Option<FinalResult>,
}

/// GET /loans/{id}/workflow - Fetch the workflow, creating it lazily.
async fn get_workflow(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = WorkflowRepository::new((*state.db).clone());
    match repo.get_or_create_workflow(id).await {
        Ok(workflow) => Json(workflow).into_response(),
        Err(e) => {
            error!(error = %e, loan_id = %id, "Failed to fetch workflow");
            workflow_error_response(&e)
        }
    }
}

/// POST /loans/{id}/decision - Apply a decision at the current stage.
async fn submit_decision(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> impl IntoResponse {
    let repo = WorkflowRepository::new((*state.db).clone());
    match repo
        .submit_decision(id, user.user_id(), payload.action, payload.notes)
        .await
    {
        Ok(record) => Json(DecisionResponse {
            action: record.outcome.decision,
            status: record.application.status,
            current_stage: record.workflow.current_stage,
            is_final_decision: record.outcome.is_final_decision,
            final_result: record.outcome.final_result,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, loan_id = %id, approver = %user.user_id(), "Decision rejected");
            workflow_error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"action": "approve", "notes": "Looks solid"}"#, Decision::Approve, Some("Looks solid"))]
    #[case(r#"{"action": "reject"}"#, Decision::Reject, None)]
    fn test_decision_request_parses_action(
        #[case] body: &str,
        #[case] action: Decision,
        #[case] notes: Option<&str>,
    ) {
        let req: DecisionRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.action, action);
        assert_eq!(req.notes.as_deref(), notes);
    }

    #[test]
    fn test_final_decision_response_shape() {
        let resp = DecisionResponse {
            action: Decision::Approve,
            status: "approved".to_string(),
            current_stage: None,
            is_final_decision: true,
            final_result: Some(FinalResult::Successful),
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["action"], "approve");
        assert_eq!(value["status"], "approved");
        assert_eq!(value["current_stage"], serde_json::Value::Null);
        assert_eq!(value["is_final_decision"], true);
        assert_eq!(value["final_result"], "SUCCESSFUL");
    }

    #[test]
    fn test_intermediate_response_omits_final_result() {
        let resp = DecisionResponse {
            action: Decision::Approve,
            status: "pending_director".to_string(),
            current_stage: Some("director".to_string()),
            is_final_decision: false,
            final_result: None,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("final_result").is_none());
        assert_eq!(value["current_stage"], "director");
    }
}
