//! Loan application intake and listing routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::routes::workflow_error_response;
use mikopo_core::workflow::{ApplicationStatus, WorkflowError};
use mikopo_db::LoanRepository;
use mikopo_db::repositories::loan::{CreateLoanInput, LoanFilter};
use mikopo_shared::AppError;
use mikopo_shared::types::{PageRequest, PageResponse};

/// Creates the loan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans", post(create_loan).get(list_loans))
        .route("/loans/{id}", get(get_loan))
}

/// Request body for creating a loan application.
#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    /// Client's display name.
    pub client_name: String,
    /// Optional client phone number.
    pub client_phone: Option<String>,
    /// Requested amount, must be positive.
    pub amount: Decimal,
    /// Purpose of the loan.
    pub purpose: String,
    /// Client's declared monthly income.
    pub monthly_income: Decimal,
}

/// Query parameters for listing loan applications.
#[derive(Debug, Default, Deserialize)]
pub struct ListLoansQuery {
    /// Filter by application status.
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl ListLoansQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page).max(1),
            per_page: self.per_page.unwrap_or(defaults.per_page).clamp(1, 100),
        }
    }
}

fn app_error_response(e: &AppError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": e.to_string()
        })),
    )
        .into_response()
}

/// Validates an intake request before it touches the database, so a
/// client mistake surfaces as a 400 rather than a constraint failure.
fn validate_create(payload: &CreateLoanRequest) -> Result<(), AppError> {
    if payload.amount <= Decimal::ZERO {
        return Err(AppError::Validation(
            "Loan amount must be positive".to_string(),
        ));
    }

    if payload.monthly_income < Decimal::ZERO {
        return Err(AppError::Validation(
            "Monthly income cannot be negative".to_string(),
        ));
    }

    if payload.client_name.trim().is_empty() || payload.purpose.trim().is_empty() {
        return Err(AppError::Validation(
            "Client name and purpose are required".to_string(),
        ));
    }

    Ok(())
}

/// POST /loans - Submit a loan application.
///
/// Only field officers submit applications. Submission counts as the
/// field officer stage's approval, so the created application is
/// already awaiting the manager.
async fn create_loan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateLoanRequest>,
) -> impl IntoResponse {
    if user.role() != "field_officer" {
        return app_error_response(&AppError::Forbidden(
            "Only field officers can submit loan applications".to_string(),
        ));
    }

    if let Err(e) = validate_create(&payload) {
        return app_error_response(&e);
    }

    let repo = LoanRepository::new((*state.db).clone());
    match repo
        .create(CreateLoanInput {
            client_name: payload.client_name,
            client_phone: payload.client_phone,
            amount: payload.amount,
            purpose: payload.purpose,
            monthly_income: payload.monthly_income,
            created_by: user.user_id(),
            officer_name: user.name().to_string(),
        })
        .await
    {
        Ok(application) => {
            info!(loan_id = %application.id, officer = %user.user_id(), "Loan application created");
            (StatusCode::CREATED, Json(application)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create loan application");
            workflow_error_response(&e)
        }
    }
}

/// GET /loans - List loan applications, newest first.
async fn list_loans(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListLoansQuery>,
) -> impl IntoResponse {
    let filter = match query.status.as_deref() {
        Some(raw) => match ApplicationStatus::parse(raw) {
            Some(status) => LoanFilter {
                status: Some(status),
            },
            None => {
                return app_error_response(&AppError::Validation(format!(
                    "Unknown status filter: {raw}"
                )));
            }
        },
        None => LoanFilter::default(),
    };

    let page = query.page_request();
    let repo = LoanRepository::new((*state.db).clone());
    match repo.list(filter, &page).await {
        Ok((applications, total)) => {
            Json(PageResponse::new(applications, page.page, page.per_page, total)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list loan applications");
            workflow_error_response(&e)
        }
    }
}

/// GET /loans/{id} - Fetch one loan application.
async fn get_loan(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(application)) => Json(application).into_response(),
        Ok(None) => workflow_error_response(&WorkflowError::ApplicationNotFound(id)),
        Err(e) => {
            error!(error = %e, "Failed to fetch loan application");
            workflow_error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 20)]
    #[case(Some(3), Some(50), 3, 50)]
    #[case(Some(0), Some(500), 1, 100)]
    fn test_page_request_defaults_and_clamps(
        #[case] page: Option<u32>,
        #[case] per_page: Option<u32>,
        #[case] expect_page: u32,
        #[case] expect_per_page: u32,
    ) {
        let query = ListLoansQuery {
            status: None,
            page,
            per_page,
        };
        let req = query.page_request();
        assert_eq!(req.page, expect_page);
        assert_eq!(req.per_page, expect_per_page);
    }

    fn intake_request(amount: &str, monthly_income: &str) -> CreateLoanRequest {
        CreateLoanRequest {
            client_name: "Neema Hassan".to_string(),
            client_phone: None,
            amount: amount.parse().unwrap(),
            purpose: "Poultry stock expansion".to_string(),
            monthly_income: monthly_income.parse().unwrap(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        assert!(validate_create(&intake_request("2500000.00", "450000.00")).is_ok());
        assert!(validate_create(&intake_request("0.01", "0")).is_ok());
    }

    #[rstest]
    #[case("0", "450000.00")]
    #[case("-2500000.00", "450000.00")]
    #[case("2500000.00", "-1.00")]
    fn test_validate_rejects_bad_figures(#[case] amount: &str, #[case] monthly_income: &str) {
        let result = validate_create(&intake_request(amount, monthly_income));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_blank_names() {
        let mut request = intake_request("2500000.00", "450000.00");
        request.client_name = "   ".to_string();
        assert!(matches!(
            validate_create(&request),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_create_request_parses_decimal_amounts() {
        let req: CreateLoanRequest = serde_json::from_str(
            r#"{
                "client_name": "Neema Hassan",
                "amount": "2500000.00",
                "purpose": "Poultry stock expansion",
                "monthly_income": "450000.00"
            }"#,
        )
        .unwrap();
        assert_eq!(req.client_phone, None);
        assert!(req.amount > rust_decimal::Decimal::ZERO);
    }
}
