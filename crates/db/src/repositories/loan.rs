//! Loan application repository.
//!
//! Intake creates applications in `pending_manager` and eagerly seeds
//! the workflow row; everything after intake is the workflow
//! repository's job.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use mikopo_core::workflow::{ApplicationStatus, ApprovalStage, WorkflowError};
use mikopo_shared::types::PageRequest;

use crate::entities::loan_applications;
use crate::repositories::workflow::seed_workflow;

/// Input for creating a loan application.
#[derive(Debug, Clone)]
pub struct CreateLoanInput {
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
    /// The submitting field officer.
    pub created_by: Uuid,
    /// The field officer's display name, for the workflow audit trail.
    pub officer_name: String,
}

/// Filter for listing loan applications.
#[derive(Debug, Clone, Default)]
pub struct LoanFilter {
    /// Filter by status.
    pub status: Option<ApplicationStatus>,
}

/// Loan application repository.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a loan application with its seeded workflow row.
    ///
    /// The application starts in `pending_manager` with the manager as
    /// the expected approver; the field officer's stage is recorded
    /// approved in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Persistence` if any insert fails.
    pub async fn create(
        &self,
        input: CreateLoanInput,
    ) -> Result<loan_applications::Model, WorkflowError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?;

        let now = Utc::now().into();
        let loan_id = Uuid::new_v4();

        let application = loan_applications::ActiveModel {
            id: Set(loan_id),
            client_name: Set(input.client_name),
            client_phone: Set(input.client_phone),
            amount: Set(input.amount),
            purpose: Set(input.purpose),
            monthly_income: Set(input.monthly_income),
            status: Set(ApplicationStatus::PendingManager.as_str().to_string()),
            current_approver: Set(Some(ApprovalStage::Manager.as_str().to_string())),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let application = application
            .insert(&txn)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?;

        seed_workflow(&txn, loan_id, Some(input.officer_name)).await?;

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?;

        Ok(application)
    }

    /// Finds a loan application by ID.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Persistence` if the query fails.
    pub async fn find_by_id(
        &self,
        loan_id: Uuid,
    ) -> Result<Option<loan_applications::Model>, WorkflowError> {
        loan_applications::Entity::find_by_id(loan_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))
    }

    /// Lists loan applications, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Persistence` if the query fails.
    pub async fn list(
        &self,
        filter: LoanFilter,
        page: &PageRequest,
    ) -> Result<(Vec<loan_applications::Model>, u64), WorkflowError> {
        let mut query = loan_applications::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(loan_applications::Column::Status.eq(status.as_str()));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?;

        let applications = query
            .order_by_desc(loan_applications::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?;

        Ok((applications, total))
    }
}
