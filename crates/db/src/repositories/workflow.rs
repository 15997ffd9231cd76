//! Workflow repository for loan approval state transitions.
//!
//! All multi-row effects run inside a database transaction with a row
//! lock on the loan application, so concurrent decisions for a single
//! application serialize: the loser of a race observes the already
//! advanced (or terminal) state and fails the stage check rather than
//! double-applying a decision.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QuerySelect, Set,
    TransactionTrait, sea_query::OnConflict,
};
use tracing::info;
use uuid::Uuid;

use mikopo_core::workflow::{
    ApplicationStatus, ApprovalEngine, ApprovalStage, Decision, DecisionOutcome, WorkflowError,
};

use crate::entities::{approval_workflows, loan_applications, users};

/// Note recorded for the field officer stage at workflow creation.
/// Submitting the application constitutes that stage's approval.
const FIELD_OFFICER_SEED_NOTE: &str = "Application submitted for review";

/// Result of a successfully applied decision.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    /// The loan application after the decision.
    pub application: loan_applications::Model,
    /// The workflow row after the decision.
    pub workflow: approval_workflows::Model,
    /// The evaluated outcome (status, finality, result).
    pub outcome: DecisionOutcome,
}

/// Workflow repository for loan approval state transitions.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the workflow record for an application, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Persistence` if the query fails.
    pub async fn find_workflow(
        &self,
        loan_id: Uuid,
    ) -> Result<Option<approval_workflows::Model>, WorkflowError> {
        approval_workflows::Entity::find_by_id(loan_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))
    }

    /// Gets the workflow record for an application, creating it lazily.
    ///
    /// A created record has the field officer stage pre-approved (the
    /// submission was their act of approval) and `current_stage` set
    /// to `manager`. Creation is race-safe: the insert is guarded by
    /// the primary key, so concurrent first-accesses produce exactly
    /// one row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The application does not exist
    /// - A database operation fails
    pub async fn get_or_create_workflow(
        &self,
        loan_id: Uuid,
    ) -> Result<approval_workflows::Model, WorkflowError> {
        let application = loan_applications::Entity::find_by_id(loan_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?
            .ok_or(WorkflowError::ApplicationNotFound(loan_id))?;

        if let Some(existing) = self.find_workflow(loan_id).await? {
            return Ok(existing);
        }

        let officer_name = find_officer_name(&self.db, application.created_by).await?;
        seed_workflow(&self.db, loan_id, officer_name).await?;

        self.find_workflow(loan_id)
            .await?
            .ok_or_else(|| WorkflowError::Persistence("workflow row missing after upsert".into()))
    }

    /// Applies a decision at the application's current stage.
    ///
    /// The acting user's role and display name are resolved from the
    /// users table (never trusted from the client). Both the workflow
    /// row and the application row update in one transaction; on any
    /// failure neither is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The application does not exist (`ApplicationNotFound`)
    /// - The application is terminal (`InvalidTransition`)
    /// - The approver's role does not match the current stage
    ///   (`UnauthorizedStage`)
    /// - A database operation fails (`Persistence`)
    pub async fn submit_decision(
        &self,
        loan_id: Uuid,
        approver_id: Uuid,
        decision: Decision,
        notes: Option<String>,
    ) -> Result<DecisionRecord, WorkflowError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?;

        // Row lock serializes concurrent decisions for this application.
        let application = loan_applications::Entity::find_by_id(loan_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?
            .ok_or(WorkflowError::ApplicationNotFound(loan_id))?;

        let current_status = ApplicationStatus::parse(&application.status).ok_or_else(|| {
            WorkflowError::Persistence(format!(
                "unrecognized application status: {}",
                application.status
            ))
        })?;

        let Some(expected_stage) = ApprovalEngine::expected_stage(current_status) else {
            txn.rollback()
                .await
                .map_err(|e| WorkflowError::Persistence(e.to_string()))?;
            return Err(WorkflowError::InvalidTransition {
                status: current_status,
            });
        };

        // Role is resolved server-side from the approver's identity.
        let Some(approver) = users::Entity::find_by_id(approver_id)
            .one(&txn)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?
        else {
            txn.rollback()
                .await
                .map_err(|e| WorkflowError::Persistence(e.to_string()))?;
            return Err(WorkflowError::UnauthorizedStage {
                acting_role: "unknown".to_string(),
                expected_stage,
            });
        };

        let outcome = match ApprovalEngine::decide(current_status, &approver.role, decision) {
            Ok(outcome) => outcome,
            Err(e) => {
                txn.rollback()
                    .await
                    .map_err(|e| WorkflowError::Persistence(e.to_string()))?;
                return Err(e);
            }
        };

        // Lazy creation happens inside the same transaction, guarded
        // by the primary key upsert.
        let officer_name = find_officer_name(&txn, application.created_by).await?;
        seed_workflow(&txn, loan_id, officer_name).await?;

        let workflow = approval_workflows::Entity::find_by_id(loan_id)
            .one(&txn)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?
            .ok_or_else(|| {
                WorkflowError::Persistence("workflow row missing after upsert".into())
            })?;

        let now = Utc::now().into();

        let mut workflow_active: approval_workflows::ActiveModel = workflow.into();
        apply_stage_decision(
            &mut workflow_active,
            outcome.stage,
            matches!(decision, Decision::Approve),
            notes.unwrap_or_default(),
            approver.full_name.clone(),
        );
        workflow_active.current_stage =
            Set(outcome.next_stage.map(|s| s.as_str().to_string()));
        workflow_active.updated_at = Set(now);
        let workflow = workflow_active
            .update(&txn)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?;

        let mut application_active: loan_applications::ActiveModel = application.into();
        application_active.status = Set(outcome.new_status.as_str().to_string());
        application_active.current_approver =
            Set(outcome.next_stage.map(|s| s.as_str().to_string()));
        application_active.updated_at = Set(now);
        let application = application_active
            .update(&txn)
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Persistence(e.to_string()))?;

        info!(
            loan_id = %loan_id,
            stage = %outcome.stage,
            decision = %decision,
            new_status = %outcome.new_status,
            "Decision applied"
        );

        Ok(DecisionRecord {
            application,
            workflow,
            outcome,
        })
    }
}

/// Inserts the seed workflow row for an application if absent.
///
/// Uses `ON CONFLICT DO NOTHING` on the primary key, so concurrent
/// callers never create a second row. The field officer stage is
/// seeded approved with a default note; `current_stage` starts at
/// `manager`.
pub(crate) async fn seed_workflow<C: ConnectionTrait>(
    conn: &C,
    loan_id: Uuid,
    officer_name: Option<String>,
) -> Result<(), WorkflowError> {
    let now = Utc::now().into();
    let seed = approval_workflows::ActiveModel {
        loan_application_id: Set(loan_id),
        current_stage: Set(Some(ApprovalStage::Manager.as_str().to_string())),
        field_officer_approved: Set(Some(true)),
        field_officer_notes: Set(Some(FIELD_OFFICER_SEED_NOTE.to_string())),
        field_officer_name: Set(officer_name),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    approval_workflows::Entity::insert(seed)
        .on_conflict(
            OnConflict::column(approval_workflows::Column::LoanApplicationId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map(|_| ())
        .map_err(|e| WorkflowError::Persistence(e.to_string()))
}

/// Looks up the submitting officer's display name for the audit trail.
async fn find_officer_name<C: ConnectionTrait>(
    conn: &C,
    officer_id: Uuid,
) -> Result<Option<String>, WorkflowError> {
    users::Entity::find_by_id(officer_id)
        .one(conn)
        .await
        .map(|user| user.map(|u| u.full_name))
        .map_err(|e| WorkflowError::Persistence(e.to_string()))
}

/// Writes a stage's decision triple into the workflow active model.
fn apply_stage_decision(
    workflow: &mut approval_workflows::ActiveModel,
    stage: ApprovalStage,
    approved: bool,
    notes: String,
    actor_name: String,
) {
    match stage {
        ApprovalStage::FieldOfficer => {
            workflow.field_officer_approved = Set(Some(approved));
            workflow.field_officer_notes = Set(Some(notes));
            workflow.field_officer_name = Set(Some(actor_name));
        }
        ApprovalStage::Manager => {
            workflow.manager_approved = Set(Some(approved));
            workflow.manager_notes = Set(Some(notes));
            workflow.manager_name = Set(Some(actor_name));
        }
        ApprovalStage::Director => {
            workflow.director_approved = Set(Some(approved));
            workflow.director_notes = Set(Some(notes));
            workflow.director_name = Set(Some(actor_name));
        }
        ApprovalStage::Chairperson => {
            workflow.chairperson_approved = Set(Some(approved));
            workflow.chairperson_notes = Set(Some(notes));
            workflow.chairperson_name = Set(Some(actor_name));
        }
        ApprovalStage::Ceo => {
            workflow.ceo_approved = Set(Some(approved));
            workflow.ceo_notes = Set(Some(notes));
            workflow.ceo_name = Set(Some(actor_name));
        }
    }
}
