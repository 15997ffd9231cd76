//! `SeaORM` Entity for the approval_workflows table.
//!
//! One row per loan application (the primary key IS the application
//! id, which doubles as the uniqueness guard for race-safe lazy
//! creation). Stage history is append-only: once a stage's fields are
//! set they are never changed.

use mikopo_core::workflow::ApprovalStage;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_workflows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub loan_application_id: Uuid,
    /// Stage awaiting action; NULL once terminal.
    pub current_stage: Option<String>,
    pub field_officer_approved: Option<bool>,
    pub field_officer_notes: Option<String>,
    pub field_officer_name: Option<String>,
    pub manager_approved: Option<bool>,
    pub manager_notes: Option<String>,
    pub manager_name: Option<String>,
    pub director_approved: Option<bool>,
    pub director_notes: Option<String>,
    pub director_name: Option<String>,
    pub chairperson_approved: Option<bool>,
    pub chairperson_notes: Option<String>,
    pub chairperson_name: Option<String>,
    pub ceo_approved: Option<bool>,
    pub ceo_notes: Option<String>,
    pub ceo_name: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Returns the recorded approval flag for a stage, if acted on.
    #[must_use]
    pub const fn stage_approved(&self, stage: ApprovalStage) -> Option<bool> {
        match stage {
            ApprovalStage::FieldOfficer => self.field_officer_approved,
            ApprovalStage::Manager => self.manager_approved,
            ApprovalStage::Director => self.director_approved,
            ApprovalStage::Chairperson => self.chairperson_approved,
            ApprovalStage::Ceo => self.ceo_approved,
        }
    }

    /// Returns the recorded notes for a stage.
    #[must_use]
    pub fn stage_notes(&self, stage: ApprovalStage) -> Option<&str> {
        match stage {
            ApprovalStage::FieldOfficer => self.field_officer_notes.as_deref(),
            ApprovalStage::Manager => self.manager_notes.as_deref(),
            ApprovalStage::Director => self.director_notes.as_deref(),
            ApprovalStage::Chairperson => self.chairperson_notes.as_deref(),
            ApprovalStage::Ceo => self.ceo_notes.as_deref(),
        }
    }

    /// Returns the recorded actor display name for a stage.
    #[must_use]
    pub fn stage_name(&self, stage: ApprovalStage) -> Option<&str> {
        match stage {
            ApprovalStage::FieldOfficer => self.field_officer_name.as_deref(),
            ApprovalStage::Manager => self.manager_name.as_deref(),
            ApprovalStage::Director => self.director_name.as_deref(),
            ApprovalStage::Chairperson => self.chairperson_name.as_deref(),
            ApprovalStage::Ceo => self.ceo_name.as_deref(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::loan_applications::Entity",
        from = "Column::LoanApplicationId",
        to = "super::loan_applications::Column::Id"
    )]
    LoanApplications,
}

impl Related<super::loan_applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanApplications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
