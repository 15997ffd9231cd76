//! Initial database migration.
//!
//! Creates the staff users table, the loan applications table, and the
//! one-to-one approval workflow table with its per-stage audit columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: STAFF USERS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 2: LOAN APPLICATIONS
        // ============================================================
        db.execute_unprepared(LOAN_APPLICATIONS_SQL).await?;

        // ============================================================
        // PART 3: APPROVAL WORKFLOWS
        // ============================================================
        db.execute_unprepared(APPROVAL_WORKFLOWS_SQL).await?;

        // ============================================================
        // PART 4: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS approval_workflows;
            DROP TABLE IF EXISTS loan_applications;
            DROP TABLE IF EXISTS users;
            ",
        )
        .await?;

        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    full_name TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN (
        'field_officer', 'manager', 'director', 'chairperson', 'ceo'
    )),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const LOAN_APPLICATIONS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS loan_applications (
    id UUID PRIMARY KEY,
    client_name TEXT NOT NULL,
    client_phone TEXT,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    purpose TEXT NOT NULL,
    monthly_income NUMERIC(14, 2) NOT NULL CHECK (monthly_income >= 0),
    status TEXT NOT NULL CHECK (status IN (
        'submitted', 'pending_manager', 'pending_director',
        'pending_chairperson', 'pending_ceo', 'approved', 'rejected'
    )),
    current_approver TEXT CHECK (current_approver IN (
        'field_officer', 'manager', 'director', 'chairperson', 'ceo'
    )),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const APPROVAL_WORKFLOWS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS approval_workflows (
    loan_application_id UUID PRIMARY KEY REFERENCES loan_applications(id),
    current_stage TEXT CHECK (current_stage IN (
        'field_officer', 'manager', 'director', 'chairperson', 'ceo'
    )),
    field_officer_approved BOOLEAN,
    field_officer_notes TEXT,
    field_officer_name TEXT,
    manager_approved BOOLEAN,
    manager_notes TEXT,
    manager_name TEXT,
    director_approved BOOLEAN,
    director_notes TEXT,
    director_name TEXT,
    chairperson_approved BOOLEAN,
    chairperson_notes TEXT,
    chairperson_name TEXT,
    ceo_approved BOOLEAN,
    ceo_notes TEXT,
    ceo_name TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_loan_applications_status
    ON loan_applications(status);
CREATE INDEX IF NOT EXISTS idx_loan_applications_created_by
    ON loan_applications(created_by);
CREATE INDEX IF NOT EXISTS idx_loan_applications_created_at
    ON loan_applications(created_at DESC);
";
