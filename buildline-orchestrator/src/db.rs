use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create projects table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id UUID PRIMARY KEY,
            owner_id VARCHAR(255) NOT NULL,
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL,
            status VARCHAR(50) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create tasks table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id UUID PRIMARY KEY,
            project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            worker VARCHAR(255) NOT NULL,
            status VARCHAR(50) NOT NULL,
            depends_on JSONB NOT NULL DEFAULT '[]',
            output_artifact_id UUID,
            progress SMALLINT,
            started_at TIMESTAMPTZ,
            completed_at TIMESTAMPTZ,
            error TEXT,
            UNIQUE (project_id, worker)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create artifacts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artifacts (
            id UUID PRIMARY KEY,
            project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            kind VARCHAR(50) NOT NULL,
            location TEXT NOT NULL,
            version INTEGER NOT NULL,
            produced_by VARCHAR(255) NOT NULL,
            metadata JSONB,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create dispatch queue table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dispatch_queue (
            id BIGSERIAL PRIMARY KEY,
            partition_key VARCHAR(255) NOT NULL,
            dedup_key VARCHAR(512) NOT NULL UNIQUE,
            body JSONB NOT NULL,
            enqueued_at TIMESTAMPTZ NOT NULL,
            visible_at TIMESTAMPTZ NOT NULL,
            receipt UUID
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for better query performance
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artifacts_project_id ON artifacts(project_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_dispatch_visible ON dispatch_queue(visible_at, partition_key)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
