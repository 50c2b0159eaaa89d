//! Staged approval end to end over PostgreSQL.
//!
//! Commits real rows: workflows and grants use a plant and role id unique to the
//! run, and the entity table is created on first use.

use governance_core_api::{
    ActorContext, ApprovalStatus, PermissionAction, PermissionExpression, StageMutationCommand,
};
use governance_core_db::repository::{EntityRowRepository, PageRequest, UnitOfWork, UnitOfWorkSession};
use governance_core_postgres::{DatabaseConfig, PostgresRepositories};
use governance_core_service::config::{GovernanceConfig, GovernedModule, ScopeRule};
use governance_core_service::{ApprovalOutcome, GovernanceService};
use serde_json::json;
use serial_test::serial;
use std::sync::Arc;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const TABLE: &str = "gov_e2e_system";
const FIRST_APPROVER: i64 = 11;
const SECOND_APPROVER: i64 = 12;

fn unique_id() -> i64 {
    1_000_000 + (Uuid::new_v4().as_u128() % 1_000_000) as i64
}

async fn seed(repos: &PostgresRepositories, plant_id: i64, role_id: i64) -> Result<(), BoxError> {
    let session = repos.begin().await?;
    {
        let mut tx = session.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gov_e2e_system (
                id BIGSERIAL PRIMARY KEY,
                system_name TEXT,
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                plant_id BIGINT,
                department_id BIGINT
            )
            "#,
        )
        .execute(&mut **transaction)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO workflow (id, name, plant_id, approver_1, approver_2, max_approvers, is_active)
            VALUES ($1, 'E2E plant workflow', $2, $3, $4, 2, TRUE)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plant_id)
        .bind(FIRST_APPROVER)
        .bind(SECOND_APPROVER)
        .execute(&mut **transaction)
        .await?;

        let expression = PermissionExpression::module_action("system", PermissionAction::Create);
        sqlx::query("INSERT INTO role_grant (id, role_id, expression) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(role_id)
            .bind(serde_json::to_value(&expression)?)
            .execute(&mut **transaction)
            .await?;
    }
    session.commit().await
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
#[serial]
async fn test_two_step_approval_commits_the_row() -> Result<(), BoxError> {
    let pool = DatabaseConfig::from_env()?.connect().await?;
    sqlx::migrate!().run(&pool).await?;
    let repos = Arc::new(PostgresRepositories::new(Arc::new(pool)));

    let plant_id = unique_id();
    let role_id = unique_id();
    seed(&repos, plant_id, role_id).await?;

    let config = GovernanceConfig::new(vec![GovernedModule {
        module: "system".to_string(),
        table_name: TABLE.to_string(),
        scope: ScopeRule::PlantDepartment {
            plant_field: "plant_id".to_string(),
            department_field: Some("department_id".to_string()),
        },
    }]);
    let service = GovernanceService::new(repos.clone(), Arc::new(config));

    let requester = ActorContext::new(7, vec![role_id], vec![plant_id]);
    let staged = service
        .stage_mutation(
            &requester,
            StageMutationCommand::create(
                "system",
                TABLE,
                json!({"system_name": "MES", "status": "ACTIVE", "plant_id": plant_id}),
            ),
        )
        .await?;
    assert_eq!(staged.approver_chain, vec![FIRST_APPROVER, SECOND_APPROVER]);
    assert_eq!(staged.plant_id, Some(plant_id));

    let first = ActorContext::new(FIRST_APPROVER, vec![], vec![plant_id]);
    let outcome = service.approve(&first, staged.id, None).await?;
    assert!(matches!(
        outcome,
        ApprovalOutcome::Advanced { next_approver: SECOND_APPROVER, .. }
    ));

    let second = ActorContext::new(SECOND_APPROVER, vec![], vec![plant_id]);
    let outcome = service
        .approve(&second, staged.id, Some("Looks right".to_string()))
        .await?;
    let record_id = match &outcome {
        ApprovalOutcome::Committed { request, changes } => {
            assert_eq!(request.status, ApprovalStatus::Approved);
            assert_eq!(changes.len(), 1);
            changes[0].record_id
        }
        other => return Err(format!("expected a commit, got {other:?}").into()),
    };

    let session = repos.begin().await?;
    let row = session
        .entity_rows()
        .get_row(TABLE, record_id)
        .await?
        .ok_or("committed row missing")?;
    assert_eq!(row.get("system_name"), Some(&json!("MES")));
    session.rollback().await?;

    let stored = service.query_approval(&requester, staged.id).await?;
    assert_eq!(stored.record_id, Some(record_id));
    assert_eq!(stored.approved_by, Some(SECOND_APPROVER));

    let history = service
        .query_approval_history(&requester, staged.id, PageRequest::default())
        .await?;
    assert!(history.total >= 3);
    assert!(history.items.iter().all(|entry| entry.verify()));
    for pair in history.items.windows(2) {
        assert_eq!(pair[1].antecedent_hash, pair[0].hash);
    }

    let again = service.approve(&second, staged.id, None).await;
    assert!(again.is_err_and(|e| e.requires_refresh()));
    Ok(())
}
