#[cfg(test)]
pub mod test_utils {
    use crate::repository::access::user_request_repository::test_utils::test_utils::create_test_user_request;
    use crate::repository::workflow::workflow_repository::test_utils::test_utils::{
        create_test_workflow, insert_workflow,
    };
    use crate::test_helper::TestContext;
    use chrono::{SubsecRound, Utc};
    use governance_core_api::TaskStatus;
    use governance_core_db::models::access::TaskModel;
    use governance_core_db::repository::create_batch::CreateBatch;
    use uuid::Uuid;

    pub fn create_test_task(user_request_id: Uuid, workflow_id: Uuid, application_id: i64) -> TaskModel {
        let now = Utc::now().trunc_subsecs(6);
        let mut task = TaskModel {
            id: Uuid::new_v4(),
            user_request_id,
            application_id,
            access_role_id: 501,
            plant_id: 9001,
            department_id: None,
            workflow_id,
            approver_chain: vec![11],
            current_slot: 0,
            fulfilment_role_id: Some(200),
            task_status: TaskStatus::Pending,
            justification: None,
            last_actor: Some(7),
            comments: None,
            created_at: now,
            updated_at: now,
            hash: 0,
        };
        task.rehash().unwrap();
        task
    }

    /// Stores a workflow, a user request and `count` tasks under it.
    pub async fn setup_test_tasks(
        ctx: &TestContext,
        count: i64,
    ) -> Result<(Uuid, Vec<TaskModel>), Box<dyn std::error::Error + Send + Sync>> {
        let workflow = create_test_workflow(Some(9001), None, &[11]);
        insert_workflow(&ctx.session.executor, &workflow).await?;

        let user_request = create_test_user_request();
        ctx.access_repos()
            .user_request_repository
            .create_batch(vec![user_request.clone()])
            .await?;

        let tasks = (1..=count)
            .map(|application_id| create_test_task(user_request.id, workflow.id, application_id))
            .collect();
        let tasks = ctx.access_repos().task_repository.create_batch(tasks).await?;
        Ok((user_request.id, tasks))
    }
}
