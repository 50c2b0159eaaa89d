use governance_core_api::{PlantFilter, RecordId};
use governance_core_db::models::audit::ActivityLogModel;
use governance_core_db::repository::pagination::{Page, PageRequest};
use std::error::Error;

use super::repo_impl::{ActivityLogRepositoryImpl, ChainKey};

impl ActivityLogRepositoryImpl {
    pub(super) async fn find_by_record_impl(
        &self,
        table_name: &str,
        record_id: RecordId,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLogModel>, Box<dyn Error + Send + Sync>> {
        self.find_page_impl(
            ChainKey::Record {
                table_name,
                record_id,
            },
            plants,
            page,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_utils::create_test_entry;
    use crate::test_helper::setup_test_context;
    use governance_core_api::PlantFilter;
    use governance_core_db::repository::create_batch::CreateBatch;
    use governance_core_db::repository::pagination::PageRequest;
    use governance_core_db::repository::ActivityLogRepository;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_find_by_record_oldest_first() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.audit_repos().activity_log_repository;

        let first = create_test_entry(None, Some(9001), 0);
        let second = create_test_entry(None, Some(9001), first.hash);
        let elsewhere = create_test_entry(None, Some(9002), second.hash);
        repo.create_batch(vec![first.clone(), second.clone(), elsewhere]).await?;

        let plants = PlantFilter::new(vec![9001]);
        let page = repo
            .find_by_record("user_note", 77, &plants, PageRequest::default())
            .await?;
        assert_eq!(page.total, 2);
        assert_eq!(page.items, vec![first, second]);
        assert!(page.items.iter().all(|e| e.verify()));
        Ok(())
    }
}
