use governance_core_api::PlantFilter;
use governance_core_db::models::audit::ActivityLogModel;
use governance_core_db::repository::pagination::{Page, PageRequest};
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::{ActivityLogRepositoryImpl, ChainKey};

impl ActivityLogRepositoryImpl {
    pub(super) async fn find_by_subject_impl(
        &self,
        subject_id: Uuid,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLogModel>, Box<dyn Error + Send + Sync>> {
        self.find_page_impl(ChainKey::Subject(subject_id), plants, page)
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
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_find_by_subject_pages() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.audit_repos().activity_log_repository;

        let subject_id = Uuid::new_v4();
        let mut antecedent = 0;
        let mut entries = Vec::new();
        for _ in 0..3 {
            let entry = create_test_entry(Some(subject_id), None, antecedent);
            antecedent = entry.hash;
            entries.push(entry);
        }
        repo.create_batch(entries.clone()).await?;

        let plants = PlantFilter::new(vec![]);
        let page = repo
            .find_by_subject(subject_id, &plants, PageRequest::new(2, 2))
            .await?;
        assert_eq!(page.total, 3);
        assert_eq!(page.items, vec![entries[2].clone()]);
        assert!(page.is_last_page());
        Ok(())
    }
}
