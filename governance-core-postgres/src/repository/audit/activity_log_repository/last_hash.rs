use governance_core_db::models::audit::ActivityChain;
use sqlx::Row;
use std::error::Error;

use super::repo_impl::ActivityLogRepositoryImpl;

impl ActivityLogRepositoryImpl {
    pub(super) async fn last_hash_impl(
        &self,
        chain: &ActivityChain,
    ) -> Result<i64, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        // Appenders of one chain queue here until the holder's transaction ends.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(chain_lock_key(chain))
            .execute(&mut **transaction)
            .await?;

        let row = match chain {
            ActivityChain::Subject(subject_id) => {
                sqlx::query(
                    "SELECT hash FROM activity_log WHERE subject_id = $1 ORDER BY seq DESC LIMIT 1",
                )
                .bind(subject_id)
                .fetch_optional(&mut **transaction)
                .await?
            }
            ActivityChain::Record {
                table_name,
                record_id,
            } => {
                sqlx::query(
                    r#"
                    SELECT hash FROM activity_log
                    WHERE subject_id IS NULL AND table_name = $1
                      AND record_id IS NOT DISTINCT FROM $2
                    ORDER BY seq DESC LIMIT 1
                    "#,
                )
                .bind(table_name.as_str())
                .bind(record_id)
                .fetch_optional(&mut **transaction)
                .await?
            }
        };

        match row {
            Some(row) => Ok(row.try_get("hash")?),
            None => Ok(0),
        }
    }
}

fn chain_lock_key(chain: &ActivityChain) -> String {
    match chain {
        ActivityChain::Subject(subject_id) => format!("activity_log:{subject_id}"),
        ActivityChain::Record {
            table_name,
            record_id: Some(record_id),
        } => format!("activity_log:{table_name}:{record_id}"),
        ActivityChain::Record {
            table_name,
            record_id: None,
        } => format!("activity_log:{table_name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_utils::create_test_entry;
    use crate::test_helper::setup_test_context;
    use governance_core_db::models::audit::ActivityChain;
    use governance_core_db::repository::create_batch::CreateBatch;
    use governance_core_db::repository::ActivityLogRepository;
    use uuid::Uuid;

    #[test]
    fn test_chain_lock_keys_differ_per_chain() {
        let subject = Uuid::new_v4();
        let keys = [
            super::chain_lock_key(&ActivityChain::Subject(subject)),
            super::chain_lock_key(&ActivityChain::Record {
                table_name: "plant".to_string(),
                record_id: Some(1),
            }),
            super::chain_lock_key(&ActivityChain::Record {
                table_name: "plant".to_string(),
                record_id: None,
            }),
        ];
        assert_eq!(keys[0], format!("activity_log:{subject}"));
        assert_eq!(keys[1], "activity_log:plant:1");
        assert_eq!(keys[2], "activity_log:plant");
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_last_hash_per_chain() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.audit_repos().activity_log_repository;

        let subject_id = Uuid::new_v4();
        let chain = ActivityChain::Subject(subject_id);
        assert_eq!(repo.last_hash(&chain).await?, 0);

        let first = create_test_entry(Some(subject_id), None, 0);
        let second = create_test_entry(Some(subject_id), None, first.hash);
        let record_entry = create_test_entry(None, None, 0);
        repo.create_batch(vec![first, second.clone(), record_entry.clone()]).await?;

        assert_eq!(repo.last_hash(&chain).await?, second.hash);
        assert_eq!(repo.last_hash(&record_entry.chain()).await?, record_entry.hash);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_entries_are_append_only() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.audit_repos().activity_log_repository;
        let entry = create_test_entry(None, None, 0);
        repo.create_batch(vec![entry.clone()]).await?;

        let mut tx = ctx.session.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let result = sqlx::query("DELETE FROM activity_log WHERE id = $1")
            .bind(entry.id)
            .execute(&mut **transaction)
            .await;
        assert!(result.is_err());
        Ok(())
    }
}
