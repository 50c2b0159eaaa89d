use sqlx::{Postgres, Transaction};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle on the transaction of one unit of work.
///
/// Every repository of a session holds a clone. Repositories lock `tx`, run their
/// statements against the transaction and release the lock. `commit` and
/// `rollback` take the transaction out, after which every repository call fails
/// with "Transaction has been consumed".
#[derive(Clone)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    pub async fn commit(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let tx = self.tx.lock().await.take().ok_or("Transaction has been consumed")?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let tx = self.tx.lock().await.take().ok_or("Transaction has been consumed")?;
        tx.rollback().await?;
        Ok(())
    }

    pub async fn is_consumed(&self) -> bool {
        self.tx.lock().await.is_none()
    }
}
