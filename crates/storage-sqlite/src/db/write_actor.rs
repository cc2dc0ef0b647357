//! Single-writer actor serializing all database writes.
//!
//! SQLite allows one writer at a time; funnelling every write through one
//! dedicated connection avoids `SQLITE_BUSY` churn under concurrent load.
//! Each job runs inside an immediate transaction, so a job that returns an
//! error rolls back everything it did.

use std::any::Any;

use diesel::{Connection, SqliteConnection};
use log::error;
use tokio::sync::{mpsc, oneshot};

use billfold_core::errors::{Error, Result};

use super::DbPool;
use crate::errors::StorageError;

type ErasedResult = Result<Box<dyn Any + Send + 'static>>;
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> ErasedResult + Send + 'static>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job, oneshot::Sender<ErasedResult>)>,
}

impl WriteHandle {
    /// Executes a database job on the writer's dedicated connection, inside
    /// an immediate transaction. The job's error rolls the transaction back
    /// and is returned as-is.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();
        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| Error::Unexpected("Database writer is not running".to_string()))?;

        let boxed = ret_rx
            .await
            .map_err(|_| Error::Unexpected("Database writer dropped the reply".to_string()))??;
        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::Unexpected("Database writer returned the wrong type".to_string()))
    }
}

/// Spawns the writer actor on the Tokio runtime.
///
/// The actor owns one pooled connection for its whole lifetime and processes
/// jobs strictly in arrival order.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(Job, oneshot::Sender<ErasedResult>)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer actor could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: ErasedResult = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(Error::from);

            // Receiver may have given up (timeout, cancellation).
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
