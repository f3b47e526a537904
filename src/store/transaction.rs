//! Transaction scope
//!
//! Ties one transaction to one request-level operation and gives it a single
//! exit: [`TransactionScope::finish`] commits on success and aborts on error.

use tracing::{debug, warn};

use crate::error::Result;
use crate::store::{DocumentStore, StoreError, Transaction};

pub struct TransactionScope {
    tx: Box<dyn Transaction>,
    operation: &'static str,
}

impl TransactionScope {
    pub async fn begin(
        store: &dyn DocumentStore,
        operation: &'static str,
    ) -> std::result::Result<Self, StoreError> {
        let tx = store.begin().await?;
        debug!(operation, "transaction started");
        Ok(Self { tx, operation })
    }

    pub fn tx(&mut self) -> &mut dyn Transaction {
        self.tx.as_mut()
    }

    /// Commits when `result` is `Ok`, aborts otherwise, and hands `result` back.
    ///
    /// A failed commit replaces the value with the store error. A failed abort
    /// is logged and the original error is kept.
    pub async fn finish<T>(self, result: Result<T>) -> Result<T> {
        let operation = self.operation;
        match result {
            Ok(value) => {
                self.tx.commit().await?;
                debug!(operation, "transaction committed");
                Ok(value)
            }
            Err(err) => {
                match self.tx.abort().await {
                    Ok(()) => debug!(operation, reason = %err, "transaction aborted"),
                    Err(abort_err) => {
                        warn!(operation, error = %abort_err, "transaction abort failed")
                    }
                }
                Err(err)
            }
        }
    }
}
