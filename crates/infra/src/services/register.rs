use std::sync::Arc;

use chrono::NaiveDate;

use barstock_core::{DomainError, IncomeSourceId, Registry, SessionId};
use barstock_register::{CashSession, SessionSummary, summarize};

use super::ServiceResult;
use crate::store::SessionStore;

pub struct RegisterService<S> {
    store: S,
    sources: Arc<Registry<IncomeSourceId>>,
}

impl<S: SessionStore> RegisterService<S> {
    pub fn new(store: S, sources: Arc<Registry<IncomeSourceId>>) -> Self {
        Self { store, sources }
    }

    pub fn sources(&self) -> &Registry<IncomeSourceId> {
        &self.sources
    }

    /// All sessions, most recent day first.
    pub async fn list(&self) -> ServiceResult<Vec<CashSession>> {
        let mut sessions = self.store.list().await?;
        sessions.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(sessions)
    }

    pub async fn get(&self, id: SessionId) -> ServiceResult<CashSession> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("cash session").into())
    }

    pub async fn save(&self, session: CashSession) -> ServiceResult<CashSession> {
        session.validate(&self.sources)?;
        let discrepancy = session.payment_discrepancy();
        let saved = self.store.save(session).await?;
        if discrepancy.abs() > 0.005 {
            tracing::warn!(
                session_id = %saved.id_typed(),
                discrepancy,
                "payment split does not match declared income"
            );
        }
        tracing::info!(session_id = %saved.id_typed(), date = %saved.date(), "cash session saved");
        Ok(saved)
    }

    pub async fn delete(&self, id: SessionId) -> ServiceResult<()> {
        if !self.store.delete(id).await? {
            return Err(DomainError::not_found("cash session").into());
        }
        tracing::info!(session_id = %id, "cash session deleted");
        Ok(())
    }

    pub async fn summary(&self, from: NaiveDate, to: NaiveDate) -> ServiceResult<SessionSummary> {
        if from > to {
            return Err(DomainError::validation("'from' must not be after 'to'").into());
        }
        let sessions = self.store.list().await?;
        Ok(summarize(&sessions, from, to))
    }
}
