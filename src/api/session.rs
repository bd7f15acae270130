use anyhow::{anyhow, Result};
use serde_json::Value;
use crate::api::to_payload;
use crate::engine::action::ScorerAction;
use crate::engine::record::PlateAppearanceRecord;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Saving,
    Closed,
}

#[derive(Clone, Debug)]
pub struct EditSession {
    record: PlateAppearanceRecord,
    state: SessionState,
}

impl EditSession {
    pub fn open(record: PlateAppearanceRecord) -> Self {
        Self {
            record,
            state: SessionState::Open,
        }
    }

    pub fn record(&self) -> &PlateAppearanceRecord {
        &self.record
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn apply(&mut self, action: ScorerAction) -> bool {
        if self.state != SessionState::Open {
            tracing::debug!(key = %self.record.key(), state = ?self.state, ?action, "edit ignored");
            return false;
        }
        self.record.apply(action);
        true
    }

    pub fn begin_save(&mut self) -> Result<Value> {
        match self.state {
            SessionState::Open => {}
            SessionState::Saving => return Err(anyhow!("A save for {} is already in flight", self.record.key())),
            SessionState::Closed => return Err(anyhow!("Plate appearance {} is no longer open", self.record.key())),
        }
        self.record.validate_for_save()?;
        self.state = SessionState::Saving;
        Ok(to_payload(&self.record))
    }

    pub fn finish_save<T>(&mut self, result: &Result<T>) {
        if self.state != SessionState::Saving {
            return;
        }
        self.state = match result {
            Ok(_) => SessionState::Closed,
            Err(e) => {
                tracing::warn!(key = %self.record.key(), "save failed, editor stays open: {e:#}");
                SessionState::Open
            }
        };
    }

    /// Closes the session without saving. The record is handed back with
    /// whatever edits it had; nothing is sent to the server.
    pub fn abandon(self) -> PlateAppearanceRecord {
        self.record
    }
}
