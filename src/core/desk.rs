//! Case desk - the lifecycle engine wired to a store
//!
//! Ordering is validate, construct, persist. A record that fails validation
//! is never written.

use thiserror::Error;
use tracing::{info, warn};

use crate::core::identity::CaseId;
use crate::core::lifecycle::{ActionRequest, IntakeInput, LifecycleEngine, LifecycleError};
use crate::core::store::{CaseFilter, CaseStore, StoreError};
use crate::entities::CaseRecord;
use crate::schema::validator::{ValidationError, Validator};

/// Identifier draws before giving up on a collision-free ID
pub const MAX_ID_ATTEMPTS: usize = 8;

#[derive(Debug, Error, miette::Diagnostic)]
pub enum DeskError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not find an unused case ID after {attempts} attempts")]
    #[diagnostic(code(prr::desk::ids_exhausted))]
    IdsExhausted { attempts: usize },
}

/// Entry point for submitting and working cases
pub struct CaseDesk<S: CaseStore> {
    engine: LifecycleEngine,
    store: S,
    validator: Validator,
}

impl<S: CaseStore> CaseDesk<S> {
    pub fn new(engine: LifecycleEngine, store: S, validator: Validator) -> Self {
        Self {
            engine,
            store,
            validator,
        }
    }

    pub fn engine(&self) -> &LifecycleEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create and persist a new case
    pub fn submit(&mut self, input: IntakeInput) -> Result<CaseRecord, DeskError> {
        // Reject bad input before spending identifier draws on it
        let violations = input.violations();
        if !violations.is_empty() {
            return Err(ValidationError::new("intake", violations).into());
        }

        let received_at = input.received_at.unwrap_or_else(|| self.engine.now());
        let input = input.received_at(received_at);

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let case_id = self.engine.generate_id(received_at);
            if self.store.contains(&case_id)? {
                warn!(%case_id, attempt, "case ID collision, drawing again");
                continue;
            }

            let case = self.engine.create_case_with_id(input.clone(), case_id)?;
            let case = self.validator.validate_case(case)?;
            match self.store.put(&case) {
                Ok(()) => {
                    info!(case_id = %case.case_id, "case submitted");
                    return Ok(case);
                }
                Err(StoreError::DuplicateId(id)) => {
                    warn!(case_id = %id, attempt, "case ID taken during write, drawing again");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DeskError::IdsExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    /// Record an action against a stored case
    pub fn act(&mut self, case_id: &CaseId, request: ActionRequest) -> Result<CaseRecord, DeskError> {
        let case = self.store.get(case_id)?;
        let case = self.engine.record_action(case, request)?;
        let case = self.validator.validate_case(case)?;
        self.store.put(&case)?;
        Ok(case)
    }

    pub fn get(&self, case_id: &CaseId) -> Result<CaseRecord, DeskError> {
        Ok(self.store.get(case_id)?)
    }

    pub fn list(&self, filter: &CaseFilter) -> Result<Vec<CaseRecord>, DeskError> {
        Ok(self.store.list(filter)?)
    }
}
