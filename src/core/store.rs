//! Case persistence
//!
//! [`CaseStore`] is the boundary the desk writes through. Writes carry the
//! record's `version`: a version-1 record is a creation and must not collide
//! with an existing case; any later version replaces the stored record only
//! if the stored version is exactly one behind.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::entity::{CaseStatus, Channel};
use crate::core::identity::CaseId;
use crate::entities::CaseRecord;
use crate::schema::validator::{CheckError, Validator};

/// Suffix of case files in the YAML store
pub const CASE_FILE_SUFFIX: &str = ".prr.yaml";

/// Errors that can occur reading or writing cases
#[derive(Debug, Error, miette::Diagnostic)]
pub enum StoreError {
    #[error("Case not found: {0}")]
    #[diagnostic(code(prr::store::not_found))]
    NotFound(CaseId),

    #[error("Case already exists: {0}")]
    #[diagnostic(code(prr::store::duplicate))]
    DuplicateId(CaseId),

    #[error("Concurrent update on {case_id}: expected stored version {expected}, found {found}")]
    #[diagnostic(
        code(prr::store::conflict),
        help("Reload the case and apply the action again")
    )]
    Conflict {
        case_id: CaseId,
        expected: u64,
        found: u64,
    },

    #[error("Case file {path} is invalid")]
    #[diagnostic(code(prr::store::invalid))]
    Invalid {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: CheckError,
    },

    #[error("Case file {path} holds {found}, expected {expected}")]
    #[diagnostic(
        code(prr::store::misfiled),
        help("Case files must be named <case_id>.prr.yaml; rename or remove the copy")
    )]
    Misfiled {
        path: PathBuf,
        expected: CaseId,
        found: CaseId,
    },

    #[error("Failed to serialize {case_id}: {message}")]
    #[diagnostic(code(prr::store::serialize))]
    Serialize { case_id: CaseId, message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(prr::store::io))]
    Io(#[from] std::io::Error),
}

/// Selection criteria for [`CaseStore::list`]
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    /// Accepted statuses; empty accepts all
    pub statuses: Vec<CaseStatus>,
    pub channel: Option<Channel>,
    /// Case-insensitive substring of the requester's name or email
    pub requester: Option<String>,
    /// Case-insensitive substring of the request text
    pub search: Option<String>,
    /// Only open cases whose T10 deadline has passed at this instant
    pub overdue_at: Option<DateTime<Utc>>,
}

impl CaseFilter {
    pub fn matches(&self, case: &CaseRecord) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&case.status) {
            return false;
        }
        if let Some(channel) = self.channel {
            if case.intake.channel != channel {
                return false;
            }
        }
        if let Some(ref needle) = self.requester {
            let needle = needle.to_lowercase();
            let in_name = case.requester.name.to_lowercase().contains(&needle);
            let in_email = case
                .requester
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&needle));
            if !in_name && !in_email {
                return false;
            }
        }
        if let Some(ref needle) = self.search {
            if !case
                .intake
                .request_text
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(now) = self.overdue_at {
            if !case.is_open() || now <= case.deadlines.t10 {
                return false;
            }
        }
        true
    }
}

/// Persistence port for case records
pub trait CaseStore {
    /// Load a case, failing with [`StoreError::NotFound`] if absent
    fn get(&self, id: &CaseId) -> Result<CaseRecord, StoreError>;

    /// Create (version 1) or replace (later versions) a case
    fn put(&mut self, case: &CaseRecord) -> Result<(), StoreError>;

    /// Matching cases ordered by receipt time, then ID
    fn list(&self, filter: &CaseFilter) -> Result<Vec<CaseRecord>, StoreError>;

    fn contains(&self, id: &CaseId) -> Result<bool, StoreError> {
        match self.get(id) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Version check shared by every store
fn check_write(existing: Option<&CaseRecord>, case: &CaseRecord) -> Result<(), StoreError> {
    match (existing, case.version) {
        (None, 0 | 1) => Ok(()),
        (Some(_), 0 | 1) => Err(StoreError::DuplicateId(case.case_id.clone())),
        (None, _) => Err(StoreError::NotFound(case.case_id.clone())),
        (Some(stored), version) if stored.version.checked_add(1) == Some(version) => Ok(()),
        (Some(stored), version) => Err(StoreError::Conflict {
            case_id: case.case_id.clone(),
            expected: version - 1,
            found: stored.version,
        }),
    }
}

/// Whether `path` is the file the YAML store uses for `id`
fn is_named_for(path: &Path, id: &CaseId) -> bool {
    path.file_name().and_then(|n| n.to_str()) == Some(id.file_name().as_str())
}

fn sort_cases(cases: &mut [CaseRecord]) {
    cases.sort_by(|a, b| {
        a.intake
            .received_at
            .cmp(&b.intake.received_at)
            .then_with(|| a.case_id.cmp(&b.case_id))
    });
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryCaseStore {
    cases: BTreeMap<CaseId, CaseRecord>,
}

impl MemoryCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl CaseStore for MemoryCaseStore {
    fn get(&self, id: &CaseId) -> Result<CaseRecord, StoreError> {
        self.cases
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn put(&mut self, case: &CaseRecord) -> Result<(), StoreError> {
        check_write(self.cases.get(&case.case_id), case)?;
        self.cases.insert(case.case_id.clone(), case.clone());
        Ok(())
    }

    fn list(&self, filter: &CaseFilter) -> Result<Vec<CaseRecord>, StoreError> {
        let mut cases: Vec<CaseRecord> = self
            .cases
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        sort_cases(&mut cases);
        Ok(cases)
    }
}

/// One `<case-id>.prr.yaml` file per case in a directory
///
/// Every file is validated on load; a file that fails validation is an
/// error for `get` and is skipped with a warning by `list`.
pub struct YamlCaseStore {
    dir: PathBuf,
    validator: Validator,
}

impl YamlCaseStore {
    pub fn new(dir: impl Into<PathBuf>, validator: Validator) -> Self {
        Self {
            dir: dir.into(),
            validator,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &CaseId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    /// Every case file directly in the store directory, sorted
    pub fn case_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_string_lossy().ends_with(CASE_FILE_SUFFIX))
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }

    fn load(&self, path: &Path) -> Result<CaseRecord, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let filename = path.display().to_string();
        self.validator
            .validate_yaml(&content, &filename)
            .map_err(|source| StoreError::Invalid {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl CaseStore for YamlCaseStore {
    fn get(&self, id: &CaseId) -> Result<CaseRecord, StoreError> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(StoreError::NotFound(id.clone()));
        }
        let case = self.load(&path)?;
        if case.case_id != *id {
            return Err(StoreError::Misfiled {
                path,
                expected: id.clone(),
                found: case.case_id,
            });
        }
        Ok(case)
    }

    fn put(&mut self, case: &CaseRecord) -> Result<(), StoreError> {
        let path = self.path_for(&case.case_id);
        let existing = if path.is_file() {
            Some(self.get(&case.case_id)?)
        } else {
            None
        };
        check_write(existing.as_ref(), case)?;

        let yaml = serde_yml::to_string(case).map_err(|e| StoreError::Serialize {
            case_id: case.case_id.clone(),
            message: e.to_string(),
        })?;

        // Write beside the target and rename so readers never see half a file
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("yaml.tmp");
        std::fs::write(&tmp, yaml)?;
        std::fs::rename(&tmp, &path)?;

        debug!(case_id = %case.case_id, version = case.version, path = %path.display(), "case written");
        Ok(())
    }

    fn list(&self, filter: &CaseFilter) -> Result<Vec<CaseRecord>, StoreError> {
        let mut cases = Vec::new();
        for path in self.case_files() {
            match self.load(&path) {
                // The file name is the identity; copies under other names are not cases
                Ok(case) if !is_named_for(&path, &case.case_id) => {
                    warn!(
                        path = %path.display(),
                        case_id = %case.case_id,
                        "skipping case file not named after its case ID"
                    );
                }
                Ok(case) if filter.matches(&case) => cases.push(case),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping invalid case file"),
            }
        }
        sort_cases(&mut cases);
        Ok(cases)
    }
}
