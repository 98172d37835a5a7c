//! Short aliases for case selection
//!
//! `prr list` numbers the cases it prints (`@1`, `@2`, ...) and remembers
//! the numbering in `.prr/shortids.json`, so a follow-up `prr show @2` or
//! `prr act @2 ...` can refer to a row instead of the full case ID. The
//! numbering is replaced by the next listing.

use std::collections::HashMap;
use std::fs;

use crate::core::identity::CaseId;
use crate::core::project::{Project, PROJECT_DIR};

/// Index file location within a project
const INDEX_FILE: &str = "shortids.json";

/// Mapping from `@N` to full case IDs for the most recent listing
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ShortIdIndex {
    entries: HashMap<u32, String>,
    #[serde(skip)]
    reverse: HashMap<String, u32>,
}

impl ShortIdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index from a project, or create empty if not found
    pub fn load(project: &Project) -> Self {
        let path = project.root().join(PROJECT_DIR).join(INDEX_FILE);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::new();
        };
        match serde_json::from_str::<ShortIdIndex>(&content) {
            Ok(mut index) => {
                index.reverse = index
                    .entries
                    .iter()
                    .map(|(k, v)| (v.clone(), *k))
                    .collect();
                index
            }
            Err(_) => Self::new(),
        }
    }

    /// Save the index to a project
    pub fn save(&self, project: &Project) -> std::io::Result<()> {
        let path = project.root().join(PROJECT_DIR).join(INDEX_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }

    /// Replace the numbering with `ids` in order, starting at @1
    pub fn rebuild<'a>(&mut self, ids: impl IntoIterator<Item = &'a CaseId>) {
        self.entries.clear();
        self.reverse.clear();
        for id in ids {
            self.add(id);
        }
    }

    /// Number an ID, returning its existing number if already present
    pub fn add(&mut self, id: &CaseId) -> u32 {
        let key = id.to_string();
        if let Some(&existing) = self.reverse.get(&key) {
            return existing;
        }
        let next = self.entries.len() as u32 + 1;
        self.entries.insert(next, key.clone());
        self.reverse.insert(key, next);
        next
    }

    /// Resolve `@N` or `N` to a full case ID; anything else passes through
    /// upper-cased (so `prr-2026-7kq4` works)
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        let num_str = reference.strip_prefix('@').unwrap_or(reference);
        if !num_str.is_empty() && num_str.chars().all(|c| c.is_ascii_digit()) {
            return num_str
                .parse::<u32>()
                .ok()
                .and_then(|n| self.entries.get(&n).cloned());
        }
        Some(reference.to_uppercase())
    }

    pub fn get_short_id(&self, id: &CaseId) -> Option<u32> {
        self.reverse.get(&id.to_string()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
