//! Case identifiers
//!
//! Format: `PRR-<year>-<code>` where `code` is four symbols from a 32-symbol
//! alphabet that omits the easily confused `0`, `1`, `I` and `O`
//! (e.g., `PRR-2026-7KQ4`). Uniqueness is statistical, not guaranteed: the
//! desk regenerates on collision with an existing case.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix shared by every case identifier
pub const CASE_PREFIX: &str = "PRR";

/// Symbols used for the random code
pub const CODE_ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Number of symbols in the random code
pub const CODE_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("Case ID must start with 'PRR-': {0}")]
    BadPrefix(String),

    #[error("Case ID year is not a four-digit year: {0}")]
    BadYear(String),

    #[error("Case ID code must be 4 characters from 2-9 and A-Z without I or O: {0}")]
    BadCode(String),
}

/// Human-readable unique case identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseId {
    year: i32,
    code: String,
}

impl CaseId {
    /// Build an ID from a year and a code, checking both
    pub fn new(year: i32, code: &str) -> Result<Self, IdParseError> {
        format!("{}-{:04}-{}", CASE_PREFIX, year, code).parse()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// File name used by the YAML store
    pub fn file_name(&self) -> String {
        format!("{}.prr.yaml", self)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}-{}", CASE_PREFIX, self.year, self.code)
    }
}

impl FromStr for CaseId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(CASE_PREFIX)
            .and_then(|r| r.strip_prefix('-'))
            .ok_or_else(|| IdParseError::BadPrefix(s.to_string()))?;

        let (year_str, code) = rest
            .split_once('-')
            .ok_or_else(|| IdParseError::BadYear(s.to_string()))?;

        if year_str.len() != 4 || !year_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdParseError::BadYear(s.to_string()));
        }
        let year: i32 = year_str
            .parse()
            .map_err(|_| IdParseError::BadYear(s.to_string()))?;

        if code.len() != CODE_LEN || !code.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            return Err(IdParseError::BadCode(s.to_string()));
        }

        Ok(Self {
            year,
            code: code.to_string(),
        })
    }
}

impl TryFrom<String> for CaseId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CaseId> for String {
    fn from(id: CaseId) -> Self {
        id.to_string()
    }
}

/// Produces case identifiers for a given year
pub trait IdGenerator {
    fn generate(&self, year: i32) -> CaseId;
}

/// Random codes drawn from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self, year: i32) -> CaseId {
        let mut rng = rand::rng();
        let code: String = (0..CODE_LEN)
            .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        CaseId {
            year: id_year(year),
            code,
        }
    }
}

/// Deterministic codes for tests: `2222`, `2223`, ... in the code alphabet
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    next: Cell<usize>,
}

impl SequenceIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the sequence at `start` (wraps at 32^4)
    pub fn starting_at(start: usize) -> Self {
        Self {
            next: Cell::new(start),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn generate(&self, year: i32) -> CaseId {
        let n = self.next.get();
        self.next.set(n.wrapping_add(1));

        let base = CODE_ALPHABET.len();
        let mut value = n % base.pow(CODE_LEN as u32);
        let mut code = vec![CODE_ALPHABET[0]; CODE_LEN];
        for slot in code.iter_mut().rev() {
            *slot = CODE_ALPHABET[value % base];
            value /= base;
        }

        CaseId {
            year: id_year(year),
            code: code.into_iter().map(char::from).collect(),
        }
    }
}

/// Pin a calendar year into the four digits an ID can carry
fn id_year(year: i32) -> i32 {
    year.clamp(0, 9999)
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn generate(&self, year: i32) -> CaseId {
        (**self).generate(year)
    }
}
