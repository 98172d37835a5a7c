//! Layered configuration
//!
//! Later layers override earlier ones:
//! 1. Built-in defaults
//! 2. User config (`<config dir>/prr/config.yaml`)
//! 3. Project config (`.prr/config.yaml`)
//! 4. Environment (`PRR_ACTOR`, `PRR_ENVIRONMENT`, `PRR_MODULE`)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::calendar::BusinessCalendar;
use crate::core::lifecycle::LifecycleConfig;
use crate::core::project::Project;
use crate::yaml::parse_yaml_file;

/// Calendar settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Dates treated as non-business days on top of weekends
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub holidays: Vec<NaiveDate>,
}

/// Lifecycle overrides; unset fields fall through to lower layers
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissive_transitions: Option<bool>,
}

/// One configuration layer as written on disk
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Name recorded as the actor on audit entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    pub lifecycle: LifecycleOverrides,

    pub calendar: CalendarConfig,
}

impl Config {
    /// Load every layer for the current directory
    pub fn load() -> Self {
        let project = Project::discover().ok();
        Self::load_for(project.as_ref())
    }

    /// Load every layer, using `project` for the project layer
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Self::default();

        if let Some(path) = Self::user_config_path() {
            config.merge(Self::load_file(&path));
        }
        if let Some(project) = project {
            config.merge(Self::load_file(&project.config_path()));
        }
        config.merge(Self::from_env());

        config
    }

    /// Location of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "prr")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Read one layer; a missing file is an empty layer
    pub fn load_file(path: &Path) -> Self {
        if !path.is_file() {
            return Self::default();
        }
        match parse_yaml_file::<Config>(path) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config layer");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            actor: var("PRR_ACTOR"),
            environment: var("PRR_ENVIRONMENT"),
            module: var("PRR_MODULE"),
            ..Self::default()
        }
    }

    /// Overlay `other` on top of `self`
    pub fn merge(&mut self, other: Config) {
        if other.actor.is_some() {
            self.actor = other.actor;
        }
        if other.environment.is_some() {
            self.environment = other.environment;
        }
        if other.module.is_some() {
            self.module = other.module;
        }
        if other.lifecycle.permissive_transitions.is_some() {
            self.lifecycle.permissive_transitions = other.lifecycle.permissive_transitions;
        }
        if !other.calendar.holidays.is_empty() {
            self.calendar.holidays = other.calendar.holidays;
        }
    }

    /// Actor name for audit entries: config, then `$USER`, then "staff"
    pub fn actor(&self) -> String {
        self.actor
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| "staff".to_string())
    }

    /// Lifecycle settings with defaults filled in
    pub fn lifecycle(&self) -> LifecycleConfig {
        let defaults = LifecycleConfig::default();
        LifecycleConfig {
            environment: self.environment.clone().unwrap_or(defaults.environment),
            module: self.module.clone().unwrap_or(defaults.module),
            permissive_transitions: self
                .lifecycle
                .permissive_transitions
                .unwrap_or(defaults.permissive_transitions),
        }
    }

    pub fn calendar(&self) -> BusinessCalendar {
        BusinessCalendar::with_holidays(self.calendar.holidays.iter().copied())
    }
}
