use std::fs::File;
use std::path::PathBuf;

use salary_core::{PolicyError, PolicySet};
use thiserror::Error;
use tracing::info;

use crate::loader::{BracketTables, TaxBracketLoader, TaxBracketLoaderError};
use crate::policy_file::{PolicyFileError, load_policies};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Brackets(#[from] TaxBracketLoaderError),

    #[error(transparent)]
    PolicyFile(#[from] PolicyFileError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Somewhere a policy set can be loaded from.
///
/// Loading validates every policy, so a successful `load` is the startup-time
/// configuration check; calculations never see an invalid policy.
pub trait PolicySource {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn load(&self) -> Result<PolicySet, SourceError>;
}

/// The three regimes compiled into `salary-core`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPolicies;

impl PolicySource for BuiltinPolicies {
    fn name(&self) -> &str {
        "builtin"
    }

    fn load(&self) -> Result<PolicySet, SourceError> {
        let set = PolicySet::builtin()?;
        info!(source = self.name(), policies = ?set.ids(), "policies loaded");
        Ok(set)
    }
}

/// A TOML policy file, optionally backed by a CSV of bracket tables it can
/// refer to by name.
#[derive(Debug, Clone)]
pub struct PolicyFileSource {
    pub policies: PathBuf,
    pub brackets: Option<PathBuf>,
}

impl PolicyFileSource {
    pub fn new(policies: impl Into<PathBuf>) -> Self {
        Self {
            policies: policies.into(),
            brackets: None,
        }
    }

    pub fn with_brackets(
        mut self,
        brackets: impl Into<PathBuf>,
    ) -> Self {
        self.brackets = Some(brackets.into());
        self
    }

    fn load_tables(&self) -> Result<BracketTables, SourceError> {
        let Some(path) = &self.brackets else {
            return Ok(BracketTables::new());
        };
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(TaxBracketLoader::load(file)?)
    }
}

impl PolicySource for PolicyFileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self) -> Result<PolicySet, SourceError> {
        let tables = self.load_tables()?;
        let text = std::fs::read_to_string(&self.policies).map_err(|source| SourceError::Io {
            path: self.policies.display().to_string(),
            source,
        })?;
        let set = load_policies(&text, &tables)?;
        info!(
            source = self.name(),
            path = %self.policies.display(),
            tables = tables.len(),
            policies = ?set.ids(),
            "policies loaded"
        );
        Ok(set)
    }
}
