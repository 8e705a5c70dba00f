//! Loading policy configuration and salary inputs from files.

pub mod input_loader;
pub mod loader;
pub mod policy_file;
pub mod source;

pub use loader::{BracketTables, TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
pub use policy_file::{PolicyFile, PolicyFileError, load_policies};
pub use source::{BuiltinPolicies, PolicyFileSource, PolicySource, SourceError};
