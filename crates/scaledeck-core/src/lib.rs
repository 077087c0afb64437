// scaledeck-core: Normalization, caching and export between scaledeck-api and the CLI.

pub mod accessor;
pub mod classify;
pub mod config;
pub mod console;
pub mod convert;
pub mod error;
pub mod export;
pub mod model;
pub mod raw;
pub mod store;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accessor::{Accessor, ApiKeyRef, Health, MutationOutcome, UserFilter};
pub use classify::{EnglishCatalog, ErrorHandler, MessageCatalog, localize_error};
pub use config::{ConsoleConfig, TlsVerification};
pub use console::Console;
pub use convert::{BatchMapping, extract_raw_prefix};
pub use error::{AuthError, CoreError, MappingError};
pub use export::{ExportArtifact, ExportFormat, ExportOptions, ExportResource, Exporter};
pub use store::{Collection, DataStore};

pub use model::{ApiKey, Identified, Node, PreAuthKey, User};
