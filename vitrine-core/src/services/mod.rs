//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. The session and
//! catalog services are the two stores the front ends talk to; the rest
//! manage the files around them.

mod backup;
pub mod catalog;
pub mod encryption;
pub mod listing;
pub mod logging;
pub mod migration;
pub mod persisted;
pub mod session;
mod status;

pub use backup::{BackupService, ClearResult, CONFIG_FILES};
pub use catalog::{CatalogService, SAVE_FAILED};
pub use encryption::{EncryptResult, EncryptionService};
pub use listing::{paginate, Page, ProductFilter, PRODUCTS_PER_PAGE};
pub use logging::{EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use persisted::PersistedEntry;
pub use session::SessionService;
pub use status::{ProfileStats, StatusService, StatusSummary};
