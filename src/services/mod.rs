pub mod config;
pub mod inventory;
pub mod organizations;
pub mod pagination;
pub mod progress;
pub mod repositories;
pub mod rest;

pub use config::{ConfigOverrides, FileConfig, default_config_path, resolve_config};
pub use inventory::InventoryService;
pub use organizations::OrganizationEnumerator;
pub use pagination::{FailurePolicy, PageSource, Traversal, walk};
pub use progress::{ProgressEvent, ProgressSink, TracingProgress};
pub use repositories::RepositoryEnumerator;
pub use rest::{MAX_CONSECUTIVE_PAGE_FAILURES, RestRepositoryPaginator};
