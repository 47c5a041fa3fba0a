//! Core type definitions shared by the client, the traversals and the CLI

pub mod config;
pub mod inventory;
pub mod organization;
pub mod pagination;
pub mod repository;

pub use config::*;
pub use inventory::*;
pub use organization::*;
pub use pagination::*;
pub use repository::*;
