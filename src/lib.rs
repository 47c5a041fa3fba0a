/// Output formatting for inventory results (Markdown)
pub mod formatter;

/// GitHub Enterprise client, REST and GraphQL payloads
pub mod github;

/// Traversals, fan-out orchestration, progress reporting and configuration resolution
pub mod services;

/// Core type definitions and domain models used throughout the library
pub mod types;
