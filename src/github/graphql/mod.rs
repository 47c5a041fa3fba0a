pub mod error;
pub mod graphql_types;
pub mod organization;
pub mod repository;
