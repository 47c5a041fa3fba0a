pub mod client;
pub mod error;
pub mod graphql;
pub mod rest;

pub use client::{GitHubClient, GraphQLExecutor, RestExecutor};
pub use graphql::graphql_types;
