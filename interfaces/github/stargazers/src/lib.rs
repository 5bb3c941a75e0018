//! Thin GitHub GraphQL client for organization repositories and stargazers.

pub mod index;
pub mod types;
