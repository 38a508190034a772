//! Infrastructure adapters for the solution file format, paths, and configuration.

pub mod config;
pub mod paths;
pub mod projects;
pub mod sln;
