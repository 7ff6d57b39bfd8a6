// ABOUTME: Library root for speedy-deploy - exposes the upload pipeline and its collaborators.
// ABOUTME: The main binary is in main.rs.

pub mod auth;
pub mod config;
pub mod error;
pub mod files;
pub mod hosting;
pub mod output;
pub mod types;
pub mod upload;
