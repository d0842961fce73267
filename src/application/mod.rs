/// Application layer - Use cases and DTOs
///
/// Orchestrates the cloud scan domain and talks to infrastructure through ports.
pub mod cache_writer;
pub mod dto;
pub mod factories;
pub mod report_writer;
pub mod use_cases;
