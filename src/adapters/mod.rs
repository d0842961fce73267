/// Adapters layer - Infrastructure implementations
///
/// Concrete implementations of the outbound ports. The CLI in `main.rs`
/// drives the application directly.
pub mod outbound;
