/// Domain layer - cloud scan reports, scopes and the cache reconciliation rules
///
/// Nothing in here performs I/O.
pub mod domain;
pub mod services;
