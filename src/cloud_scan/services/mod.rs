/// Domain services - pure decision logic over reports and scopes
mod cache_reconciler;
mod report_composer;

pub use cache_reconciler::{CacheReconciler, Reconciliation};
pub use report_composer::ReportComposer;
