/// ProgressReporter port for user-facing status lines
///
/// Diagnostic detail goes through `tracing`; this port carries the short
/// messages a person running a scan wants to see on stderr. The scan
/// progress bar itself is drawn by the use case while the backend runs.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports a failed step before the error propagates
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
