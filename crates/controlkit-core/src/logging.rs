//! Logging facilities for controlkit.
//!
//! controlkit uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```
//! tracing_subscriber::fmt()
//!     .with_env_filter("controlkit::router=trace")
//!     .init();
//! ```
//!
//! The constants in [`targets`] are the `target:` values used by every log
//! statement in the workspace, so they can be used directly in filter
//! directives.

/// Target names for log filtering.
pub mod targets {
    /// Control creation, disposal and handle table changes.
    pub const LIFECYCLE: &str = "controlkit::lifecycle";
    /// Native event normalization and listener dispatch.
    pub const ROUTER: &str = "controlkit::router";
    /// Tab groups and traversal.
    pub const FOCUS: &str = "controlkit::focus";
    /// Listener registration.
    pub const LISTENER: &str = "controlkit::listener";
    /// Calls into the native platform.
    pub const NATIVE: &str = "controlkit::native";
}

/// Span names used for tracing.
pub mod span_names {
    /// One native callback, from lookup to handled/not-handled.
    pub const NATIVE_EVENT: &str = "controlkit::native_event";
    /// A disposal cascade.
    pub const DISPOSE: &str = "controlkit::dispose";
    /// A traversal attempt.
    pub const TRAVERSE: &str = "controlkit::traverse";
}
