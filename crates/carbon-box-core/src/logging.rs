//! Logging facilities for Carbon Box.
//!
//! Carbon Box uses the `tracing` crate for instrumentation and never installs
//! a subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("carbon_box=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Timer system target.
    pub const TIMER: &str = "carbon_box_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "carbon_box_core::signal";
    /// Widget lifecycle and dispatch target.
    pub const WIDGET: &str = "carbon_box::widget";
    /// Focus navigation target.
    pub const NAVIGATION: &str = "carbon_box::navigation";
    /// Type-ahead search target.
    pub const SEARCH: &str = "carbon_box::search";
    /// Outside-click registry target.
    pub const REGISTRY: &str = "carbon_box::registry";
}

/// Report a recoverable problem.
///
/// Problems never abort the widget; they are logged once at `warn` level
/// under the widget target and processing continues.
pub fn report(error: &dyn std::error::Error) {
    tracing::warn!(target: targets::WIDGET, "carbonBox error: {error}");
}
