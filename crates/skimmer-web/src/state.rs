use skimmer_core::Config;

/// Shared application state accessible from all handlers.
///
/// Holds only immutable server defaults; every request builds its own
/// effective configuration from these plus its form fields.
pub struct AppState {
    pub defaults: Config,
}
