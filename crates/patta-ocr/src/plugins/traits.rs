//! Base plugin trait definition.
//!
//! OCR and NER backends implement [`Plugin`] for identification and lifecycle
//! management. Backends are created once at startup and shared as
//! `Arc<dyn Trait>` between concurrent requests.

use crate::Result;

/// Base trait that all backends must implement.
///
/// # Thread Safety
///
/// All plugins must be `Send + Sync` to support concurrent usage across threads.
///
/// # Example
///
/// ```rust
/// use patta_ocr::plugins::Plugin;
/// use patta_ocr::Result;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct MyPlugin {
///     initialized: AtomicBool,
/// }
///
/// impl Plugin for MyPlugin {
///     fn name(&self) -> &str {
///         "my-plugin"
///     }
///
///     fn version(&self) -> String {
///         "1.0.0".to_string()
///     }
///
///     fn initialize(&self) -> Result<()> {
///         self.initialized.store(true, Ordering::Release);
///         Ok(())
///     }
///
///     fn shutdown(&self) -> Result<()> {
///         self.initialized.store(false, Ordering::Release);
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Unique, lowercase, hyphenated identifier (e.g. `"tesseract-cli"`).
    fn name(&self) -> &str;

    /// Semantic version of this plugin.
    fn version(&self) -> String;

    /// Initialize the plugin.
    ///
    /// Called once at startup, before the plugin serves any request. Use it to
    /// validate that the external model or binary is reachable.
    ///
    /// # Errors
    ///
    /// Startup is aborted if this returns an error.
    fn initialize(&self) -> Result<()>;

    /// Shutdown the plugin.
    ///
    /// Errors during shutdown are logged but don't prevent the shutdown process.
    fn shutdown(&self) -> Result<()>;
}
