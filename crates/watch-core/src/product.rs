//! Product configuration trait for CLI binaries
//!
//! Each binary implements this trait to define its identity, its template
//! source defaults, and the author fallback baked into its manifests.

/// Configuration trait for different CLI products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default base URL for fetching template files
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding the template URL
    fn template_url_env(&self) -> &'static str;

    /// Author identity used when none is given on the command line
    fn default_author(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
