// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Webforge

// Generation API Configuration
pub const WEBFORGE_API_KEY: &str = "WEBFORGE_API_KEY";
pub const WEBFORGE_API_BASE_URL: &str = "WEBFORGE_API_BASE_URL";
pub const WEBFORGE_MODEL: &str = "WEBFORGE_MODEL";
pub const WEBFORGE_TEMPLATE_MODEL: &str = "WEBFORGE_TEMPLATE_MODEL";
pub const WEBFORGE_HTTP_REQUEST_TIMEOUT_SECS: &str = "WEBFORGE_HTTP_REQUEST_TIMEOUT_SECS";
pub const WEBFORGE_HTTP_CONNECT_TIMEOUT_SECS: &str = "WEBFORGE_HTTP_CONNECT_TIMEOUT_SECS";

// Build Cycle Configuration
pub const WEBFORGE_PROGRESS_STEP: &str = "WEBFORGE_PROGRESS_STEP";
pub const WEBFORGE_MAX_LOG_ENTRIES: &str = "WEBFORGE_MAX_LOG_ENTRIES";
pub const WEBFORGE_READY_TIMEOUT_SECS: &str = "WEBFORGE_READY_TIMEOUT_SECS";

// Sandbox Configuration
pub const WEBFORGE_SANDBOX_ROOT: &str = "WEBFORGE_SANDBOX_ROOT";
pub const WEBFORGE_READY_CHANNEL_SIZE: &str = "WEBFORGE_READY_CHANNEL_SIZE";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
