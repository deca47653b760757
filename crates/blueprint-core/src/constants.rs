//! Application-wide constants
//!
//! Single source of truth for ports, timeouts and limits shared by the relay
//! and its clients.

/// Network port configuration
pub mod ports {
    /// Default port the relay listens on
    pub const RELAY: u16 = 3001;
}

/// Route layout of the relay
pub mod routes {
    /// Base path the generate route is mounted under
    pub const API_BASE: &str = "/api";
    /// Generate route, relative to the base path
    pub const GENERATE: &str = "/generate";
    /// Health check route
    pub const HEALTH: &str = "/health";
}

/// Timeout configuration (in seconds)
pub mod timeouts {
    /// How long a success status stays visible
    pub const STATUS_SUCCESS_SECS: u64 = 3;
    /// How long an error status stays visible
    pub const STATUS_ERROR_SECS: u64 = 5;
    /// Relay to image provider request timeout
    pub const PROVIDER_REQUEST_SECS: u64 = 120;
    /// Client to relay request timeout (covers the provider round trip)
    pub const RELAY_REQUEST_SECS: u64 = 150;
}

/// Payload limits
pub mod limits {
    /// Maximum accepted JSON body on the relay (25 MiB)
    pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;
}

/// Default values for configuration
pub mod defaults {
    /// Relay base URL used by clients when nothing is configured
    pub const RELAY_URL: &str = "http://localhost:3001";
    /// Image model used for generation
    pub const GEMINI_MODEL: &str = "gemini-2.5-flash-image-preview";
    /// Generative Language API base URL
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// Drawing surface defaults
pub mod canvas {
    /// Width of an imported generated image
    pub const IMPORT_WIDTH: f32 = 400.0;
    /// Height of an imported generated image
    pub const IMPORT_HEIGHT: f32 = 300.0;
    /// Padding around the exported drawing, in surface units
    pub const EXPORT_PADDING: f32 = 32.0;
    /// Largest exported edge, in pixels
    pub const MAX_EXPORT_EDGE: u32 = 8192;
}
