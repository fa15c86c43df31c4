//! Constants shared by the core crate and the binaries that configure it.

/// Environment variable holding the backend API base URL.
pub const API_URL_ENV: &str = "DENTAL_API_URL";

/// Environment variable holding the patient portal base URL used for self-service links.
pub const PORTAL_URL_ENV: &str = "DENTAL_PORTAL_URL";

/// Environment variable holding an optional bearer token.
pub const API_TOKEN_ENV: &str = "DENTAL_API_TOKEN";

/// Environment variable holding the HTTP timeout in whole seconds.
pub const HTTP_TIMEOUT_ENV: &str = "DENTAL_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

pub const DEFAULT_PORTAL_URL: &str = "http://localhost:3000";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Portal path segments of the cancel link.
pub const CANCEL_PATH: [&str; 2] = ["booking", "cancel"];

/// Portal path segments of the reschedule link.
pub const RESCHEDULE_PATH: [&str; 2] = ["booking", "reschedule"];

/// Query parameter carrying a cancel or reschedule token.
pub const TOKEN_QUERY_PARAM: &str = "token";
