//! Storage key constants.

/// Logical keys under which session credentials are stored.
pub struct StorageKeys;

impl StorageKeys {
    /// Short-lived bearer credential for protected requests
    pub const ACCESS_TOKEN: &'static str = "access_token";

    /// Long-lived credential used only against the refresh endpoint
    pub const REFRESH_TOKEN: &'static str = "refresh_token";
}
