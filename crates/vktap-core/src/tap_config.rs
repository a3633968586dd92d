use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.vk.com/method/";
pub const DEFAULT_API_VERSION: &str = "5.199";

/// Number of posts listed per run, and comments listed per post.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Upper bound the VK wall and comment methods accept for `count`.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Days of daily statistics requested by the group stat stream.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 22;

/// Alternate token / user pair used only by the admin-groups stream.
#[derive(Clone)]
pub struct LegacyParams {
    pub token: String,
    pub user_id: i64,
}

impl std::fmt::Debug for LegacyParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyParams")
            .field("token", &"[redacted]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Validated tap configuration, resolved once at startup.
#[derive(Clone)]
pub struct TapConfig {
    pub token: String,
    /// Positive community id. Wall, comment, reach and story calls use the
    /// negated form, see [`TapConfig::owner_id`].
    pub group_id: i64,
    pub app_id: Option<i64>,
    pub params: Option<LegacyParams>,
    pub page_size: u32,
    pub lookback_days: u32,
    pub include_story: bool,
    pub include_admin_groups: bool,
    pub api_base_url: String,
    pub api_version: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl TapConfig {
    /// Owner id convention for community-owned objects: the negated group id.
    #[must_use]
    pub fn owner_id(&self) -> i64 {
        -self.group_id
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("token", &"[redacted]")
            .field("group_id", &self.group_id)
            .field("app_id", &self.app_id)
            .field("params", &self.params)
            .field("page_size", &self.page_size)
            .field("lookback_days", &self.lookback_days)
            .field("include_story", &self.include_story)
            .field("include_admin_groups", &self.include_admin_groups)
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}
