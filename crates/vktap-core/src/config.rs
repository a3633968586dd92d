use std::path::Path;

use serde::Deserialize;

use crate::tap_config::{
    LegacyParams, TapConfig, DEFAULT_API_BASE_URL, DEFAULT_API_VERSION, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use crate::ConfigError;

/// On-disk shape of the config file. Every field is optional here; required
/// fields are enforced by [`build_tap_config`] after env overrides apply.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTapConfig {
    token: Option<String>,
    group_id: Option<i64>,
    app_id: Option<i64>,
    params: Option<RawParams>,
    page_size: Option<u32>,
    lookback_days: Option<u32>,
    include_story: Option<bool>,
    include_admin_groups: Option<bool>,
    api_base_url: Option<String>,
    api_version: Option<String>,
    request_timeout_secs: Option<u64>,
    log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawParams {
    token: Option<String>,
    user_id: Option<i64>,
}

/// Load the tap configuration from a JSON or YAML file, then apply
/// environment overrides.
///
/// Calls `dotenvy::dotenv().ok()` first so a local `.env` can supply the token.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, a required
/// field is missing, or a value is out of range.
pub fn load_tap_config(path: &Path) -> Result<TapConfig, ConfigError> {
    dotenvy::dotenv().ok();
    let raw = read_config_file(path)?;
    build_tap_config(raw, |key| std::env::var(key))
}

/// Parse configuration from an in-memory JSON/YAML document without
/// consulting the environment.
///
/// # Errors
///
/// Returns `ConfigError` if the document is malformed or fails validation.
pub fn parse_tap_config(content: &str) -> Result<TapConfig, ConfigError> {
    let raw: RawTapConfig = serde_yaml::from_str(content)?;
    build_tap_config(raw, |_| Err(std::env::VarError::NotPresent))
}

fn read_config_file(path: &Path) -> Result<RawTapConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Merge file values with env overrides and validate the result.
///
/// Env lookup is injected so tests can use a plain `HashMap` instead of
/// mutating the process environment.
fn build_tap_config<F>(raw: RawTapConfig, lookup: F) -> Result<TapConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let env_i64 = |var: &str| -> Result<Option<i64>, ConfigError> {
        match lookup(var) {
            Ok(value) => value
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidField {
                    field: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(None),
        }
    };

    let non_blank = |t: &String| !t.trim().is_empty();
    let token = lookup("VK_TOKEN")
        .ok()
        .filter(non_blank)
        .or(raw.token.filter(non_blank))
        .ok_or_else(|| ConfigError::MissingField("token".to_string()))?;

    let group_id = env_i64("VK_GROUP_ID")?
        .or(raw.group_id)
        .ok_or_else(|| ConfigError::MissingField("group_id".to_string()))?;
    if group_id <= 0 {
        return Err(ConfigError::InvalidField {
            field: "group_id".to_string(),
            reason: format!("must be a positive community id, got {group_id}"),
        });
    }

    let app_id = env_i64("VK_APP_ID")?.or(raw.app_id);

    let page_size = raw.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidField {
            field: "page_size".to_string(),
            reason: format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
        });
    }

    let lookback_days = raw.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS);
    if lookback_days == 0 {
        return Err(ConfigError::InvalidField {
            field: "lookback_days".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let include_admin_groups = raw.include_admin_groups.unwrap_or(false);
    let params = resolve_params(raw.params, include_admin_groups)?;

    let api_base_url = lookup("VK_API_BASE_URL")
        .ok()
        .or(raw.api_base_url)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let log_level = lookup("VKTAP_LOG_LEVEL")
        .ok()
        .or(raw.log_level)
        .unwrap_or_else(|| "info".to_string());

    Ok(TapConfig {
        token,
        group_id,
        app_id,
        params,
        page_size,
        lookback_days,
        include_story: raw.include_story.unwrap_or(false),
        include_admin_groups,
        api_base_url,
        api_version: raw
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        request_timeout_secs: raw.request_timeout_secs.unwrap_or(30),
        log_level,
    })
}

/// A partial `params` block is tolerated unless the admin-groups stream,
/// its only consumer, is switched on.
fn resolve_params(
    raw: Option<RawParams>,
    required: bool,
) -> Result<Option<LegacyParams>, ConfigError> {
    let (token, user_id) = match raw {
        Some(p) => (p.token.filter(|t| !t.trim().is_empty()), p.user_id),
        None => (None, None),
    };

    match (token, user_id) {
        (Some(token), Some(user_id)) => Ok(Some(LegacyParams { token, user_id })),
        (None, _) if required => Err(ConfigError::MissingField("params.token".to_string())),
        (_, None) if required => Err(ConfigError::MissingField("params.user_id".to_string())),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
