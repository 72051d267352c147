//! Engine configuration handed over once at startup.

use std::path::PathBuf;

use serde::Serialize;

use crate::paths::PathBundle;

/// Per-view settings. Fixed when the view is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSettings {
    pub allow_file_access_from_file_urls: bool,
    pub allow_universal_access_from_file_urls: bool,
    pub auto_load_images: bool,
    pub enable_developer_extras: bool,
    pub enable_page_cache: bool,
    pub enable_smooth_scrolling: bool,
    pub enable_webaudio: bool,
    pub javascript_can_access_clipboard: bool,
    pub javascript_can_open_windows_automatically: bool,
    pub default_charset: String,
    pub default_font_family: String,
    pub monospace_font_family: String,
    pub sans_serif_font_family: String,
    pub serif_font_family: String,
    pub default_font_size: u32,
    pub default_monospace_font_size: u32,
    pub minimum_font_size: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            allow_file_access_from_file_urls: false,
            allow_universal_access_from_file_urls: false,
            auto_load_images: true,
            enable_developer_extras: false,
            enable_page_cache: true,
            enable_smooth_scrolling: false,
            enable_webaudio: false,
            javascript_can_access_clipboard: false,
            javascript_can_open_windows_automatically: false,
            default_charset: "utf-8".to_string(),
            default_font_family: "sans-serif".to_string(),
            monospace_font_family: "monospace".to_string(),
            sans_serif_font_family: "sans-serif".to_string(),
            serif_font_family: "serif".to_string(),
            default_font_size: 16,
            default_monospace_font_size: 13,
            minimum_font_size: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsErrorsPolicy {
    /// Fail the load on any certificate error.
    Fail,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheModel {
    DocumentViewer,
    WebBrowser,
    DocumentBrowser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CookieAcceptPolicy {
    Always,
    Never,
    NoThirdParty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CookieStorageFormat {
    Text,
    Sqlite,
}

/// Shared engine context: session storage, process limits, privacy policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSettings {
    pub base_cache_directory: PathBuf,
    pub base_data_directory: PathBuf,
    pub web_process_count_limit: u32,
    pub tls_errors_policy: TlsErrorsPolicy,
    pub cache_model: CacheModel,
    pub spell_checking_enabled: bool,
    pub preferred_languages: Vec<String>,
    pub cookie_accept_policy: CookieAcceptPolicy,
    pub cookie_storage_path: PathBuf,
    pub cookie_storage_format: CookieStorageFormat,
    pub web_extensions_directory: PathBuf,
}

impl ContextSettings {
    /// Builds the context for the given paths with the shell's fixed policy.
    #[must_use]
    pub fn new(paths: &PathBundle, web_process_count_limit: u32, preferred_languages: Vec<String>) -> Self {
        Self {
            base_cache_directory: paths.cache.clone(),
            base_data_directory: paths.data.clone(),
            web_process_count_limit,
            tls_errors_policy: TlsErrorsPolicy::Fail,
            cache_model: CacheModel::WebBrowser,
            spell_checking_enabled: false,
            preferred_languages,
            cookie_accept_policy: CookieAcceptPolicy::NoThirdParty,
            cookie_storage_path: paths.cookies.clone(),
            cookie_storage_format: CookieStorageFormat::Text,
            web_extensions_directory: paths.extensions.clone(),
        }
    }
}

/// Find-in-page options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FindOptions {
    pub case_insensitive: bool,
    pub wrap_around: bool,
    pub max_match_count: u32,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            wrap_around: true,
            max_match_count: 1024,
        }
    }
}
