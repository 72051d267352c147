//! Turns prompt text into a navigation target.

use serde::Serialize;

/// Scheme prepended to input that does not name an allowed scheme.
pub const DEFAULT_SCHEME: &str = "https";

/// Schemes passed through verbatim when no allow-list is configured.
pub const FALLBACK_PROTOCOLS: [&str; 2] = ["http", "https"];

/// Rules for deciding whether user text is already a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationPolicy {
    /// Scheme used to synthesize a URL from bare input.
    pub default_scheme: String,
    /// Schemes accepted verbatim. `None` means [`FALLBACK_PROTOCOLS`].
    pub supported_protocols: Option<Vec<String>>,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self {
            default_scheme: DEFAULT_SCHEME.to_string(),
            supported_protocols: None,
        }
    }
}

impl NavigationPolicy {
    /// True when `input` starts with `<scheme>://` for an allowed scheme.
    #[must_use]
    pub fn has_allowed_scheme(&self, input: &str) -> bool {
        let starts_with_scheme = |scheme: &str| {
            input
                .strip_prefix(scheme)
                .is_some_and(|rest| rest.starts_with("://"))
        };
        match &self.supported_protocols {
            Some(protocols) => protocols.iter().any(|scheme| starts_with_scheme(scheme)),
            None => FALLBACK_PROTOCOLS.into_iter().any(starts_with_scheme),
        }
    }
}

/// Resolves prompt text to the URL a view should load.
///
/// Returns `None` for absent or blank text. Text already carrying an allowed
/// scheme is returned unchanged; anything else gets the default scheme
/// prepended. Well-formedness is left to the engine.
#[must_use]
pub fn resolve_navigation_target(user_text: Option<&str>, policy: &NavigationPolicy) -> Option<String> {
    let input = user_text.map(str::trim).filter(|text| !text.is_empty())?;
    if policy.has_allowed_scheme(input) {
        return Some(input.to_string());
    }
    Some(format!("{}://{input}", policy.default_scheme))
}
