//! Update policy configuration.
//!
//! Built once at startup (see `upgate-server`) and handed to the
//! [`UpdateEngine`](crate::decision::UpdateEngine). Nothing in the core reads
//! the environment.

use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::version::VersionParsing;

/// Minimum version applied to both platforms when none is configured.
pub const DEFAULT_MIN_VERSION: &str = "1.0.1";

/// Placeholder substituted with the app identifier in store URL templates.
pub const STORE_ID_PLACEHOLDER: &str = "{id}";

/// Play Store listing, identifier passed as the `id` query parameter.
pub const ANDROID_STORE_URL_TEMPLATE: &str = "https://play.google.com/store/apps/details?id={id}";

/// App Store listing. The identifier is appended directly after `id`, which
/// suits numeric App Store ids.
pub const IOS_STORE_URL_TEMPLATE: &str = "https://apps.apple.com/app/id{id}";

/// Release note shipped with every decision.
pub const DEFAULT_RELEASE_NOTES: &str = "تحديث جديد متاح يتضمن تحسينات في الأداء وميزات جديدة. يرجى التحديث للاستمرار في استخدام التطبيق.";

/// Minimum version and store link for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPolicy {
    pub min_version: String,
    pub store_url_template: String,
}

impl PlatformPolicy {
    pub fn new(min_version: impl Into<String>, store_url_template: impl Into<String>) -> Self {
        Self {
            min_version: min_version.into(),
            store_url_template: store_url_template.into(),
        }
    }

    pub fn android_default() -> Self {
        Self::new(DEFAULT_MIN_VERSION, ANDROID_STORE_URL_TEMPLATE)
    }

    pub fn ios_default() -> Self {
        Self::new(DEFAULT_MIN_VERSION, IOS_STORE_URL_TEMPLATE)
    }

    /// Fill the template with `store_id` verbatim, without any separator or
    /// escaping.
    pub fn store_url(&self, store_id: &str) -> String {
        self.store_url_template.replace(STORE_ID_PLACEHOLDER, store_id)
    }

    fn validate(&self, platform: Platform, parsing: VersionParsing) -> Result<()> {
        if self.min_version.trim().is_empty() {
            return Err(Error::Config(format!("{platform} minimum version is empty")));
        }
        parsing.validate(&self.min_version).map_err(|e| {
            Error::Config(format!("{platform} minimum version is invalid: {e}"))
        })?;
        if !self.store_url_template.contains(STORE_ID_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "{platform} store URL template must contain {STORE_ID_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}

/// Everything the decision engine needs. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub android: PlatformPolicy,
    pub ios: PlatformPolicy,
    pub release_notes: String,
    pub version_parsing: VersionParsing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            android: PlatformPolicy::android_default(),
            ios: PlatformPolicy::ios_default(),
            release_notes: DEFAULT_RELEASE_NOTES.to_string(),
            version_parsing: VersionParsing::default(),
        }
    }
}

impl EngineConfig {
    /// Policy for `platform`.
    pub const fn policy(&self, platform: Platform) -> &PlatformPolicy {
        match platform {
            Platform::Android => &self.android,
            Platform::Ios => &self.ios,
        }
    }

    /// Reject configurations the engine cannot serve.
    ///
    /// Minimum versions are only parsed here in strict mode.
    pub fn validate(&self) -> Result<()> {
        self.android
            .validate(Platform::Android, self.version_parsing)?;
        self.ios.validate(Platform::Ios, self.version_parsing)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.android.min_version, "1.0.1");
        assert_eq!(config.ios.min_version, "1.0.1");
        assert_eq!(config.version_parsing, VersionParsing::Lenient);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn android_store_url_uses_query_parameter() {
        let url = PlatformPolicy::android_default().store_url("com.example.android.app");
        assert_eq!(
            url,
            "https://play.google.com/store/apps/details?id=com.example.android.app"
        );
    }

    #[test]
    fn ios_store_url_concatenates_without_separator() {
        assert_eq!(
            PlatformPolicy::ios_default().store_url("123456789"),
            "https://apps.apple.com/app/id123456789"
        );
        assert_eq!(
            PlatformPolicy::ios_default().store_url("com.example.ios.app"),
            "https://apps.apple.com/app/idcom.example.ios.app"
        );
    }

    #[test]
    fn policy_lookup() {
        let config = EngineConfig {
            android: PlatformPolicy::new("2.0.0", ANDROID_STORE_URL_TEMPLATE),
            ..EngineConfig::default()
        };
        assert_eq!(config.policy(Platform::Android).min_version, "2.0.0");
        assert_eq!(config.policy(Platform::Ios).min_version, "1.0.1");
    }

    #[test]
    fn template_without_placeholder_rejected() {
        let config = EngineConfig {
            ios: PlatformPolicy::new("1.0.0", "https://apps.apple.com/app/"),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn empty_min_version_rejected() {
        let config = EngineConfig {
            android: PlatformPolicy::new("  ", ANDROID_STORE_URL_TEMPLATE),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_min_version_only_rejected_when_strict() {
        let lenient = EngineConfig {
            android: PlatformPolicy::new("1.x", ANDROID_STORE_URL_TEMPLATE),
            ..EngineConfig::default()
        };
        assert!(lenient.validate().is_ok());

        let strict = EngineConfig {
            version_parsing: VersionParsing::Strict,
            ..lenient
        };
        assert!(strict.validate().is_err());
    }
}
