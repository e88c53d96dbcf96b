//! Update decisions.
//!
//! [`UpdateEngine::decide`] classifies the app identifier, picks that
//! platform's minimum version and store link, and reports whether the
//! installed version is below the minimum.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::platform::{Platform, PlatformClassifier, SubstringClassifier};

/// A client's update check, already validated by the transport layer:
/// `app_id` and `current_version` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub app_id: String,
    pub current_version: String,
    /// Accepted for analytics; has no effect on the decision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<String>,
}

/// The payload returned to the client and covered by the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDecision {
    /// Minimum acceptable version for the client's platform.
    pub version: String,
    pub update_required: bool,
    pub update_url: String,
    pub release_notes: String,
}

/// Produces [`UpdateDecision`]s from an immutable [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct UpdateEngine<C = SubstringClassifier> {
    config: EngineConfig,
    classifier: C,
}

impl UpdateEngine<SubstringClassifier> {
    /// Build an engine with the default substring platform classifier.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_classifier(config, SubstringClassifier)
    }
}

impl<C: PlatformClassifier> UpdateEngine<C> {
    /// Build an engine with a custom platform classifier.
    pub fn with_classifier(config: EngineConfig, classifier: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, classifier })
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classify(&self, app_id: &str) -> Platform {
        self.classifier.classify(app_id)
    }

    /// Decide whether `current_version` of `app_id` must be upgraded.
    ///
    /// Only fails in strict version mode, when `current_version` is malformed.
    pub fn decide(&self, app_id: &str, current_version: &str) -> Result<UpdateDecision> {
        let platform = self.classify(app_id);
        let policy = self.config.policy(platform);

        let ordering = self
            .config
            .version_parsing
            .compare(current_version, &policy.min_version)?;
        let update_required = ordering == Ordering::Less;

        debug!(
            %platform,
            app_id,
            current_version,
            min_version = %policy.min_version,
            update_required,
            "update decision"
        );

        Ok(UpdateDecision {
            version: policy.min_version.clone(),
            update_required,
            update_url: policy.store_url(app_id),
            release_notes: self.config.release_notes.clone(),
        })
    }

    /// Decide for a full request. `build_number` is logged, never consulted.
    pub fn decide_request(&self, request: &UpdateRequest) -> Result<UpdateDecision> {
        if let Some(build) = &request.build_number {
            debug!(app_id = %request.app_id, build_number = %build, "build number reported");
        }
        self.decide(&request.app_id, &request.current_version)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{ANDROID_STORE_URL_TEMPLATE, DEFAULT_RELEASE_NOTES, PlatformPolicy};
    use crate::error::Error;
    use crate::version::VersionParsing;

    fn engine() -> UpdateEngine {
        UpdateEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn old_android_build_must_update() {
        let d = engine().decide("com.example.android.app", "1.0.0").unwrap();
        assert!(d.update_required);
        assert_eq!(d.version, "1.0.1");
        assert!(d.update_url.contains("play.google.com"));
        assert!(d.update_url.contains("com.example.android.app"));
    }

    #[test]
    fn current_ios_build_is_fine() {
        let d = engine().decide("com.example.ios.app", "1.0.1").unwrap();
        assert!(!d.update_required);
        assert!(d.update_url.contains("apps.apple.com"));
        assert_eq!(d.update_url, "https://apps.apple.com/app/idcom.example.ios.app");
    }

    #[test]
    fn newer_than_minimum_is_fine() {
        let d = engine().decide("com.example.android.app", "2.0").unwrap();
        assert!(!d.update_required);
    }

    #[test]
    fn release_notes_are_static() {
        let a = engine().decide("com.example.android.app", "0.1").unwrap();
        let b = engine().decide("123456", "9.9.9").unwrap();
        assert_eq!(a.release_notes, DEFAULT_RELEASE_NOTES);
        assert_eq!(a.release_notes, b.release_notes);
    }

    #[test]
    fn per_platform_minimums() {
        let config = EngineConfig {
            android: PlatformPolicy::new("3.0.0", ANDROID_STORE_URL_TEMPLATE),
            ..EngineConfig::default()
        };
        let engine = UpdateEngine::new(config).unwrap();

        let android = engine.decide("org.android.demo", "2.5.0").unwrap();
        assert!(android.update_required);
        assert_eq!(android.version, "3.0.0");

        let ios = engine.decide("org.demo", "2.5.0").unwrap();
        assert!(!ios.update_required);
        assert_eq!(ios.version, "1.0.1");
    }

    #[test]
    fn build_number_does_not_affect_decision() {
        let engine = engine();
        let mut request = UpdateRequest {
            app_id: "com.example.android.app".into(),
            current_version: "1.0.0".into(),
            build_number: None,
        };
        let without = engine.decide_request(&request).unwrap();
        request.build_number = Some("9999".into());
        let with = engine.decide_request(&request).unwrap();
        assert_eq!(without, with);
    }

    #[test]
    fn lenient_mode_never_fails() {
        let d = engine().decide("com.example.android.app", "not-a-version").unwrap();
        // major is not-a-number, minor and patch pad to zero: 0.0 < 0.1
        assert!(d.update_required);
    }

    #[test]
    fn strict_mode_rejects_malformed_current_version() {
        let config = EngineConfig {
            version_parsing: VersionParsing::Strict,
            ..EngineConfig::default()
        };
        let engine = UpdateEngine::new(config).unwrap();
        let err = engine.decide("com.example.android.app", "1.x").unwrap_err();
        assert!(matches!(err, Error::InvalidVersion { .. }));
        assert!(engine.decide("com.example.android.app", "1.0").unwrap().update_required);
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = EngineConfig {
            android: PlatformPolicy::new("1.0.0", "no placeholder"),
            ..EngineConfig::default()
        };
        assert!(UpdateEngine::new(config).is_err());
    }

    struct AlwaysAndroid;

    impl PlatformClassifier for AlwaysAndroid {
        fn classify(&self, _app_id: &str) -> Platform {
            Platform::Android
        }
    }

    #[test]
    fn classifier_is_swappable() {
        let engine = UpdateEngine::with_classifier(EngineConfig::default(), AlwaysAndroid).unwrap();
        let d = engine.decide("com.example.ios.app", "1.0.1").unwrap();
        assert!(d.update_url.starts_with("https://play.google.com/"));
    }

    #[test]
    fn decision_serializes_in_camel_case() {
        let d = engine().decide("com.example.android.app", "1.0.0").unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["updateRequired"], true);
        assert!(json.get("updateUrl").is_some());
        assert!(json.get("releaseNotes").is_some());
    }

    #[test]
    fn request_deserializes_from_camel_case() {
        let req: UpdateRequest =
            serde_json::from_str(r#"{"appId":"a","currentVersion":"1.0"}"#).unwrap();
        assert_eq!(req.app_id, "a");
        assert_eq!(req.current_version, "1.0");
        assert_eq!(req.build_number, None);
    }
}
