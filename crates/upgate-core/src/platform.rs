/// Mobile platform an update request is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an application identifier to a platform.
pub trait PlatformClassifier: Send + Sync {
    fn classify(&self, app_id: &str) -> Platform;
}

/// Classifies by substring: any identifier containing `android`
/// (case-insensitive) is Android, everything else is iOS.
///
/// This is a heuristic. Unrelated strings land on iOS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringClassifier;

impl PlatformClassifier for SubstringClassifier {
    fn classify(&self, app_id: &str) -> Platform {
        if is_android(app_id) {
            Platform::Android
        } else {
            Platform::Ios
        }
    }
}

/// Returns true if `app_id` contains `android`, ignoring ASCII case.
pub fn is_android(app_id: &str) -> bool {
    app_id.to_ascii_lowercase().contains("android")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_with_android_segment() {
        assert_eq!(
            SubstringClassifier.classify("com.example.android.app"),
            Platform::Android
        );
    }

    #[test]
    fn case_insensitive_match() {
        assert!(is_android("com.example.ANDROID"));
        assert!(is_android("AndroidApp"));
        assert!(is_android("myandroidthing"));
    }

    #[test]
    fn ios_bundle_id() {
        assert_eq!(SubstringClassifier.classify("com.example.ios.app"), Platform::Ios);
    }

    #[test]
    fn numeric_app_store_id_is_ios() {
        assert_eq!(SubstringClassifier.classify("1234567890"), Platform::Ios);
    }

    #[test]
    fn unrelated_identifier_defaults_to_ios() {
        assert_eq!(SubstringClassifier.classify("com.syrdroid.islamicTik"), Platform::Ios);
        assert_eq!(SubstringClassifier.classify("windows-phone"), Platform::Ios);
    }

    #[test]
    fn display_names() {
        assert_eq!(Platform::Android.to_string(), "android");
        assert_eq!(Platform::Ios.to_string(), "ios");
    }
}
