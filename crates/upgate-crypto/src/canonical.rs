//! Canonical byte encoding of an [`UpdateDecision`].
//!
//! Signatures are computed over exactly this layout:
//!
//! ```text
//! {"version":<str>,"updateRequired":<bool>,"updateUrl":<str>,"releaseNotes":<str>}
//! ```
//!
//! No whitespace, keys in this order, strings escaped as compact JSON
//! (`"` `\` and control characters only; non-ASCII passes through as UTF-8).
//! The output is byte-identical to compact JSON of the same object, so a
//! client hashing its own JSON serialization of the four fields verifies it.

use std::fmt::Write;

use upgate_core::UpdateDecision;

/// Encode the four signed fields of `decision`.
pub fn encode(decision: &UpdateDecision) -> String {
    let mut out = String::with_capacity(
        64 + decision.version.len() + decision.update_url.len() + decision.release_notes.len(),
    );
    out.push_str("{\"version\":");
    push_json_str(&mut out, &decision.version);
    out.push_str(",\"updateRequired\":");
    out.push_str(if decision.update_required { "true" } else { "false" });
    out.push_str(",\"updateUrl\":");
    push_json_str(&mut out, &decision.update_url);
    out.push_str(",\"releaseNotes\":");
    push_json_str(&mut out, &decision.release_notes);
    out.push('}');
    out
}

fn push_json_str(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c < '\u{20}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decision() -> UpdateDecision {
        UpdateDecision {
            version: "1.0.1".into(),
            update_required: true,
            update_url: "https://play.google.com/store/apps/details?id=com.example.android.app"
                .into(),
            release_notes: "New release".into(),
        }
    }

    #[test]
    fn fixed_layout() {
        assert_eq!(
            encode(&decision()),
            r#"{"version":"1.0.1","updateRequired":true,"updateUrl":"https://play.google.com/store/apps/details?id=com.example.android.app","releaseNotes":"New release"}"#
        );
    }

    #[test]
    fn false_literal() {
        let d = UpdateDecision {
            update_required: false,
            ..decision()
        };
        assert!(encode(&d).contains(r#""updateRequired":false"#));
    }

    #[test]
    fn matches_compact_json_of_the_same_object() {
        let notes = [
            "plain",
            "quote \" and backslash \\",
            "line\nbreak\ttab\rreturn",
            "control \u{01}\u{08}\u{0c}\u{1f} chars",
            "non-ascii: تحديث جديد متاح — ünïcödé 🚀",
            "slash / and del \u{7f}",
            "separators \u{2028}\u{2029}",
        ];
        for note in notes {
            let d = UpdateDecision {
                release_notes: note.into(),
                ..decision()
            };
            // serde_json::json! keeps insertion order only with preserve_order,
            // so build the expected text by hand from per-field encodings.
            let expected = format!(
                "{{\"version\":{},\"updateRequired\":{},\"updateUrl\":{},\"releaseNotes\":{}}}",
                serde_json::to_string(&d.version).unwrap(),
                d.update_required,
                serde_json::to_string(&d.update_url).unwrap(),
                serde_json::to_string(&d.release_notes).unwrap(),
            );
            assert_eq!(encode(&d), expected, "{note:?}");
        }
    }

    #[test]
    fn struct_serialization_agrees() {
        // derive(Serialize) emits fields in declaration order
        let d = decision();
        assert_eq!(encode(&d), serde_json::to_string(&d).unwrap());
    }

    #[test]
    fn deterministic() {
        assert_eq!(encode(&decision()), encode(&decision()));
    }
}
