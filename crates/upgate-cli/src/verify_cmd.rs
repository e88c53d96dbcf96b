//! Offline verification of a saved response.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use upgate_crypto::{SignedResponse, SigningKey};

/// Outcome of checking one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub received: String,
    pub computed: String,
    pub valid: bool,
}

/// Parse `text` as a signed response and recompute its signature.
///
/// The computed signature is only kept for display; validity comes from
/// the constant-time check.
pub fn verify_text(text: &str, key: &SigningKey) -> Result<(SignedResponse, Verification)> {
    let response: SignedResponse =
        serde_json::from_str(text).context("Response is not a signed update decision")?;
    let verification = Verification {
        received: response.signature.clone(),
        computed: key.sign_decision(&response.decision),
        valid: response.verify(key).is_ok(),
    };
    Ok((response, verification))
}

/// Read a response from `path`, or stdin when `None`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Execute the `verify` subcommand. Returns whether the signature is valid.
#[allow(clippy::print_stdout)]
pub fn run(file: Option<&Path>, key: &SigningKey) -> Result<bool> {
    let text = read_input(file)?;
    let (_, verification) = verify_text(&text, key)?;
    println!("received signature: {}", verification.received);
    println!("computed signature: {}", verification.computed);
    println!(
        "signature: {}",
        if verification.valid { "valid" } else { "INVALID" }
    );
    Ok(verification.valid)
}
