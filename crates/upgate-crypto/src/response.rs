use serde::{Deserialize, Serialize};
use upgate_core::UpdateDecision;

use crate::error::CryptoError;
use crate::key::SigningKey;

/// Wire-level response: the decision fields followed by their signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedResponse {
    #[serde(flatten)]
    pub decision: UpdateDecision,
    pub signature: String,
}

impl SignedResponse {
    /// Sign `decision` with `key`.
    pub fn sign(decision: UpdateDecision, key: &SigningKey) -> Self {
        let signature = key.sign_decision(&decision);
        Self {
            decision,
            signature,
        }
    }

    /// Recompute the signature over the received fields and compare.
    pub fn verify(&self, key: &SigningKey) -> Result<(), CryptoError> {
        key.verify_decision(&self.decision, &self.signature)
    }

    pub fn into_decision(self) -> UpdateDecision {
        self.decision
    }
}
