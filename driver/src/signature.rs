use error_stack::Report;

use kernel::interface::signature::AuditSigner;
use kernel::prelude::entity::SignatureHash;
use kernel::KernelError;

use crate::env;

const AUDIT_SIGNING_KEY: &str = "AUDIT_SIGNING_KEY";
const KEY_CONTEXT: &str = "gearloan 2026-04 audit entry signature";

/// Keyed BLAKE3 over the canonical entry payload. The key is derived from a
/// server secret, so entries cannot be re-signed without it.
pub struct Blake3AuditSigner {
    key: [u8; blake3::KEY_LEN],
}

impl Blake3AuditSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()),
        }
    }

    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let secret = env(AUDIT_SIGNING_KEY)?;
        if secret.trim().is_empty() {
            return Err(Report::new(KernelError::Internal)
                .attach_printable(format!("{AUDIT_SIGNING_KEY} must not be empty")));
        }
        Ok(Self::new(&secret))
    }
}

impl AuditSigner for Blake3AuditSigner {
    fn sign(&self, payload: &[u8]) -> SignatureHash {
        SignatureHash::new(blake3::keyed_hash(&self.key, payload).to_hex().to_string())
    }

    fn verify(&self, payload: &[u8], signature: &SignatureHash) -> bool {
        // Hash equality is constant time.
        blake3::Hash::from_hex(signature.as_ref())
            .is_ok_and(|expected| expected == blake3::keyed_hash(&self.key, payload))
    }
}
