use crate::entity::SignatureHash;

/// Produces and checks tamper-evidence hashes for audit entries.
pub trait AuditSigner: 'static + Sync + Send {
    fn sign(&self, payload: &[u8]) -> SignatureHash;
    fn verify(&self, payload: &[u8], signature: &SignatureHash) -> bool;
}

pub trait DependOnAuditSigner: 'static + Sync + Send {
    type AuditSigner: AuditSigner;
    fn audit_signer(&self) -> &Self::AuditSigner;
}
