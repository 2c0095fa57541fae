use tracing::warn;

/// Hashes a plaintext password with bcrypt at the given cost factor.
pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    let hash = bcrypt::hash(plain, cost)?;
    Ok(hash)
}

/// Checks a plaintext password against a stored bcrypt digest.
///
/// A digest that cannot be decoded counts as a mismatch rather than an
/// error, so a corrupted record can never let a login through.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    match bcrypt::verify(plain, hash) {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "undecodable password hash, rejecting");
            false
        }
    }
}
