use bcrypt::{DEFAULT_COST, BcryptError};

/// hash_password
///
/// One-way bcrypt hash with a fresh per-call salt at the default cost.
/// Two hashes of the same plaintext are never equal; equality lives entirely
/// in `verify_password`.
pub fn hash_password(plaintext: &str) -> Result<String, BcryptError> {
    bcrypt::hash(plaintext, DEFAULT_COST)
}

/// verify_password
///
/// True iff `plaintext` matches the stored bcrypt hash. The digest comparison
/// is constant-time inside the bcrypt crate; an undecodable hash counts as a
/// mismatch rather than an error, so callers get a plain boolean.
pub fn verify_password(plaintext: &str, hashed: &str) -> bool {
    bcrypt::verify(plaintext, hashed).unwrap_or(false)
}
