use anyhow::Context;
use reelvault_core::AppError;

/// Hash `password` with bcrypt at `cost`, off the async executor.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("Password hashing task failed")?
        .context("Password hashing failed")?;
    Ok(hash)
}

/// Check `password` against a stored bcrypt hash.
#[cfg(test)]
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, hash).context("Password verification failed")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("correct horse".to_string(), 4).await.unwrap();
        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_invalid_cost_is_internal_error() {
        let err = hash_password("pw".to_string(), 2).await.unwrap_err();
        assert!(matches!(err, AppError::InternalWithSource { .. }));
        assert!(err.detailed_message().contains("Password hashing failed"));
    }
}
