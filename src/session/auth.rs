//! Credential verification
//!
//! Login goes through a [`CredentialVerifier`] so the account source can be
//! swapped (static accounts from config today, a directory service later)
//! without touching the session state machine. Rejections never say which
//! field was wrong.

use crate::catalogue::types::Role;
use crate::config::AccountConfig;
use async_trait::async_trait;
use thiserror::Error;

/// Generic login rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Credenciales incorrectas")]
pub struct AuthRejection;

/// A successfully verified account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccount {
    pub role: Role,
    pub display_name: String,
}

/// Pluggable credential check
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str)
        -> Result<VerifiedAccount, AuthRejection>;

    /// Verifier name for logging
    fn name(&self) -> &str;
}

/// Accounts listed in configuration.
///
/// Usernames match case-insensitively, passwords exactly.
pub struct StaticCredentials {
    accounts: Vec<AccountConfig>,
}

impl StaticCredentials {
    pub fn new(accounts: Vec<AccountConfig>) -> Self {
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<VerifiedAccount, AuthRejection> {
        let username = username.trim().to_lowercase();
        self.accounts
            .iter()
            .find(|a| a.username.to_lowercase() == username)
            .filter(|a| constant_time_eq(a.password.as_bytes(), password.as_bytes()))
            .map(|a| VerifiedAccount {
                role: a.role,
                display_name: a.display_name.clone(),
            })
            .ok_or(AuthRejection)
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn demo() -> StaticCredentials {
        StaticCredentials::new(AuthConfig::demo().accounts)
    }

    #[tokio::test]
    async fn test_demo_accounts() {
        let verifier = demo();
        assert_eq!(verifier.len(), 4);

        let account = verifier.verify("profesor", "admin").await.unwrap();
        assert_eq!(account.role, Role::Teacher);
        assert_eq!(account.display_name, "Profesor Demo");

        let account = verifier.verify("ampa", "ampa").await.unwrap();
        assert_eq!(account.role, Role::Ampa);

        let account = verifier.verify("padre", "1234").await.unwrap();
        assert_eq!(account.role, Role::Parent);

        let account = verifier.verify("alumno", "1234").await.unwrap();
        assert_eq!(account.role, Role::Student);
    }

    #[tokio::test]
    async fn test_username_is_case_insensitive() {
        let verifier = demo();
        let account = verifier.verify("PROFESOR", "admin").await.unwrap();
        assert_eq!(account.role, Role::Teacher);
    }

    #[tokio::test]
    async fn test_password_is_case_sensitive() {
        let verifier = demo();
        assert_eq!(verifier.verify("profesor", "ADMIN").await, Err(AuthRejection));
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let verifier = demo();
        let unknown = verifier.verify("nobody", "admin").await.unwrap_err();
        let wrong = verifier.verify("profesor", "nope").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_empty_verifier_rejects_everything() {
        let verifier = StaticCredentials::new(Vec::new());
        assert!(verifier.is_empty());
        assert!(verifier.verify("profesor", "admin").await.is_err());
        assert!(verifier.verify("", "").await.is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"1234", b"1234"));
        assert!(!constant_time_eq(b"1234", b"1235"));
        assert!(!constant_time_eq(b"1234", b"12345"));
    }
}
