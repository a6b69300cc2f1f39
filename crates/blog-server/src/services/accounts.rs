//! Account service: registration and login against the `users` table

use crate::config::AccountMode;
use crate::error::{AppError, Result};
use crate::password::PasswordScheme;
use crate::storage::{StorageError, UserStore};
use blog_types::{Credentials, User};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Matched an existing account
    Existing { email: String },
    /// No account existed and one was created (auto-register mode only)
    Created { email: String },
}

pub struct AccountService {
    users: Arc<dyn UserStore>,
    passwords: Box<dyn PasswordScheme>,
    mode: AccountMode,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: Box<dyn PasswordScheme>,
        mode: AccountMode,
    ) -> Self {
        Self {
            users,
            passwords,
            mode,
        }
    }

    pub fn mode(&self) -> AccountMode {
        self.mode
    }

    pub async fn register(&self, creds: &Credentials) -> Result<()> {
        let existing = self
            .users
            .find_user_by_email(&creds.email)
            .await
            .map_err(AppError::storage("Database error"))?;
        if existing.is_some() {
            return Err(AppError::EmailTaken);
        }

        self.create(creds, "Registration failed").await?;
        info!("Registered account: {}", creds.email);
        Ok(())
    }

    pub async fn login(&self, creds: &Credentials) -> Result<LoginOutcome> {
        let user = self
            .users
            .find_user_by_email(&creds.email)
            .await
            .map_err(AppError::storage("Database error"))?;

        match (user, self.mode) {
            (Some(user), _) => self.check_password(creds, &user),
            (None, AccountMode::Strict) => {
                debug!("Unknown account: {}", creds.email);
                Err(AppError::InvalidCredentials)
            }
            (None, AccountMode::AutoRegister) => {
                let stored = self.passwords.hash(&creds.password);
                match self.users.insert_user(&creds.email, &stored).await {
                    Ok(_) => {
                        info!("Auto-registered account on login: {}", creds.email);
                        Ok(LoginOutcome::Created {
                            email: creds.email.clone(),
                        })
                    }
                    // A concurrent first login created it; treat as an existing account
                    Err(StorageError::Duplicate(_)) => {
                        let user = self
                            .users
                            .find_user_by_email(&creds.email)
                            .await
                            .map_err(AppError::storage("Database error"))?
                            .ok_or(AppError::InvalidCredentials)?;
                        self.check_password(creds, &user)
                    }
                    Err(e) => Err(AppError::storage("Registration failed")(e)),
                }
            }
        }
    }

    fn check_password(&self, creds: &Credentials, user: &User) -> Result<LoginOutcome> {
        if self.passwords.verify(&creds.password, &user.password) {
            Ok(LoginOutcome::Existing {
                email: user.email.clone(),
            })
        } else {
            debug!("Password mismatch for: {}", creds.email);
            Err(AppError::InvalidCredentials)
        }
    }

    async fn create(&self, creds: &Credentials, context: &'static str) -> Result<i64> {
        let stored = self.passwords.hash(&creds.password);
        match self.users.insert_user(&creds.email, &stored).await {
            Ok(id) => Ok(id),
            // Lost a race with a concurrent registration of the same email
            Err(StorageError::Duplicate(_)) => Err(AppError::EmailTaken),
            Err(e) => Err(AppError::storage(context)(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::Plaintext;
    use crate::storage::{self, MemoryStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Misses the first lookup, then loses the insert to another login that
    /// registers the same email with `winner_password`.
    struct ConcurrentFirstLogin {
        inner: MemoryStore,
        winner_password: &'static str,
        raced: AtomicBool,
    }

    #[async_trait]
    impl UserStore for ConcurrentFirstLogin {
        async fn find_user_by_email(&self, email: &str) -> storage::Result<Option<User>> {
            if !self.raced.load(Ordering::SeqCst) {
                return Ok(None);
            }
            self.inner.find_user_by_email(email).await
        }

        async fn insert_user(&self, email: &str, _password: &str) -> storage::Result<i64> {
            self.inner.insert_user(email, self.winner_password).await?;
            self.raced.store(true, Ordering::SeqCst);
            Err(StorageError::Duplicate(email.to_string()))
        }
    }

    fn racing_service(winner_password: &'static str) -> AccountService {
        let store = ConcurrentFirstLogin {
            inner: MemoryStore::new(),
            winner_password,
            raced: AtomicBool::new(false),
        };
        AccountService::new(Arc::new(store), Box::new(Plaintext), AccountMode::AutoRegister)
    }

    fn service(mode: AccountMode) -> (AccountService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = AccountService::new(store.clone(), Box::new(Plaintext), mode);
        (service, store)
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let (accounts, _) = service(AccountMode::Strict);
        let creds = Credentials::new("a@example.com", "pw");

        accounts.register(&creds).await.unwrap();
        let err = accounts.register(&creds).await.unwrap_err();
        assert!(matches!(err, AppError::EmailTaken));
    }

    #[tokio::test]
    async fn test_strict_login() {
        let (accounts, _) = service(AccountMode::Strict);
        accounts
            .register(&Credentials::new("a@example.com", "pw"))
            .await
            .unwrap();

        let outcome = accounts
            .login(&Credentials::new("a@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            LoginOutcome::Existing {
                email: "a@example.com".to_string()
            }
        );

        assert!(matches!(
            accounts
                .login(&Credentials::new("a@example.com", "wrong"))
                .await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts
                .login(&Credentials::new("nobody@example.com", "pw"))
                .await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_strict_login_never_creates_account() {
        let (accounts, store) = service(AccountMode::Strict);
        let _ = accounts
            .login(&Credentials::new("ghost@example.com", "pw"))
            .await;
        assert!(store
            .find_user_by_email("ghost@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_account_untouched() {
        let (accounts, store) = service(AccountMode::AutoRegister);
        accounts
            .login(&Credentials::new("a@example.com", "original"))
            .await
            .unwrap();

        let err = accounts
            .login(&Credentials::new("a@example.com", "changed"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let user = store
            .find_user_by_email("a@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.password, "original");
    }

    #[tokio::test]
    async fn test_auto_register_creates_then_matches() {
        let (accounts, _) = service(AccountMode::AutoRegister);
        let creds = Credentials::new("new@example.com", "pw");

        assert_eq!(
            accounts.login(&creds).await.unwrap(),
            LoginOutcome::Created {
                email: "new@example.com".to_string()
            }
        );
        assert_eq!(
            accounts.login(&creds).await.unwrap(),
            LoginOutcome::Existing {
                email: "new@example.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_auto_register_race_logs_in_existing_account() {
        let accounts = racing_service("pw");
        let outcome = accounts
            .login(&Credentials::new("same@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            LoginOutcome::Existing {
                email: "same@example.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_auto_register_race_checks_password() {
        let accounts = racing_service("first");
        let err = accounts
            .login(&Credentials::new("same@example.com", "second"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
