use std::sync::Arc;

use secrecy::SecretString;
use timexp_common::security::PasswordManager;
use timexp_common::templates::grade_template;
use timexp_common::{normalize_handle, Error, GradeLevel, Result, Store, UserAccount, UserRole};
use tracing::{info, warn};

/// Sign-up form contents.
#[derive(Debug)]
pub struct Registration {
    pub handle: String,
    pub name: String,
    pub password: SecretString,
    pub role: UserRole,
    pub grade: Option<GradeLevel>,
    pub specific_grade: Option<u8>,
}

/// Grade number assumed when a student registers without one.
pub fn default_specific_grade(level: GradeLevel) -> u8 {
    match level {
        GradeLevel::Elementary => 3,
        GradeLevel::Middle => 7,
        GradeLevel::High => 10,
        GradeLevel::University => 1,
    }
}

#[derive(Clone)]
pub struct AccountManager {
    store: Arc<dyn Store>,
}

impl AccountManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create an account. Students start from their grade's template and XP;
    /// parents start with an empty week.
    pub async fn register(&self, registration: Registration) -> Result<UserAccount> {
        let handle = self.claim_handle(&registration.handle).await?;
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Name must not be empty".to_string()));
        }

        let mut user = UserAccount::new(&handle, name, registration.role);
        user.password_hash = Some(PasswordManager::hash_password(&registration.password)?);
        user.onboarding_completed = true;

        if registration.role == UserRole::Student {
            let level = registration.grade.unwrap_or(GradeLevel::Elementary);
            let grade = registration.specific_grade.unwrap_or_else(|| default_specific_grade(level));
            let template = grade_template(level, grade);

            user.grade = Some(level);
            user.specific_grade = Some(grade);
            user.xp = template.xp;
            user.weekly_schedule = template.schedule;
            info!("Registering {} as {} ({})", handle, template.name, level.as_str());
        }

        self.store.save_user(&user).await?;
        info!("Registered {} account {}", user.role.as_str(), user.handle);
        Ok(user)
    }

    /// Check the password for `handle`. Unknown handles and wrong passwords fail the same way.
    pub async fn login(&self, handle: &str, password: &SecretString) -> Result<UserAccount> {
        let denied = || Error::Auth("Invalid ID or password".to_string());

        let user = self.store.get_user_by_handle(handle).await?.ok_or_else(denied)?;
        let hash = user.password_hash.as_deref().ok_or_else(denied)?;

        if !PasswordManager::verify_password(password, hash)? {
            warn!("Failed login for {}", user.handle);
            return Err(denied());
        }

        info!("{} logged in", user.handle);
        Ok(user)
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserAccount> {
        self.store
            .get_user_profile(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }

    /// Delete the account and all of its daily logs.
    pub async fn delete_account(&self, user_id: &str) -> Result<()> {
        let user = self.profile(user_id).await?;
        self.store.delete_user(&user.id).await?;

        info!("Deleted account {}", user.handle);
        Ok(())
    }

    /// Normalized handle, if it is non-empty and not in use.
    pub(crate) async fn claim_handle(&self, handle: &str) -> Result<String> {
        let handle = normalize_handle(handle);
        if handle.is_empty() {
            return Err(Error::InvalidInput("ID must not be empty".to_string()));
        }
        if self.store.get_user_by_handle(&handle).await?.is_some() {
            return Err(Error::Duplicate("ID already taken".to_string()));
        }
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use timexp_common::{DailyLog, LogStore, MemoryStore};

    fn registration(handle: &str, role: UserRole) -> Registration {
        Registration {
            handle: handle.to_string(),
            name: "Alex".to_string(),
            password: SecretString::from("hunter22".to_string()),
            role,
            grade: Some(GradeLevel::Middle),
            specific_grade: None,
        }
    }

    #[tokio::test]
    async fn test_register_student_uses_grade_template() {
        let accounts = AccountManager::new(Arc::new(MemoryStore::new()));

        let user = accounts.register(registration("  Alex ", UserRole::Student)).await.unwrap();

        assert_eq!(user.handle, "alex");
        assert_eq!(user.xp, 1500);
        assert_eq!(user.specific_grade, Some(7));
        assert!(!user.weekly_schedule.day("Monday").is_empty());
        assert_ne!(user.password_hash.as_deref(), Some("hunter22"));
    }

    #[tokio::test]
    async fn test_register_parent_starts_empty() {
        let accounts = AccountManager::new(Arc::new(MemoryStore::new()));

        let user = accounts.register(registration("mentor", UserRole::Parent)).await.unwrap();

        assert_eq!(user.xp, 0);
        assert_eq!(user.grade, None);
        assert_eq!(user.weekly_schedule.iter().count(), 7);
        assert!(user.weekly_schedule.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_handle() {
        let accounts = AccountManager::new(Arc::new(MemoryStore::new()));
        accounts.register(registration("alex", UserRole::Student)).await.unwrap();

        let result = accounts.register(registration("ALEX", UserRole::Parent)).await;
        assert!(matches!(result, Err(Error::Duplicate(msg)) if msg == "ID already taken"));
    }

    #[tokio::test]
    async fn test_login() {
        let accounts = AccountManager::new(Arc::new(MemoryStore::new()));
        let user = accounts.register(registration("alex", UserRole::Student)).await.unwrap();

        let logged_in =
            accounts.login("Alex", &SecretString::from("hunter22".to_string())).await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let wrong = accounts.login("alex", &SecretString::from("nope".to_string())).await;
        assert!(matches!(wrong, Err(Error::Auth(_))));

        let unknown = accounts.login("ghost", &SecretString::from("hunter22".to_string())).await;
        assert!(matches!(unknown, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn test_delete_account_removes_logs() {
        let store = Arc::new(MemoryStore::new());
        let accounts = AccountManager::new(store.clone());
        let user = accounts.register(registration("alex", UserRole::Student)).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        store.save_daily_log(&DailyLog::new(&user.id, date, &[])).await.unwrap();

        accounts.delete_account(&user.id).await.unwrap();

        assert!(store.get_daily_logs(&user.id).await.unwrap().is_empty());
        assert!(matches!(accounts.profile(&user.id).await, Err(Error::NotFound(_))));
    }
}
