use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use timexp_common::security::PasswordManager;
use timexp_common::{Error, Result, Store, UserAccount, UserRole};
use tracing::info;

use crate::account_manager::AccountManager;

/// What a parent sees about each linked student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildSummary {
    pub id: String,
    pub handle: String,
    pub name: String,
    pub xp: u64,
    pub level: u64,
}

impl From<&UserAccount> for ChildSummary {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id.clone(),
            handle: user.handle.clone(),
            name: user.name.clone(),
            xp: user.xp,
            level: user.level(),
        }
    }
}

#[derive(Clone)]
pub struct FamilyManager {
    store: Arc<dyn Store>,
    accounts: AccountManager,
}

impl FamilyManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { accounts: AccountManager::new(store.clone()), store }
    }

    /// Create a student linked to `parent_id`, with an empty week and no XP.
    pub async fn create_child(
        &self,
        parent_id: &str,
        handle: &str,
        name: &str,
        password: &SecretString,
    ) -> Result<UserAccount> {
        let parent = self.parent(parent_id).await?;
        let handle = self.accounts.claim_handle(handle).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Name must not be empty".to_string()));
        }

        let mut child = UserAccount::new(&handle, name, UserRole::Student);
        child.parent_id = Some(parent.id.clone());
        child.password_hash = Some(PasswordManager::hash_password(password)?);

        self.store.save_user(&child).await?;
        info!("{} added child account {}", parent.handle, child.handle);
        Ok(child)
    }

    pub async fn list_children(&self, parent_id: &str) -> Result<Vec<ChildSummary>> {
        let parent = self.parent(parent_id).await?;
        let children = self.store.get_children(&parent.id).await?;
        Ok(children.iter().map(ChildSummary::from).collect())
    }

    async fn parent(&self, parent_id: &str) -> Result<UserAccount> {
        let parent = self.accounts.profile(parent_id).await?;
        if !parent.is_parent() {
            return Err(Error::InvalidInput(format!("{} is not a parent account", parent.handle)));
        }
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timexp_common::{MemoryStore, UserStore};

    fn password() -> SecretString {
        SecretString::from("kidpass".to_string())
    }

    async fn setup() -> (FamilyManager, UserAccount) {
        let store = Arc::new(MemoryStore::new());
        let parent = UserAccount::new("mentor", "Mentor", UserRole::Parent);
        store.save_user(&parent).await.unwrap();
        (FamilyManager::new(store), parent)
    }

    #[tokio::test]
    async fn test_create_and_list_children() {
        let (family, parent) = setup().await;

        let child = family.create_child(&parent.id, "Kid", "Kid", &password()).await.unwrap();
        assert_eq!(child.parent_id.as_deref(), Some(parent.id.as_str()));
        assert_eq!(child.xp, 0);
        assert_eq!(child.weekly_schedule.iter().count(), 7);

        let children = family.list_children(&parent.id).await.unwrap();
        assert_eq!(
            children,
            vec![ChildSummary {
                id: child.id,
                handle: "kid".to_string(),
                name: "Kid".to_string(),
                xp: 0,
                level: 1,
            }]
        );
    }

    #[tokio::test]
    async fn test_student_cannot_add_children() {
        let (family, parent) = setup().await;
        let child = family.create_child(&parent.id, "kid", "Kid", &password()).await.unwrap();

        let result = family.create_child(&child.id, "other", "Other", &password()).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_child_handle_must_be_unique() {
        let (family, parent) = setup().await;

        let result = family.create_child(&parent.id, "mentor", "Copy", &password()).await;
        assert!(matches!(result, Err(Error::Duplicate(_))));
    }
}
