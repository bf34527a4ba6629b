use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use timexp_common::UserAccount;
use timexp_daemon::config::config_dir;

/// Non-interactive password source, checked before prompting.
pub const PASSWORD_ENV: &str = "TIMEXP_PASSWORD";

/// The account this device is logged in as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub handle: String,
}

impl Session {
    pub fn for_user(user: &UserAccount) -> Self {
        Self { user_id: user.id.clone(), handle: user.handle.clone() }
    }

    pub fn default_path() -> PathBuf {
        config_dir().join("session.json")
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {:?}", path))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {:?}", path))?;
        Ok(Some(session))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write session file: {:?}", path))
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).with_context(|| format!("Failed to remove session file: {:?}", path))?;
        Ok(true)
    }

    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&Self::default_path())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Current session, or an error telling the user to log in.
    pub fn require() -> Result<Self> {
        Self::load()?.context("Not logged in. Run `timexp-ctl login <handle>` first")
    }
}

/// Password from `TIMEXP_PASSWORD`, or read from the terminal without echo.
pub fn read_password(prompt: &str) -> Result<SecretString> {
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(value) if !value.is_empty() => value,
        _ => rpassword::prompt_password(prompt).context("Failed to read password")?,
    };

    if password.trim().is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    Ok(SecretString::from(password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_session_roundtrip_and_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timexp").join("session.json");

        assert_eq!(Session::load_from(&path).unwrap(), None);

        let session = Session { user_id: "u1".to_string(), handle: "alex".to_string() };
        session.save_to(&path).unwrap();
        assert_eq!(Session::load_from(&path).unwrap(), Some(session));

        assert!(Session::clear(&path).unwrap());
        assert!(!Session::clear(&path).unwrap());
        assert_eq!(Session::load_from(&path).unwrap(), None);
    }

    #[test]
    fn test_corrupt_session_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(Session::load_from(&path).is_err());
    }
}
