use anyhow::{Context, Result};
use timexp_common::xp::xp_to_next_level;
use timexp_common::{GradeLevel, UserRole};
use timexp_daemon::{Daemon, Registration};

use crate::auth::{read_password, Session};

pub async fn register(
    daemon: &Daemon,
    handle: &str,
    name: &str,
    role: &str,
    grade: Option<&str>,
    specific_grade: Option<u8>,
) -> Result<()> {
    let role = UserRole::parse(role).with_context(|| format!("Unknown role '{}'", role))?;
    let grade = grade
        .map(|g| GradeLevel::parse(g).with_context(|| format!("Unknown grade level '{}'", g)))
        .transpose()?;
    let password = read_password("Choose a password: ")?;

    let user = daemon
        .accounts()
        .register(Registration {
            handle: handle.to_string(),
            name: name.to_string(),
            password,
            role,
            grade,
            specific_grade,
        })
        .await?;

    Session::for_user(&user).save()?;

    println!("🚀 Registered {} as {} ({})", user.name, user.handle, user.role.as_str());
    if let Some(grade) = user.grade {
        println!("   Grade: {} {}", grade.as_str(), user.specific_grade.unwrap_or_default());
        println!("   Starting XP: {}", user.xp);
    }
    println!("   Logged in.");
    Ok(())
}

pub async fn login(daemon: &Daemon, handle: &str) -> Result<()> {
    let password = read_password("Password: ")?;
    let user = daemon.accounts().login(handle, &password).await?;

    Session::for_user(&user).save()?;
    println!("👋 Welcome back, {}!", user.name);
    Ok(())
}

pub fn logout() -> Result<()> {
    if Session::clear(&Session::default_path())? {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub async fn whoami(daemon: &Daemon) -> Result<()> {
    let session = Session::require()?;
    let user = daemon.accounts().profile(&session.user_id).await?;

    println!("\n🧑‍🚀 {} ({})", user.name, user.handle);
    println!("═══════════════════════════════════════════════\n");
    println!("Role:   {}", user.role.as_str());
    if let Some(grade) = user.grade {
        println!("Grade:  {} {}", grade.as_str(), user.specific_grade.unwrap_or_default());
    }
    println!("XP:     {}", user.xp);
    println!("Level:  {} ({} XP to next level)", user.level(), xp_to_next_level(user.xp));
    Ok(())
}

pub async fn delete_account(daemon: &Daemon, confirmed: bool) -> Result<()> {
    let session = Session::require()?;
    if !confirmed {
        anyhow::bail!("Refusing to delete {} without --yes", session.handle);
    }

    daemon.accounts().delete_account(&session.user_id).await?;
    Session::clear(&Session::default_path())?;

    println!("🗑️  Deleted account {} and all of its logs.", session.handle);
    Ok(())
}
