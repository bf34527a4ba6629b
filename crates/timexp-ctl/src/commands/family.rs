use anyhow::Result;
use timexp_daemon::Daemon;

use crate::auth::{read_password, Session};

pub async fn list(daemon: &Daemon) -> Result<()> {
    let session = Session::require()?;
    let children = daemon.family().list_children(&session.user_id).await?;

    println!("\n👨‍👩‍👧 Family of {}", session.handle);
    println!("═══════════════════════════════════════════════\n");
    if children.is_empty() {
        println!("No linked students yet. Add one with `timexp-ctl family add-child`.");
    }
    for child in children {
        println!("  - {} ({})  level {}  {} XP", child.name, child.handle, child.level, child.xp);
    }
    Ok(())
}

pub async fn add_child(daemon: &Daemon, handle: &str, name: &str) -> Result<()> {
    let session = Session::require()?;
    let password = read_password("Password for the new student: ")?;

    let child = daemon.family().create_child(&session.user_id, handle, name, &password).await?;

    println!("➕ Added {} ({}) to your family", child.name, child.handle);
    Ok(())
}
