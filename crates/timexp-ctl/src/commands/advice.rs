use anyhow::Result;
use timexp_daemon::{AdviceGenerator, Daemon};

use crate::auth::Session;

pub async fn show(daemon: &Daemon) -> Result<()> {
    let session = Session::require()?;
    let schedule = daemon.schedules().schedule(&session.user_id).await?;

    println!("🛰️  Requesting tactical intel...");
    let advice = daemon.advice().get_advice(&schedule).await;

    println!("\n{}", advice);
    Ok(())
}
