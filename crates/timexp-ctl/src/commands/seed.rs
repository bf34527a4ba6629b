use anyhow::{Context, Result};
use chrono::Local;
use timexp_common::GradeLevel;
use timexp_daemon::demo::{seed_demo, DEMO_DAYS, DEMO_PASSWORD};
use timexp_daemon::Daemon;

pub async fn demo(daemon: &Daemon, grade: &str, specific_grade: u8) -> Result<()> {
    let level = GradeLevel::parse(grade).with_context(|| format!("Unknown grade level '{}'", grade))?;

    let accounts = seed_demo(daemon.store(), level, specific_grade, Local::now().date_naive()).await?;

    println!("🌱 Seeded demo data ({} days of logs)", DEMO_DAYS);
    println!("   Parent:  {} / {}", accounts.parent.handle, DEMO_PASSWORD);
    println!("   Student: {} / {}", accounts.student.handle, DEMO_PASSWORD);
    Ok(())
}
