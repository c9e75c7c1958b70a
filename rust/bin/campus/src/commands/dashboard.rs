//! Request and security-log commands.

use std::path::Path;

use anyhow::Result;

use campus_core::PortalConfig;
use portal::handlers::dashboard::Dashboard;
use portal::model::RequestKind;
use portal::render;
use portal::Portal;

use super::report;

pub fn submit(
    portal: &Portal,
    dev_mode: bool,
    kind: RequestKind,
    purpose: &str,
    description: &str,
) -> Result<()> {
    report(Dashboard::new(portal, dev_mode).submit(kind, purpose, description)?)
}

pub fn list(portal: &Portal, json_output: bool) -> Result<()> {
    let requests = portal.requests.list()?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&requests)?);
    } else {
        print!("{}", render::requests_table(&requests));
        if requests.is_empty() {
            println!();
        }
    }
    Ok(())
}

pub fn approve(portal: &Portal, dev_mode: bool, id: &str) -> Result<()> {
    report(Dashboard::new(portal, dev_mode).approve(id)?)
}

pub fn reject(portal: &Portal, dev_mode: bool, id: &str, reason: Option<&str>) -> Result<()> {
    report(Dashboard::new(portal, dev_mode).reject(id, reason)?)
}

pub fn logout(portal: &Portal, dev_mode: bool) -> Result<()> {
    report(Dashboard::new(portal, dev_mode).logout()?)
}

/// Persist the dev-controls flag in the config file.
pub fn set_dev_mode(config_path: &Path, on: bool) -> Result<()> {
    let mut config = PortalConfig::load(config_path)?;
    config.dev_mode = on;
    config.save(config_path)?;

    let label = if on { "On" } else { "Off" };
    println!("Dev Controls: {label}");
    Ok(())
}

pub fn logs(portal: &Portal, limit: Option<usize>, json_output: bool) -> Result<()> {
    let mut entries = portal.security_log.entries()?;
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No security events.");
        return Ok(());
    }
    println!("{:<24} {:<32} {:<16} DETAILS", "TIMESTAMP", "EVENT", "PAGE");
    for e in &entries {
        println!(
            "{:<24} {:<32} {:<16} {}",
            e.timestamp, e.event_type, e.page, e.details
        );
    }
    Ok(())
}
