//! `browsers` command: show which browsers are registered and which
//! profiles each one resolves to on this machine.

use anyhow::Result;
use browser_history_browser::Registry;

/// List every registered browser with its discovered profiles
pub fn list(registry: &Registry) -> Result<()> {
    println!("Registered browsers:");
    println!();

    for browser in registry.iter() {
        let base_dir = match browser.base_dir() {
            Ok(dir) => dir.display().to_string(),
            Err(err) => {
                println!("  {:<10} {:<9} {}", browser.name(), browser.family().as_str(), err);
                continue;
            }
        };

        println!("  {:<10} {:<9} {}", browser.name(), browser.family().as_str(), base_dir);

        match browser.history_paths() {
            Ok(profiles) if profiles.is_empty() => println!("      (no profiles)"),
            Ok(profiles) => {
                for profile in profiles {
                    println!(
                        "      {:<24} {}",
                        profile.label(),
                        profile.history_file.display()
                    );
                }
            }
            Err(err) => {
                tracing::debug!("Profile discovery for {} failed: {}", browser.name(), err);
                println!("      ⚠️  {}", err);
            }
        }
    }

    Ok(())
}
