//! Layout inspector
//!
//! Restores a persisted layout with no content providers registered, so
//! every dock shows up as a placeholder, and prints or checks the result.

use anyhow::{bail, Context, Result};
use clap::Parser;

use dockyard::cli::{CliArgs, InspectMode};
use dockyard::config::DockConfig;
use dockyard::persist;
use dockyard::system::DockSystem;

fn main() -> Result<()> {
    dockyard::tracing::init();

    let config = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    let raw = persist::read_layout(&config.path)
        .with_context(|| format!("Failed to read layout {}", config.path.display()))?;
    let version = raw.version;

    let mut system: DockSystem<()> = DockSystem::new(DockConfig::load());
    let reports = system.restore(raw);

    match config.mode {
        InspectMode::Inspect => {
            println!("{} (version {})", config.path.display(), version);
            for window in system.windows() {
                println!();
                println!("window {}", window.id);
                print!("{}", window.tree().describe());
            }
        }
        InspectMode::Check => {
            let mut corrupt = 0;
            for (id, report) in &reports {
                println!(
                    "window {}: {} dock(s), {} dropped",
                    id,
                    report.restored,
                    report.dropped.len()
                );
                for err in &report.dropped {
                    println!("  {}", err);
                }
                corrupt += report.dropped.len();
            }
            if corrupt > 0 {
                bail!("{} corrupt record(s) in {}", corrupt, config.path.display());
            }
        }
    }

    Ok(())
}
