use std::path::Path;

use anyhow::Result;
use optimly_core::config::OptimlyConfig;

pub fn show(config: &OptimlyConfig, path: &Path) -> Result<()> {
    let source = if path.exists() { "file" } else { "defaults" };
    println!("# {} ({source})", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
