use anyhow::Result;
use std::path::Path;

use crate::config::loader::write_baseline;

pub fn init_config(path: &Path, force: bool) -> Result<()> {
    write_baseline(path, force)?;
    println!("Created {} with the baseline configuration", path.display());
    Ok(())
}
