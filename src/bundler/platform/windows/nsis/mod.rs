//! Windows NSIS installer creation.
//!
//! # Module Organization
//!
//! - `template` - NSI script template
//! - `script` - NSI script generation from the template
//! - `utils` - Version formatting and BOM-prefixed writes

mod script;
mod template;
mod utils;

pub use script::{generate_nsi_script, render_nsi_script};
pub use utils::format_version_for_nsis;

use crate::bundler::{
    error::Result,
    utils::process::{CommandRunner, argv, run_checked},
};
use std::path::Path;

/// Compiles `nsi_path` with `makensis`.
///
/// `makensis` changes into the script directory, so the installer lands
/// next to the script.
pub async fn run_makensis<R: CommandRunner>(runner: &R, nsi_path: &Path) -> Result<()> {
    log::info!("Running makensis...");
    let working_dir = nsi_path.parent().unwrap_or(Path::new("."));
    let command = argv([
        "makensis".to_string(),
        "-V4".to_string(),
        "-INPUTCHARSET".to_string(),
        "UTF8".to_string(),
        nsi_path.display().to_string(),
    ]);
    run_checked(runner, &command, working_dir).await?;
    Ok(())
}
