//! `mailplate init`

use anyhow::{Context, Result};
use clap::Args;

use mailplate_core::config;
use mailplate_service::Mailplate;

/// Write default config and seed the protected template.
#[derive(Args, Debug)]
pub struct InitArgs {}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let home = crate::home()?;
        let app = Mailplate::init_at(&home).context("failed to initialise mailplate")?;

        println!("✓ Initialised mailplate");
        println!("  Config:    {}", config::config_path_at(&home).display());
        println!("  Templates: {}", app.config.templates_dir_at(&home).display());
        Ok(())
    }
}
