use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use svelte_icons_build::{DEFAULT_CONFIG_FILE, Options};

#[derive(Parser)]
#[command(name = "svelte-icons")]
#[command(about = "Generate one Svelte icon component per asset file", long_about = None)]
pub struct Cli {
    /// Directory every other path is resolved against
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Config file (default: icons.toml in --dir, when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Template file
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Directory holding the icon assets
    #[arg(long = "assets")]
    pub asset_dir: Option<PathBuf>,

    /// Output directory (default: the template's directory)
    #[arg(long = "out")]
    pub output_dir: Option<PathBuf>,

    /// Text identifying the template line to replace
    #[arg(long)]
    pub marker: Option<String>,

    /// Extension of the generated files
    #[arg(long)]
    pub extension: Option<String>,

    /// Path prefix written in front of each asset name
    #[arg(long)]
    pub url_prefix: Option<String>,

    /// Fail if any generated file is missing or out of date, without writing
    #[arg(long)]
    pub check: bool,

    /// Do not echo the template and identifiers
    #[arg(long, short)]
    pub quiet: bool,
}

impl Cli {
    pub fn options(&self) -> Result<Options> {
        let mut opts = Options::new(self.dir.clone());

        let config = self.config.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            self.dir.join(&default).is_file().then_some(default)
        });
        if let Some(config) = config {
            opts = opts
                .load_config(&config)
                .with_context(|| format!("could not load {}", config.display()))?;
        }

        if let Some(template) = &self.template {
            opts = opts.with_template(template.clone());
        }
        if let Some(asset_dir) = &self.asset_dir {
            opts = opts.with_asset_dir(asset_dir.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            opts = opts.with_output_dir(output_dir.clone());
        }
        if let Some(marker) = &self.marker {
            opts = opts.with_marker(marker);
        }
        if let Some(extension) = &self.extension {
            opts = opts.with_extension(extension);
        }
        if let Some(prefix) = &self.url_prefix {
            opts = opts.with_asset_url_prefix(prefix);
        }
        Ok(opts)
    }
}
