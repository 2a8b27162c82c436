mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{error, info};
use svelte_icons_build::{Generated, Generator};

use crate::cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut opts = cli.options()?;
    let template = opts.load_template().context("could not load template")?;
    if !cli.quiet {
        print!("{template}");
    }
    let generator =
        Generator::with_template(template, opts).context("could not prepare icon generation")?;
    let echo = |generated: &Generated| {
        if !cli.quiet {
            println!("{}", generated.identifier);
        }
    };

    if cli.check {
        let report = generator.check(echo)?;
        let stale: Vec<&Generated> = report.out_of_date().collect();
        for generated in &stale {
            error!("{} is {}", generated.path.display(), generated.status);
        }
        if !stale.is_empty() {
            bail!("{} icon component(s) out of date", stale.len());
        }
        info!("{} icon component(s) up to date", report.outputs.len());
    } else {
        let report = generator
            .write(echo)
            .context("could not write icon components")?;
        info!("generated {} icon component(s)", report.outputs.len());
    }

    Ok(())
}
