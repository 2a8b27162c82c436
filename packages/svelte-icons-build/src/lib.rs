mod assets;
mod codegen;
mod config;
mod error;
mod template;

pub use assets::{Asset, derive_identifier, enumerate};
pub use codegen::{Generated, Generator, Report, Status, asset_url_line};
pub use config::{DEFAULT_CONFIG_FILE, Options};
pub use error::{Error, Result};
pub use template::Template;

/// Writes one component per asset. Meant to be called from a build script:
///
/// ```no_run
/// let opts = svelte_icons_build::Options::cargo_defaults()?;
/// svelte_icons_build::generate(opts)?;
/// # Ok::<(), svelte_icons_build::Error>(())
/// ```
pub fn generate(opts: Options) -> Result<Report> {
    Generator::new(opts)?.write(|_| {})
}

pub fn check(opts: Options) -> Result<Report> {
    Generator::new(opts)?.check(|_| {})
}
