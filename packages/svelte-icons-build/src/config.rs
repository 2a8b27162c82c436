use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{Error, Result, template::Template};

pub const DEFAULT_CONFIG_FILE: &str = "icons.toml";
pub const DEFAULT_TEMPLATE: &str = "Icons-Template.svelte";
pub const DEFAULT_ASSET_DIR: &str = "../../assets";
pub const DEFAULT_MARKER: &str = "const iconUrl";
pub const DEFAULT_EXTENSION: &str = "svelte";
pub const DEFAULT_ASSET_URL_PREFIX: &str = "../../assets";

/// Where the generator reads from and writes to. Relative paths are resolved
/// against `input_dir`; nothing ever changes the process working directory.
#[derive(Debug)]
pub struct Options {
    input_dir: PathBuf,
    template: PathBuf,
    asset_dir: PathBuf,
    output_dir: Option<PathBuf>,
    marker: String,
    extension: String,
    asset_url_prefix: String,
    emit_cargo: bool,
    seen: HashSet<PathBuf>,
}

impl Options {
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            input_dir,
            template: PathBuf::from(DEFAULT_TEMPLATE),
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            output_dir: None,
            marker: DEFAULT_MARKER.to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
            asset_url_prefix: DEFAULT_ASSET_URL_PREFIX.to_owned(),
            emit_cargo: false,
            seen: HashSet::new(),
        }
    }

    /// Defaults for a build script: paths relative to the package manifest,
    /// with `cargo:rerun-if-changed` emitted for every input.
    pub fn cargo_defaults() -> Result<Self> {
        let manifest_dir = env::var_os("CARGO_MANIFEST_DIR").ok_or(Error::MissingEnv {
            name: "CARGO_MANIFEST_DIR",
        })?;
        Ok(Self::new(PathBuf::from(manifest_dir)).with_cargo(true))
    }

    pub fn with_input_dir(self, input_dir: PathBuf) -> Self {
        Self { input_dir, ..self }
    }

    pub fn with_template(self, template: PathBuf) -> Self {
        Self { template, ..self }
    }

    pub fn with_asset_dir(self, asset_dir: PathBuf) -> Self {
        Self { asset_dir, ..self }
    }

    /// Defaults to the template's directory.
    pub fn with_output_dir(self, output_dir: PathBuf) -> Self {
        Self {
            output_dir: Some(output_dir),
            ..self
        }
    }

    pub fn with_marker(self, marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ..self
        }
    }

    pub fn with_extension(self, extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ..self
        }
    }

    pub fn with_asset_url_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            asset_url_prefix: prefix.into(),
            ..self
        }
    }

    pub fn with_cargo(self, emit_cargo: bool) -> Self {
        Self { emit_cargo, ..self }
    }

    /// Applies a TOML config file. `path` and the paths inside the file are
    /// relative to the input dir and to the file's own directory respectively.
    pub fn load_config(mut self, path: &Path) -> Result<Self> {
        let full_path = self.input_path(path);
        let text = fs::read_to_string(&full_path).map_err(|source| Error::ReadConfig {
            path: full_path.clone(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&text).map_err(|source| Error::ParseConfig {
            path: full_path.clone(),
            source,
        })?;
        let dir = path.parent().unwrap_or(Path::new(""));
        Ok(raw.apply(self, dir))
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn asset_url_prefix(&self) -> &str {
        &self.asset_url_prefix
    }

    pub fn load_template(&mut self) -> Result<Template> {
        let path = self.template_path();
        Template::load(&path, &self.marker)
    }

    pub(crate) fn template_path(&mut self) -> PathBuf {
        self.input_path(&self.template.clone())
    }

    pub(crate) fn asset_dir_path(&mut self) -> PathBuf {
        self.input_path(&self.asset_dir.clone())
    }

    pub(crate) fn output_dir_path(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => self.input_dir.join(dir),
            None => {
                let template = self.input_dir.join(&self.template);
                template
                    .parent()
                    .map_or_else(|| self.input_dir.clone(), Path::to_path_buf)
            }
        }
    }

    fn input_path(&mut self, path: &Path) -> PathBuf {
        let result = self.input_dir.join(path);
        if let Some(directive) = self.rerun_if_changed(&result) {
            println!("{directive}");
        }
        result
    }

    /// The cargo directive for `path`, the first time it is seen.
    fn rerun_if_changed(&mut self, path: &Path) -> Option<String> {
        (self.emit_cargo && self.seen.insert(path.to_path_buf()))
            .then(|| format!("cargo:rerun-if-changed={}", path.display()))
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    template: Option<PathBuf>,
    asset_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    marker: Option<String>,
    extension: Option<String>,
    asset_url_prefix: Option<String>,
}

impl RawConfig {
    fn apply(self, opts: Options, dir: &Path) -> Options {
        Options {
            template: self.template.map_or(opts.template, |t| dir.join(t)),
            asset_dir: self.asset_dir.map_or(opts.asset_dir, |a| dir.join(a)),
            output_dir: self.output_dir.map(|o| dir.join(o)).or(opts.output_dir),
            marker: self.marker.unwrap_or(opts.marker),
            extension: self.extension.unwrap_or(opts.extension),
            asset_url_prefix: self.asset_url_prefix.unwrap_or(opts.asset_url_prefix),
            ..opts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_icon_layout() {
        let mut opts = Options::new(PathBuf::from("client/src/components/Icons"));
        assert_eq!(
            opts.template_path(),
            Path::new("client/src/components/Icons/Icons-Template.svelte")
        );
        assert_eq!(
            opts.asset_dir_path(),
            Path::new("client/src/components/Icons/../../assets")
        );
        assert_eq!(opts.output_dir_path(), Path::new("client/src/components/Icons"));
        assert_eq!(opts.marker(), "const iconUrl");
        assert_eq!(opts.extension(), "svelte");
        assert_eq!(opts.asset_url_prefix(), "../../assets");
    }

    #[test]
    fn output_dir_follows_template() {
        let opts = Options::new(PathBuf::from("/project"))
            .with_template(PathBuf::from("templates/Icon.svelte"));
        assert_eq!(opts.output_dir_path(), Path::new("/project/templates"));

        let opts = opts.with_output_dir(PathBuf::from("generated"));
        assert_eq!(opts.output_dir_path(), Path::new("/project/generated"));
    }

    #[test]
    fn config_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("icons")).unwrap();
        fs::write(
            dir.path().join("icons/icons.toml"),
            "template = \"Base.svelte\"\nasset_dir = \"../static/icons\"\nextension = \"tsx\"\n",
        )
        .unwrap();

        let mut opts = Options::new(dir.path().to_path_buf())
            .load_config(Path::new("icons/icons.toml"))
            .unwrap();
        assert_eq!(opts.template_path(), dir.path().join("icons/Base.svelte"));
        assert_eq!(opts.asset_dir_path(), dir.path().join("icons/../static/icons"));
        assert_eq!(opts.output_dir_path(), dir.path().join("icons"));
        assert_eq!(opts.extension(), "tsx");
        assert_eq!(opts.marker(), DEFAULT_MARKER);
    }

    #[test]
    fn config_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("icons.toml"), "templat = \"typo.svelte\"\n").unwrap();
        let err = Options::new(dir.path().to_path_buf())
            .load_config(Path::new(DEFAULT_CONFIG_FILE))
            .unwrap_err();
        assert!(matches!(err, Error::ParseConfig { .. }));
    }

    #[test]
    fn missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Options::new(dir.path().to_path_buf())
            .load_config(Path::new(DEFAULT_CONFIG_FILE))
            .unwrap_err();
        assert!(matches!(err, Error::ReadConfig { .. }));
    }

    #[test]
    fn cargo_defaults_use_manifest_dir() {
        let mut opts = Options::cargo_defaults().unwrap();
        assert_eq!(
            opts.template_path(),
            Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_TEMPLATE)
        );
    }

    #[test]
    fn rerun_directive_once_per_path() {
        let mut opts = Options::new(PathBuf::from("/project")).with_cargo(true);
        let template = opts.template_path();
        assert_eq!(opts.template_path(), template);
        opts.asset_dir_path();
        opts.asset_dir_path();
        assert_eq!(opts.seen.len(), 2);

        assert_eq!(opts.rerun_if_changed(&template), None);
        assert_eq!(
            opts.rerun_if_changed(Path::new("/project/icons.toml")).as_deref(),
            Some("cargo:rerun-if-changed=/project/icons.toml")
        );
        assert_eq!(opts.rerun_if_changed(Path::new("/project/icons.toml")), None);
    }

    #[test]
    fn no_rerun_directives_outside_cargo() {
        let mut opts = Options::new(PathBuf::from("/project"));
        opts.template_path();
        assert!(opts.seen.is_empty());
        assert_eq!(opts.rerun_if_changed(Path::new("/project/icons.toml")), None);
    }
}
