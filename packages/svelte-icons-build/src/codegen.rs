use std::{
    collections::{HashMap, HashSet, hash_map::Entry},
    fmt,
    fs::{self, File},
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    Error, Options, Result,
    assets::{self, Asset},
    template::Template,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Written,
    UpToDate,
    Missing,
    Stale,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Written => "written",
            Status::UpToDate => "up to date",
            Status::Missing => "missing",
            Status::Stale => "stale",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Generated {
    pub asset: Asset,
    pub identifier: String,
    pub path: PathBuf,
    pub status: Status,
}

#[derive(Debug, Default)]
pub struct Report {
    pub outputs: Vec<Generated>,
}

impl Report {
    pub fn is_up_to_date(&self) -> bool {
        self.out_of_date().next().is_none()
    }

    pub fn out_of_date(&self) -> impl Iterator<Item = &Generated> {
        self.outputs
            .iter()
            .filter(|o| matches!(o.status, Status::Missing | Status::Stale))
    }
}

struct Planned {
    asset: Asset,
    identifier: String,
    path: PathBuf,
}

impl Planned {
    fn finish(&self, status: Status) -> Generated {
        Generated {
            asset: self.asset.clone(),
            identifier: self.identifier.clone(),
            path: self.path.clone(),
            status,
        }
    }
}

/// A loaded template plus the list of outputs it will produce. Building one
/// reads the template and the asset directory but writes nothing.
pub struct Generator {
    template: Template,
    asset_url_prefix: String,
    planned: Vec<Planned>,
}

impl Generator {
    pub fn new(mut opts: Options) -> Result<Self> {
        let template = opts.load_template()?;
        Self::with_template(template, opts)
    }

    /// Lists the assets for an already loaded template.
    pub fn with_template(template: Template, mut opts: Options) -> Result<Self> {
        let assets = assets::enumerate(&opts.asset_dir_path())?;
        let planned = plan(
            assets,
            &opts.template_path(),
            &opts.output_dir_path(),
            opts.extension(),
        )?;
        Ok(Self {
            template,
            asset_url_prefix: opts.asset_url_prefix().to_owned(),
            planned,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Contents of the output for the asset called `file_name`.
    pub fn render(&self, file_name: &str) -> String {
        self.template.render(&asset_url_line(&self.asset_url_prefix, file_name))
    }

    /// Writes every output, stopping at the first failure. Files written
    /// before the failure are left in place.
    pub fn write(&self, mut on_output: impl FnMut(&Generated)) -> Result<Report> {
        let mut report = Report::default();
        for planned in &self.planned {
            let contents = self.render(&planned.asset.file_name);
            write_output(&planned.path, &contents)?;
            info!("{} -> {}", planned.asset.file_name, planned.path.display());
            let generated = planned.finish(Status::Written);
            on_output(&generated);
            report.outputs.push(generated);
        }
        Ok(report)
    }

    /// Compares every output with what is on disk without writing anything.
    pub fn check(&self, mut on_output: impl FnMut(&Generated)) -> Result<Report> {
        let mut report = Report::default();
        for planned in &self.planned {
            let contents = self.render(&planned.asset.file_name);
            let status = match fs::read(&planned.path) {
                Ok(existing) if existing == contents.as_bytes() => Status::UpToDate,
                Ok(_) => Status::Stale,
                Err(err) if err.kind() == io::ErrorKind::NotFound => Status::Missing,
                Err(source) => {
                    return Err(Error::ReadOutput {
                        path: planned.path.clone(),
                        source,
                    });
                }
            };
            debug!("{}: {status}", planned.path.display());
            let generated = planned.finish(status);
            on_output(&generated);
            report.outputs.push(generated);
        }
        Ok(report)
    }
}

/// The line that replaces the template's marker line.
pub fn asset_url_line(prefix: &str, file_name: &str) -> String {
    format!(
        "\tconst iconUrl = new URL(\"{}/{}\", import.meta.url);",
        prefix.trim_end_matches('/'),
        file_name
    )
}

fn plan(
    assets: Vec<Asset>,
    template_path: &Path,
    output_dir: &Path,
    extension: &str,
) -> Result<Vec<Planned>> {
    let template_path = resolve(template_path);
    let output_dir = resolve(output_dir);
    let candidates: Vec<(Asset, String, PathBuf)> = assets
        .into_iter()
        .map(|asset| {
            let identifier = asset.identifier();
            let path = output_dir.join(format!("{identifier}.{extension}"));
            (asset, identifier, path)
        })
        .collect();

    // Files this run writes, or reads as its template, are never assets.
    let generated: HashSet<&Path> = candidates
        .iter()
        .filter(|(_, identifier, _)| !identifier.is_empty())
        .map(|(_, _, path)| path.as_path())
        .collect();
    let skipped: HashSet<PathBuf> = candidates
        .iter()
        .map(|(asset, _, _)| resolve(&asset.path))
        .filter(|path| *path == template_path || generated.contains(path.as_path()))
        .collect();

    let mut claimed = HashMap::new();
    let mut planned = vec![];
    for (asset, identifier, path) in candidates {
        if skipped.contains(&resolve(&asset.path)) {
            debug!("skipping {}: generated by this run", asset.file_name);
            continue;
        }
        if identifier.is_empty() {
            warn!("skipping {}: no identifier in its name", asset.file_name);
            continue;
        }
        if path == template_path {
            return Err(Error::OutputIsTemplate {
                asset: asset.file_name,
                path,
            });
        }
        match claimed.entry(identifier.clone()) {
            Entry::Occupied(first) => {
                return Err(Error::IdentifierCollision {
                    identifier,
                    first: first.remove(),
                    second: asset.file_name,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(asset.file_name.clone());
            }
        }
        planned.push(Planned {
            asset,
            identifier,
            path,
        });
    }
    Ok(planned)
}

/// Canonical form of `path`, or of its parent for files not written yet.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(path) = fs::canonicalize(path) {
        return path;
    }
    match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) => match fs::canonicalize(dir) {
            Ok(dir) => dir.join(name),
            Err(_) => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    let write_error = |source: io::Error| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    let mut file = BufWriter::new(File::create(path).map_err(write_error)?);
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.flush().map_err(write_error)
}
