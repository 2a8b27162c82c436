use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub file_name: String,
    pub path: PathBuf,
}

impl Asset {
    pub fn identifier(&self) -> String {
        derive_identifier(&self.file_name)
    }
}

/// Lists the regular files in `dir`, sorted by file name.
pub fn enumerate(dir: &Path) -> Result<Vec<Asset>> {
    let read_error = |source: io::Error| Error::ReadAssetDir {
        path: dir.to_path_buf(),
        source,
    };
    let entries = fs::read_dir(dir).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Error::AssetDirNotFound {
            path: dir.to_path_buf(),
        },
        _ => read_error(source),
    })?;

    let mut assets = vec![];
    for entry in entries {
        let path = entry.map_err(read_error)?.path();
        if !path.is_file() {
            debug!("skipping {}: not a file", path.display());
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            warn!("skipping {}: file name is not valid UTF-8", path.display());
            continue;
        };
        assets.push(Asset {
            file_name: file_name.to_owned(),
            path,
        });
    }
    assets.sort_by(|a1, a2| a1.file_name.cmp(&a2.file_name));
    Ok(assets)
}

/// `arrow-left.svg` becomes `ArrowLeft`: everything before the first `.`,
/// split on `-`, first letter of each piece uppercased, pieces joined.
pub fn derive_identifier(file_name: &str) -> String {
    let base = file_name
        .split_once('.')
        .map_or(file_name, |(base, _extension)| base);
    base.split('-').map(capitalize).collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
