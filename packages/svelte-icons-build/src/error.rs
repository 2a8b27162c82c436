use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("template {} does not exist", .path.display())]
    MissingTemplate { path: PathBuf },

    #[error("could not read template {}", .path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("asset directory {} does not exist", .path.display())]
    AssetDirNotFound { path: PathBuf },

    #[error("could not list asset directory {}", .path.display())]
    ReadAssetDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read generated file {}", .path.display())]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("assets {first} and {second} both generate {identifier}")]
    IdentifierCollision {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("output for {asset} would overwrite the template {}", .path.display())]
    OutputIsTemplate { asset: String, path: PathBuf },

    #[error("could not read config file {}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}", .path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{name} not defined")]
    MissingEnv { name: &'static str },
}
