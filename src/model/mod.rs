use thiserror::Error;

pub mod build;
pub mod coordinates;
pub mod dependency;
pub mod project;

pub use coordinates::Coordinates;
pub use dependency::{Checksum, DependencyKey, DependencyRecord, ExclusionRule, Fingerprint};
pub use project::ModuleProjectInfo;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading build model: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Module id `{0}` is not of the form group:artifact:version")]
    InvalidModuleId(String),
    #[error("Root module `{0}` is not part of the build")]
    UnknownRoot(String),
    #[error("Build model does not contain any module")]
    NoModules,
}
