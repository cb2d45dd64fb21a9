use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("At least one target directory is required.")]
    NoTargets,

    #[error("Directory {} does not exist.", .0.display())]
    MissingDirectory(PathBuf),

    #[error("{} is a symbolic link.", .0.display())]
    SymlinkRoot(PathBuf),

    #[error("{} is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    #[error("Target directory {} is a subdirectory of {}, aborting.", child.display(), parent.display())]
    OverlappingTargets { child: PathBuf, parent: PathBuf },

    #[error("Target directory {} is a subdirectory of {}, aborting.", target.display(), read_only.display())]
    TargetWithinReadOnly { target: PathBuf, read_only: PathBuf },

    #[error("Read-only directory {} is inside target directory {}, aborting.", read_only.display(), target.display())]
    ReadOnlyWithinTarget { read_only: PathBuf, target: PathBuf },

    #[error("Cannot find a target directory owning {}", .0.display())]
    UnownedEntry(PathBuf),

    #[error("Directory {} was never registered for statistics", .0.display())]
    UnregisteredRoot(PathBuf),

    #[error("{} was already removed during this run", .0.display())]
    DoubleRemoval(PathBuf),
}

impl Error {
    /// True for errors detected by pre-flight validation, before anything is modified.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::NoTargets
                | Error::MissingDirectory(_)
                | Error::SymlinkRoot(_)
                | Error::NotADirectory(_)
                | Error::OverlappingTargets { .. }
                | Error::TargetWithinReadOnly { .. }
                | Error::ReadOnlyWithinTarget { .. }
        )
    }
}
