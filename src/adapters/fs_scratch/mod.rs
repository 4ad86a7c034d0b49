// Scratch filesystem adapter - Per-session temporary storage

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

/// Temporary storage for one session: the downloaded source and produced segments.
///
/// Everything underneath is removed when the value is dropped, on success and
/// failure alike.
#[derive(Debug)]
pub struct ScratchArea {
    root: TempDir,
    source_dir: PathBuf,
    output_dir: PathBuf,
}

impl ScratchArea {
    const SOURCE_DIR: &'static str = "source";
    const OUTPUT_DIR: &'static str = "output_videos";

    /// Create a scratch area under `parent`, or the system temp dir when `None`
    pub fn create(parent: Option<&Path>) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("splitx-");
        let root = match parent {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };

        let source_dir = root.path().join(Self::SOURCE_DIR);
        let output_dir = root.path().join(Self::OUTPUT_DIR);
        fs::create_dir_all(&source_dir)?;
        fs::create_dir_all(&output_dir)?;

        debug!("Created scratch area: {}", root.path().display());
        Ok(Self {
            root,
            source_dir,
            output_dir,
        })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Where acquired source media is stored
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Where segment outputs are written
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Remove the scratch area now, reporting any error instead of ignoring it
    pub fn close(self) -> std::io::Result<()> {
        let path = self.root.path().to_path_buf();
        match self.root.close() {
            Ok(()) => {
                debug!("Removed scratch area: {}", path.display());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to remove scratch area {}: {}", path.display(), e);
                Err(e)
            }
        }
    }
}

/// Copy `file` into `destination_dir`, keeping its base name
pub fn persist_file(file: &Path, destination_dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(destination_dir)?;
    let name = file.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("no file name in {}", file.display()),
        )
    })?;
    let target = destination_dir.join(name);
    fs::copy(file, &target)?;
    Ok(target)
}
