use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{HandfontError, HandfontResult};

/// A fresh output directory per request, so concurrent runs never share files.
///
/// Layout: `<root>/<uuid>/letters/` for crops and `<root>/<uuid>/svg/` for outlines.
#[derive(Debug, Clone)]
pub struct OutputArena {
    id: Uuid,
    dir: PathBuf,
}

impl OutputArena {
    pub fn create(root: &Path) -> HandfontResult<Self> {
        let id = Uuid::new_v4();
        let dir = root.join(id.to_string());
        for sub in [dir.join("letters"), dir.join("svg")] {
            std::fs::create_dir_all(&sub)
                .map_err(|e| HandfontError::io("creating output arena", &sub, e))?;
        }
        Ok(Self { id, dir })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn letters_dir(&self) -> PathBuf {
        self.dir.join("letters")
    }

    pub fn svg_dir(&self) -> PathBuf {
        self.dir.join("svg")
    }
}
