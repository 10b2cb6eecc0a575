//! Loading entity data files (TOML)
//!
//! ```toml
//! kind = "department"
//!
//! [[entities]]
//! code = "HQ"
//! name = "Headquarters"
//!
//! [[entities]]
//! code = "FIN"
//! name = "Finance"
//! parent_code = "HQ"
//! position = 0
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::RecordFile;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

pub struct RecordLoader {
    fs: Arc<dyn FileSystem>,
}

impl RecordLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn load(&self, path: &Path) -> InfraResult<RecordFile> {
        debug!("load: path={}", path.display());
        if !self.fs.exists(path) {
            return Err(InfraError::io(
                format!("data file not found: {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        let file: RecordFile = toml::from_str(&content).map_err(|e| InfraError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("load: {} entities", file.entities.len());
        Ok(file)
    }
}
