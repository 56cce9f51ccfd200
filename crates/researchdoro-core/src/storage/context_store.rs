//! JSON persistence for the research context (`<data_dir>/context.json`).

use std::path::{Path, PathBuf};

use super::data_dir;
use crate::ai::ResearchContext;
use crate::error::{CoreError, Result};

pub struct ContextStore {
    path: PathBuf,
}

impl ContextStore {
    /// Store in the data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::at(data_dir()?.join("context.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty context.
    pub fn load(&self) -> Result<ResearchContext> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ResearchContext::default()),
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    pub fn save(&self, context: &ResearchContext) -> Result<()> {
        let json = serde_json::to_string_pretty(context)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Load, apply `f`, save.
    pub fn update<T>(&self, f: impl FnOnce(&mut ResearchContext) -> T) -> Result<T> {
        let mut context = self.load()?;
        let out = f(&mut context);
        self.save(&context)?;
        Ok(out)
    }
}
