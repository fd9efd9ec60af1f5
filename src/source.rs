//! Where rule text comes from.
//!
//! The engine never touches storage directly; it asks a [`RuleSource`] for
//! the current raw text whenever it (re)loads.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{BotError, Result};

/// Supplier of raw rule text.
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Read the full current rule text.
    async fn read_raw(&self) -> Result<String>;

    /// Human-readable name for logs and error messages.
    fn describe(&self) -> String;
}

/// Rules stored in a UTF-8 text file.
#[derive(Debug, Clone)]
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RuleSource for FileRuleSource {
    async fn read_raw(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| BotError::io(self.describe(), e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Rules held in memory. The text can be replaced to simulate an edit.
#[derive(Debug, Default)]
pub struct MemoryRuleSource {
    text: RwLock<String>,
}

impl MemoryRuleSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(text.into()),
        }
    }

    /// Replace the rule text returned by later reads.
    pub fn set(&self, text: impl Into<String>) {
        let mut guard = self
            .text
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = text.into();
    }
}

#[async_trait]
impl RuleSource for MemoryRuleSource {
    async fn read_raw(&self) -> Result<String> {
        let guard = self
            .text
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn describe(&self) -> String {
        "in-memory rules".to_string()
    }
}
