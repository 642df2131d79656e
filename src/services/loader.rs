//! Snapshot loading from a file or stdin
//!
//! The snapshot arrives as one JSON document. Decoding errors are real
//! errors; a well-formed document with the wrong shape is not (it degrades
//! to an empty or filtered snapshot, see [`records_from_json`]).

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use serde_json::Value;

use crate::services::store::records_from_json;
use crate::types::{Result, ReviewRecord, RevtrackError};

/// Where the snapshot document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    Path(PathBuf),
}

impl InputSource {
    /// `None` or `-` means stdin
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Self::Stdin,
            Some(path) => Self::Path(PathBuf::from(path)),
        }
    }
}

/// Reads snapshot documents into review records
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Load records from the given source
    pub fn load(source: &InputSource) -> Result<Vec<ReviewRecord>> {
        let text = match source {
            InputSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
            InputSource::Path(path) => fs::read_to_string(path)?,
        };
        Self::parse_document(&text)
    }

    /// Parse a snapshot document
    pub fn parse_document(text: &str) -> Result<Vec<ReviewRecord>> {
        if text.trim().is_empty() {
            return Err(RevtrackError::Parse("snapshot document is empty".into()));
        }
        let value: Value = serde_json::from_str(text)?;
        let records = records_from_json(&value);
        tracing::info!(records = records.len(), "snapshot parsed");
        Ok(records)
    }
}
