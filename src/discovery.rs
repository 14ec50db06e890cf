use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::TransactionId;

static TRANSACTION_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""transaction_id"\s*:\s*"([a-f0-9-]{36})""#).expect("transaction id pattern")
});

/// A file the scan could not use. Its contribution is empty.
#[derive(Debug, Clone, Serialize)]
pub struct ScanIssue {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub ids: BTreeSet<TransactionId>,
    pub files_scanned: usize,
    pub issues: Vec<ScanIssue>,
}

pub fn extract_transaction_ids(text: &str) -> BTreeSet<TransactionId> {
    TRANSACTION_ID_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|value| TransactionId::new(value.as_str()))
        .collect()
}

/// Collects transaction ids referenced by `*.json` files below `root`,
/// ignoring everything under `excluded`.
pub fn scan_transaction_ids(root: &Path, excluded: Option<&Path>) -> ScanResult {
    let mut result = ScanResult::default();
    if !root.exists() {
        return result;
    }

    for path in json_files(root, excluded, &mut result.issues) {
        match fs::read_to_string(&path) {
            Ok(content) => {
                result.files_scanned += 1;
                result.ids.extend(extract_transaction_ids(&content));
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable file");
                result.issues.push(ScanIssue {
                    path: path.display().to_string(),
                    message: err.to_string(),
                });
            }
        }
    }
    result
}

fn json_files(root: &Path, excluded: Option<&Path>, issues: &mut Vec<ScanIssue>) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %dir.display(), error = %err, "skipping unreadable directory");
                issues.push(ScanIssue {
                    path: dir.display().to_string(),
                    message: err.to_string(),
                });
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if excluded.is_some_and(|excluded| path.starts_with(excluded)) {
                continue;
            }
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// Discovered ids minus the ids already persisted.
#[derive(Debug, Clone, Serialize)]
pub struct WorkSet {
    pub discovered: usize,
    pub existing: usize,
    pub missing: Vec<TransactionId>,
}

impl WorkSet {
    pub fn plan(discovered: &BTreeSet<TransactionId>, existing: &BTreeSet<TransactionId>) -> Self {
        Self {
            discovered: discovered.len(),
            existing: existing.len(),
            missing: discovered.difference(existing).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }
}
