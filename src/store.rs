use std::collections::BTreeSet;
use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tempfile::Builder;

use crate::domain::{MerchantId, PlanKey, TransactionId};
use crate::endpoint::{MerchantResource, TransactionResource};
use crate::error::ExtractError;

pub const TRANSACTIONS_DIR: &str = "transactions";
pub const WHY_DIR: &str = "why";

/// Every directory the extractors write into, relative to the data root.
pub const LAYOUT: [&str; 7] = [
    "merchants",
    "monthly",
    "plans",
    "plans/details",
    "stability",
    "transactions",
    "transactions/why",
];

#[derive(Debug, Clone)]
pub struct DataStore {
    root: Utf8PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn merchants_index_path(&self) -> Utf8PathBuf {
        self.root.join("merchants.json")
    }

    pub fn merchant_path(&self, id: &MerchantId, resource: MerchantResource) -> Utf8PathBuf {
        let dir = match resource {
            MerchantResource::Detail => "merchants",
            MerchantResource::Monthly => "monthly",
            MerchantResource::Plans => "plans",
            MerchantResource::Stability => "stability",
        };
        self.root.join(dir).join(format!("{id}.json"))
    }

    pub fn plan_detail_path(&self, key: &PlanKey) -> Utf8PathBuf {
        self.root
            .join("plans")
            .join("details")
            .join(format!("{}.json", key.file_stem()))
    }

    pub fn transactions_dir(&self) -> Utf8PathBuf {
        self.root.join(TRANSACTIONS_DIR)
    }

    pub fn transaction_path(&self, id: &TransactionId, resource: TransactionResource) -> Utf8PathBuf {
        let dir = self.transactions_dir();
        match resource {
            TransactionResource::Detail => dir.join(format!("{id}.json")),
            TransactionResource::Why => dir.join(WHY_DIR).join(format!("{id}.json")),
        }
    }

    pub fn ensure_layout(&self) -> Result<(), ExtractError> {
        for dir in LAYOUT {
            let path = self.root.join(dir);
            fs::create_dir_all(path.as_std_path())
                .map_err(|err| ExtractError::Filesystem(format!("create {path}: {err}")))?;
        }
        Ok(())
    }

    /// Ids whose transaction artifact already exists. Only `*.json` files
    /// directly inside `transactions/` count.
    pub fn existing_transaction_ids(&self) -> Result<BTreeSet<TransactionId>, ExtractError> {
        let dir = self.transactions_dir();
        if !dir.as_std_path().exists() {
            return Ok(BTreeSet::new());
        }
        let entries = fs::read_dir(dir.as_std_path())
            .map_err(|err| ExtractError::Filesystem(format!("read {dir}: {err}")))?;

        let mut ids = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|err| ExtractError::Filesystem(err.to_string()))?;
            let path = entry.path();
            if !path.is_file() || path.extension().map(|ext| ext != "json").unwrap_or(true) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if stem != WHY_DIR {
                    ids.insert(TransactionId::new(stem));
                }
            }
        }
        Ok(ids)
    }

    /// Writes `document` as 2-space pretty JSON. The file is staged next to
    /// its destination and renamed into place.
    pub fn write_json(path: &Utf8Path, document: &Value) -> Result<(), ExtractError> {
        let parent = path
            .parent()
            .ok_or_else(|| ExtractError::Filesystem(format!("invalid artifact path {path}")))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| ExtractError::Filesystem(format!("create {parent}: {err}")))?;

        let mut content = serde_json::to_vec_pretty(document)
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        content.push(b'\n');

        let mut temp = Builder::new()
            .prefix(".fixture-extract")
            .suffix(".tmp")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| ExtractError::Filesystem(format!("write {path}: {}", err.error)))?;
        Ok(())
    }
}
