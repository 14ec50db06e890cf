use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::{MerchantId, TransactionId, is_path_safe};
use crate::error::ExtractError;

pub const DEFAULT_CONFIG_FILE: &str = "fixtures.json";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub merchant_ids: Option<Vec<MerchantEntry>>,
    #[serde(default)]
    pub transaction_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MerchantEntry {
    Numeric(u64),
    Text(String),
}

impl From<MerchantEntry> for MerchantId {
    fn from(entry: MerchantEntry) -> Self {
        match entry {
            MerchantEntry::Numeric(value) => MerchantId::from(value),
            MerchantEntry::Text(value) => MerchantId::new(value),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub data_dir: Utf8PathBuf,
    pub merchant_ids: Vec<MerchantId>,
    pub transaction_ids: Vec<TransactionId>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `fixtures.json` when present, or falls back to the
    /// built-in sample lists.
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, ExtractError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config = if path.is_none() && !config_path.exists() {
            Config::default()
        } else {
            let content = fs::read_to_string(&config_path)
                .map_err(|_| ExtractError::ConfigRead(config_path.clone()))?;
            serde_json::from_str(&content)
                .map_err(|err| ExtractError::ConfigParse(err.to_string()))?
        };

        Self::resolve_config(config, overrides)
    }

    pub fn resolve_config(
        config: Config,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, ExtractError> {
        let base_url = overrides
            .base_url
            .or(config.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        validate_base_url(&base_url)?;

        let data_dir = overrides
            .data_dir
            .or(config.data_dir)
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        let merchant_ids = match config.merchant_ids {
            Some(entries) => entries.into_iter().map(MerchantId::from).collect(),
            None => default_merchant_ids(),
        };
        let transaction_ids = match config.transaction_ids {
            Some(ids) => ids.into_iter().map(TransactionId::new).collect(),
            None => default_transaction_ids(),
        };

        let unsafe_id = merchant_ids
            .iter()
            .map(MerchantId::as_str)
            .chain(transaction_ids.iter().map(TransactionId::as_str))
            .find(|id| !is_path_safe(id));
        if let Some(id) = unsafe_id {
            return Err(ExtractError::InvalidIdentifier(id.to_string()));
        }

        Ok(ResolvedConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            data_dir: Utf8PathBuf::from(data_dir),
            merchant_ids,
            transaction_ids,
        })
    }
}

fn validate_base_url(value: &str) -> Result<(), ExtractError> {
    let url = reqwest::Url::parse(value)
        .map_err(|err| ExtractError::InvalidBaseUrl(format!("{value}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ExtractError::InvalidBaseUrl(value.to_string()));
    }
    Ok(())
}

pub fn default_merchant_ids() -> Vec<MerchantId> {
    [30, 243, 405].into_iter().map(MerchantId::from).collect()
}

pub fn default_transaction_ids() -> Vec<TransactionId> {
    DEFAULT_TRANSACTION_IDS
        .iter()
        .map(|id| TransactionId::new(*id))
        .collect()
}

const DEFAULT_TRANSACTION_IDS: &[&str] = &[
    "dd129486-0b41-4b60-b023-b84834eb88d1",
    "dd120776-d050-44ad-a807-0881ec66b25c",
    "dd12603e-30b4-4893-b057-d1424ce10003",
    "dd12344d-722b-437d-8666-aef69eb17b61",
    "dd125369-f35e-4e36-907d-239111edb4a9",
    "dd12df73-641f-40f2-872f-0778b2be7e61",
    "dd121f11-f763-405d-98ce-842f34c35c6c",
    "dd1206b0-34ca-46be-9295-16e931c93e1a",
    "dd125d74-2755-45aa-9417-7fd1d713c029",
    "dd12856f-3ac4-47cb-b29d-def4dccf6fb8",
    "dd128d1b-8ba1-41cd-927e-d026dffc34ed",
    "dd122799-534a-4e19-877f-1a10553825e0",
    "dd12018c-c025-4f86-9430-b97bc8106d51",
    "dd125388-c220-4011-9761-e146588451e5",
    "dd121522-c0ea-46d9-9074-a9e409521d16",
    "dd51749a-4664-4f9b-8834-3996c32a24bc",
    "dd51011c-8d82-4970-b29b-d3fe460d8505",
    "dd118c65-bbb1-4e92-bbd7-570c1f43529b",
    "dd110d81-b79a-4732-8640-e3a9b27252be",
    "dd11abab-cfff-44eb-98e4-6eab31e07281",
    "dd11fe33-3411-4063-81b5-b690c12a9d05",
    "dd11f147-bc61-440a-9c57-da3ee1555c33",
    "dd112beb-08f1-4704-a9d7-50641a87ffab",
    "dd51e51b-0bd3-4836-bdcb-f1c6a7461a18",
    "dd51e08a-dc97-4661-8bb7-62b80ee14c90",
    "dd5125eb-e841-4243-9671-fe970e4889e1",
    "dd1165e7-c8f8-4f36-8491-0aba02258787",
    "dd1164da-0615-4722-a71b-b7e57527be28",
    "dd115ffb-fc94-463d-91db-f1d97fbeeec6",
    "dd529820-7122-4654-a460-780793c69d2d",
    "dd529e47-1d23-4cc9-93c3-09f358f1ce81",
    "dd52ccfb-a405-4f6e-9ea3-817937b7ecdb",
    "dd110f78-8797-478d-b3e6-71f00e2ed4a9",
    "dd1172bf-ffe6-4722-b158-53b800aeea29",
    "dd11e06e-ab40-4983-b765-e37a72e63a9c",
    "dd1230a4-aeee-4348-bb78-108c86a228a9",
    "dd122c66-a05a-4222-8f58-096a6ee93695",
    "dd126839-98c9-471f-a2c2-e3627e5b3321",
    "dd125455-3bae-440c-890a-938b482232e7",
    "dd12b879-ce1f-4f32-b053-947ff3f01206",
    "dd121dc7-5631-4b65-bc0e-f7b61e65ab15",
    "dd12bd17-a537-4da0-9a8e-57281544f63a",
    "dd1241e1-dd57-4836-ac8a-c16299efb867",
    "dd124584-e716-4f4b-acc7-6054a3a32888",
    "dd529fe7-95f5-4682-b09e-2281b7358158",
    "dd516e91-6817-4d4a-82bf-028d4734a783",
    "dd518512-77dd-4aaf-98b6-2838cac63908",
];
