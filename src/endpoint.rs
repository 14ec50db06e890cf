use crate::domain::{MerchantId, PlanKey, TransactionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MerchantResource {
    Detail,
    Monthly,
    Plans,
    Stability,
}

impl MerchantResource {
    /// Sub-resources fetched after a successful merchant detail fetch.
    pub const DEPENDENTS: [MerchantResource; 3] = [
        MerchantResource::Monthly,
        MerchantResource::Plans,
        MerchantResource::Stability,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MerchantResource::Detail => "detail",
            MerchantResource::Monthly => "monthly",
            MerchantResource::Plans => "plans",
            MerchantResource::Stability => "stability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionResource {
    Detail,
    Why,
}

impl TransactionResource {
    pub fn name(self) -> &'static str {
        match self {
            TransactionResource::Detail => "detail",
            TransactionResource::Why => "why",
        }
    }
}

pub fn merchants_index_path() -> String {
    "/merchants".to_string()
}

pub fn merchant_path(id: &MerchantId, resource: MerchantResource) -> String {
    match resource {
        MerchantResource::Detail => format!("/merchants/{id}"),
        other => format!("/merchants/{id}/{}", other.name()),
    }
}

pub fn plan_detail_path(merchant: &MerchantId, key: &PlanKey) -> String {
    format!("/merchants/{merchant}/plans/{}", key.path_segment())
}

pub fn transaction_path(id: &TransactionId, resource: TransactionResource) -> String {
    match resource {
        TransactionResource::Detail => format!("/transactions/{id}"),
        TransactionResource::Why => format!("/transactions/{id}/why"),
    }
}

/// Joins a base URL such as `http://localhost:8000/api` with an API path.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
