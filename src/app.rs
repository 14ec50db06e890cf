use std::time::{Duration, Instant};

use camino::Utf8Path;
use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiClient, require_document};
use crate::discovery::{ScanIssue, WorkSet, scan_transaction_ids};
use crate::domain::{MerchantId, PlanKey, TransactionId};
use crate::endpoint::{self, MerchantResource, TransactionResource};
use crate::error::ExtractError;
use crate::store::DataStore;

#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl FetchSummary {
    fn record<T>(&mut self, outcome: &Option<T>) {
        if outcome.is_some() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Outcome of a snapshot run, counted per artifact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotReport {
    pub data_dir: String,
    pub artifacts: FetchSummary,
    pub written: Vec<String>,
}

/// Outcome of a transaction sync run, counted per transaction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub data_dir: String,
    pub discovered: usize,
    pub existing: usize,
    pub missing: usize,
    pub transactions: FetchSummary,
    pub why_failed: usize,
    pub scan_issues: Vec<ScanIssue>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

impl ProgressEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            elapsed: None,
        }
    }
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct Extractor<C: ApiClient> {
    store: DataStore,
    client: C,
}

impl<C: ApiClient> Extractor<C> {
    pub fn new(store: DataStore, client: C) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Fetches the merchant index, every listed merchant with its
    /// sub-resources and plan details, then every listed transaction with
    /// its explanation. Existing artifacts are overwritten.
    pub fn snapshot(
        &self,
        merchants: &[MerchantId],
        transactions: &[TransactionId],
        sink: &dyn ProgressSink,
    ) -> Result<SnapshotReport, ExtractError> {
        self.store.ensure_layout()?;
        let mut report = SnapshotReport {
            data_dir: self.store.root().to_string(),
            ..SnapshotReport::default()
        };

        sink.event(ProgressEvent::new("=== Extracting merchants list ==="));
        let index = self.persist(
            &endpoint::merchants_index_path(),
            &self.store.merchants_index_path(),
            sink,
        );
        self.tally(&mut report, &index, &self.store.merchants_index_path());

        for merchant in merchants {
            sink.event(ProgressEvent::new(format!(
                "=== Extracting merchant {merchant} ==="
            )));
            self.snapshot_merchant(merchant, &mut report, sink);
        }

        sink.event(ProgressEvent::new(format!(
            "=== Extracting {} transactions ===",
            transactions.len()
        )));
        for (idx, id) in transactions.iter().enumerate() {
            sink.event(ProgressEvent::new(format!(
                "[{}/{}] {}...",
                idx + 1,
                transactions.len(),
                id.short(8)
            )));
            let detail_path = self.store.transaction_path(id, TransactionResource::Detail);
            let detail = self.persist(
                &endpoint::transaction_path(id, TransactionResource::Detail),
                &detail_path,
                sink,
            );
            self.tally(&mut report, &detail, &detail_path);
            if detail.is_none() {
                continue;
            }

            let why_path = self.store.transaction_path(id, TransactionResource::Why);
            let why = self.persist(
                &endpoint::transaction_path(id, TransactionResource::Why),
                &why_path,
                sink,
            );
            self.tally(&mut report, &why, &why_path);
        }

        Ok(report)
    }

    /// Fetches transactions referenced by saved documents but not yet stored
    /// under `transactions/`. A second run against unchanged data performs no
    /// requests.
    pub fn sync_transactions(&self, sink: &dyn ProgressSink) -> Result<SyncReport, ExtractError> {
        self.store.ensure_layout()?;

        sink.event(ProgressEvent::new(
            "Scanning existing JSON files for transaction IDs...",
        ));
        let transactions_dir = self.store.transactions_dir();
        let scan = scan_transaction_ids(
            self.store.root().as_std_path(),
            Some(transactions_dir.as_std_path()),
        );
        for issue in &scan.issues {
            sink.event(ProgressEvent::new(format!(
                "  Error reading {}: {}",
                issue.path, issue.message
            )));
        }
        sink.event(ProgressEvent::new(format!(
            "Found {} unique transaction IDs in {} files",
            scan.ids.len(),
            scan.files_scanned
        )));

        let existing = self.store.existing_transaction_ids()?;
        let work = WorkSet::plan(&scan.ids, &existing);
        sink.event(ProgressEvent::new(format!(
            "Already extracted: {}",
            work.existing
        )));
        sink.event(ProgressEvent::new(format!(
            "Need to extract: {}",
            work.missing.len()
        )));

        let mut report = SyncReport {
            data_dir: self.store.root().to_string(),
            discovered: work.discovered,
            existing: work.existing,
            missing: work.missing.len(),
            scan_issues: scan.issues,
            ..SyncReport::default()
        };

        if work.is_empty() {
            sink.event(ProgressEvent::new("All transactions already extracted!"));
            return Ok(report);
        }

        let total = work.missing.len();
        sink.event(ProgressEvent::new(format!(
            "Extracting {total} transactions..."
        )));
        for (idx, id) in work.missing.iter().enumerate() {
            sink.event(ProgressEvent::new(format!(
                "  [{}/{total}] {}...",
                idx + 1,
                id.short(12)
            )));
            let started = Instant::now();
            let detail = self.persist(
                &endpoint::transaction_path(id, TransactionResource::Detail),
                &self.store.transaction_path(id, TransactionResource::Detail),
                sink,
            );
            report.transactions.record(&detail);

            if detail.is_some() {
                let why = self.persist(
                    &endpoint::transaction_path(id, TransactionResource::Why),
                    &self.store.transaction_path(id, TransactionResource::Why),
                    sink,
                );
                if why.is_none() {
                    report.why_failed += 1;
                }
            }

            let status = if detail.is_some() { "OK" } else { "FAILED" };
            sink.event(ProgressEvent {
                message: format!("  [{}/{total}] {status}", idx + 1),
                elapsed: Some(started.elapsed()),
            });
        }

        Ok(report)
    }

    fn snapshot_merchant(
        &self,
        merchant: &MerchantId,
        report: &mut SnapshotReport,
        sink: &dyn ProgressSink,
    ) {
        let detail_path = self.store.merchant_path(merchant, MerchantResource::Detail);
        let detail = self.persist(
            &endpoint::merchant_path(merchant, MerchantResource::Detail),
            &detail_path,
            sink,
        );
        self.tally(report, &detail, &detail_path);
        if detail.is_none() {
            return;
        }

        for resource in MerchantResource::DEPENDENTS {
            let path = self.store.merchant_path(merchant, resource);
            let document = self.persist(&endpoint::merchant_path(merchant, resource), &path, sink);
            self.tally(report, &document, &path);

            if let (MerchantResource::Plans, Some(plans)) = (resource, &document) {
                let keys = plan_keys(plans);
                sink.event(ProgressEvent::new(format!(
                    "  Extracting {} plan details...",
                    keys.len()
                )));
                for key in keys {
                    let path = self.store.plan_detail_path(&key);
                    let plan = self.persist(&endpoint::plan_detail_path(merchant, &key), &path, sink);
                    self.tally(report, &plan, &path);
                }
            }
        }
    }

    /// Fetches `api_path` and writes it to `destination`. Any failure is
    /// logged and turned into `None`.
    fn persist(
        &self,
        api_path: &str,
        destination: &Utf8Path,
        sink: &dyn ProgressSink,
    ) -> Option<Value> {
        let fetched = self
            .client
            .get_json(api_path)
            .and_then(|value| require_document(api_path, value));
        let document = match fetched {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(path = api_path, error = %err, "fetch failed");
                sink.event(ProgressEvent::new(format!("  ERROR fetching {api_path}: {err}")));
                return None;
            }
        };
        if let Err(err) = DataStore::write_json(destination, &document) {
            tracing::warn!(path = %destination, error = %err, "write failed");
            sink.event(ProgressEvent::new(format!("  ERROR saving {destination}: {err}")));
            return None;
        }
        if let Some(name) = destination.file_name() {
            sink.event(ProgressEvent::new(format!("  Saved: {name}")));
        }
        Some(document)
    }

    fn tally(&self, report: &mut SnapshotReport, outcome: &Option<Value>, path: &Utf8Path) {
        report.artifacts.record(outcome);
        if outcome.is_some() {
            report.written.push(path.to_string());
        }
    }
}

/// Plan keys listed in a plan-list document. Entries without a string
/// `plan_key` are skipped.
pub fn plan_keys(plans: &Value) -> Vec<PlanKey> {
    plans
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("plan_key").and_then(Value::as_str))
                .filter(|key| !key.is_empty())
                .map(PlanKey::new)
                .collect()
        })
        .unwrap_or_default()
}
