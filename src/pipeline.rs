use crate::apis::base::AwardApi;
use crate::apis::nih::NihReporterApi;
use crate::apis::nsf::NsfAwardsApi;
use crate::app::ports::HttpClientPort;
use crate::dedup::dedupe_projects;
use crate::error::{AwardError, Result};
use crate::metrics::RegistryMetrics;
use crate::types::{AwardRecord, Registry, SearchCriteria};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Records returned by one registry, after deduplication where it applies
#[derive(Debug)]
pub struct RegistryResult {
    pub registry: Registry,
    pub records: Vec<AwardRecord>,
}

/// Outcome of querying several registries in one run
#[derive(Debug, Default)]
pub struct CombinedResult {
    pub sections: Vec<RegistryResult>,
    /// Registries whose section was omitted, with the reason
    pub omitted: Vec<AwardError>,
}

impl CombinedResult {
    /// All records in section order
    pub fn records(&self) -> Vec<AwardRecord> {
        self.sections
            .iter()
            .flat_map(|s| s.records.iter().cloned())
            .collect()
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Issues one request and decodes the body. Non-2xx statuses become
    /// `AwardError::Http`; there is no retry.
    #[instrument(skip(api, http, criteria), fields(registry = api.registry().label()))]
    pub async fn fetch(
        api: &dyn AwardApi,
        http: &dyn HttpClientPort,
        criteria: &SearchCriteria,
    ) -> Result<Vec<AwardRecord>> {
        let registry = api.registry();
        let request = api.build_request(criteria);
        let started = Instant::now();

        let response = http.send(&request).await.map_err(|message| {
            RegistryMetrics::record_request_error(registry, "transport");
            AwardError::Transport { registry, message }
        })?;

        if !response.is_success() {
            RegistryMetrics::record_request_error(registry, "http");
            return Err(AwardError::Http {
                registry,
                status: response.status,
            });
        }

        let records = api.decode(&response.bytes).map_err(|e| {
            RegistryMetrics::record_request_error(registry, "parse");
            e
        })?;

        RegistryMetrics::record_request_success(
            registry,
            started.elapsed().as_secs_f64(),
            records.len(),
        );
        info!("Fetched {} records from {}", records.len(), registry);
        Ok(records)
    }

    /// NIH pipeline: fetch, then collapse amendment records
    pub async fn run_nih(
        api: &NihReporterApi,
        http: &dyn HttpClientPort,
        criteria: &SearchCriteria,
    ) -> Result<RegistryResult> {
        let records = Self::fetch(api, http, criteria).await?;
        let total = records.len();
        let records = dedupe_projects(records);
        if records.len() < total {
            RegistryMetrics::record_duplicates_dropped(total - records.len());
            info!(
                "Collapsed {} amendment records into {} projects",
                total,
                records.len()
            );
        }
        Ok(RegistryResult {
            registry: Registry::Nih,
            records,
        })
    }

    pub async fn run_nsf(
        api: &NsfAwardsApi,
        http: &dyn HttpClientPort,
        criteria: &SearchCriteria,
    ) -> Result<RegistryResult> {
        let records = Self::fetch(api, http, criteria).await?;
        Ok(RegistryResult {
            registry: Registry::Nsf,
            records,
        })
    }

    /// Queries NIH then NSF, sequentially. A parse failure omits that
    /// registry's section; transport and HTTP failures abort the run, as does
    /// every registry failing.
    pub async fn run_combined(
        nih: &NihReporterApi,
        nsf: &NsfAwardsApi,
        http: &dyn HttpClientPort,
        criteria: &SearchCriteria,
    ) -> Result<CombinedResult> {
        let mut result = CombinedResult::default();

        let nih_outcome = Self::run_nih(nih, http, criteria).await;
        Self::collect(&mut result, nih_outcome)?;
        let nsf_outcome = Self::run_nsf(nsf, http, criteria).await;
        Self::collect(&mut result, nsf_outcome)?;

        if result.sections.is_empty() && !result.omitted.is_empty() {
            return Err(result.omitted.remove(0));
        }
        Ok(result)
    }

    fn collect(result: &mut CombinedResult, outcome: Result<RegistryResult>) -> Result<()> {
        match outcome {
            Ok(section) => result.sections.push(section),
            Err(e) if e.is_parse() => {
                warn!("Omitting section: {}", e);
                result.omitted.push(e);
            }
            Err(e) => {
                error!("Registry query failed: {}", e);
                return Err(e);
            }
        }
        Ok(())
    }
}
