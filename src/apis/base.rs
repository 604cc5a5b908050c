use crate::app::ports::RegistryRequest;
use crate::error::Result;
use crate::types::{AwardRecord, Registry, SearchCriteria};

/// Registry-specific knowledge: how to ask, and how to read the answer
pub trait AwardApi: Send + Sync {
    fn registry(&self) -> Registry;

    /// Builds the outbound request for the given criteria
    fn build_request(&self, criteria: &SearchCriteria) -> RegistryRequest;

    /// Decodes a successful response body into normalized records
    fn decode(&self, body: &[u8]) -> Result<Vec<AwardRecord>>;
}
