use crate::apis::base::AwardApi;
use crate::apis::{lenient_amount, lenient_string};
use crate::app::ports::RegistryRequest;
use crate::config::NihConfig;
use crate::error::{AwardError, Result};
use crate::types::{Agency, AwardRecord, PageRequest, Registry, SearchCriteria};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// NIH RePORTER project search (`POST /v2/projects/search`)
pub struct NihReporterApi {
    config: NihConfig,
    page: PageRequest,
}

impl Default for NihReporterApi {
    fn default() -> Self {
        Self::new(NihConfig::default(), PageRequest::default())
    }
}

impl NihReporterApi {
    pub fn new(config: NihConfig, page: PageRequest) -> Self {
        Self { config, page }
    }

    fn org_criterion(&self) -> &'static str {
        if self.config.exact_org_match {
            "org_names_exact_match"
        } else {
            "org_names"
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NihSearchResponse {
    #[serde(default)]
    pub meta: Option<NihMeta>,
    pub results: Vec<NihProject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NihMeta {
    pub total: Option<u64>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NihProject {
    #[serde(deserialize_with = "lenient_string")]
    pub project_num: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub project_title: Option<String>,
    pub organization: Option<NihOrganization>,
    pub agency_ic_admin: Option<NihAgency>,
    pub agency_ic_fundings: Option<Vec<NihAgency>>,
    #[serde(deserialize_with = "lenient_string")]
    pub fiscal_year: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub project_start_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub project_end_date: Option<String>,
    #[serde(deserialize_with = "lenient_amount")]
    pub award_amount: Option<f64>,
    #[serde(deserialize_with = "lenient_amount")]
    pub direct_cost_amt: Option<f64>,
    #[serde(deserialize_with = "lenient_amount")]
    pub indirect_cost_amt: Option<f64>,
    pub principal_investigators: Option<Vec<NihPrincipalInvestigator>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NihOrganization {
    #[serde(deserialize_with = "lenient_string")]
    pub org_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NihAgency {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub abbreviation: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub code: Option<String>,
}

impl NihAgency {
    fn into_agency(self) -> Option<Agency> {
        if self.name.is_none() && self.abbreviation.is_none() {
            return None;
        }
        Some(Agency {
            name: self.name,
            abbreviation: self.abbreviation,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NihPrincipalInvestigator {
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
}

impl NihPrincipalInvestigator {
    /// "First Last", falling back to the full name when both parts are blank
    fn display_name(&self) -> Option<String> {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        let name = format!("{first} {last}").trim().to_string();
        if !name.is_empty() {
            return Some(name);
        }
        self.full_name.clone()
    }
}

impl From<NihProject> for AwardRecord {
    fn from(project: NihProject) -> Self {
        let principal_investigators = project
            .principal_investigators
            .unwrap_or_default()
            .iter()
            .filter_map(NihPrincipalInvestigator::display_name)
            .collect();

        let funding_agency = project
            .agency_ic_fundings
            .and_then(|fundings| fundings.into_iter().next())
            .and_then(NihAgency::into_agency);

        AwardRecord {
            registry: Registry::Nih,
            project_identifier: project.project_num,
            title: project.project_title,
            organization: project.organization.and_then(|o| o.org_name),
            administering_agency: project.agency_ic_admin.and_then(NihAgency::into_agency),
            funding_agency,
            fiscal_year: project.fiscal_year,
            start_date: project.project_start_date,
            end_date: project.project_end_date,
            total_cost: project.award_amount,
            direct_cost: project.direct_cost_amt,
            indirect_cost: project.indirect_cost_amt,
            obligated_amount: None,
            principal_investigators,
        }
    }
}

impl AwardApi for NihReporterApi {
    fn registry(&self) -> Registry {
        Registry::Nih
    }

    fn build_request(&self, criteria: &SearchCriteria) -> RegistryRequest {
        let mut search = Map::new();
        search.insert(
            "pi_names".into(),
            json!([{
                "first_name": criteria.first_name,
                "last_name": criteria.last_name,
            }]),
        );
        search.insert(self.org_criterion().into(), json!(criteria.institutions));
        // Open upper bound: anything still active on or after the cutoff
        search.insert(
            "project_end_date".into(),
            json!({
                "from_date": criteria.cutoff_date.format("%Y-%m-%d").to_string(),
                "to_date": "",
            }),
        );

        let body = json!({
            "criteria": Value::Object(search),
            "offset": self.page.offset,
            "limit": self.page.limit,
        });
        debug!(%body, "Built NIH search request");

        RegistryRequest::PostJson {
            url: self.config.search_url.clone(),
            body,
        }
    }

    fn decode(&self, body: &[u8]) -> Result<Vec<AwardRecord>> {
        let response: NihSearchResponse =
            serde_json::from_slice(body).map_err(|e| AwardError::Parse {
                registry: Registry::Nih,
                message: e.to_string(),
            })?;

        if let Some(meta) = &response.meta {
            let total = meta.total.unwrap_or(0);
            let seen = u64::from(self.page.offset) + response.results.len() as u64;
            info!(
                total,
                returned = response.results.len(),
                "NIH search matched {} projects",
                total
            );
            if total > seen {
                info!(
                    "{} more NIH projects beyond this page (use --offset/--limit to see them)",
                    total - seen
                );
            }
        }

        Ok(response.results.into_iter().map(AwardRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn criteria() -> SearchCriteria {
        SearchCriteria::new(
            "Jane",
            "Doe",
            vec!["Harvard University".into(), "MIT".into()],
            NaiveDate::from_ymd_opt(2025, 4, 11).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn builds_exact_match_search_body() {
        let api = NihReporterApi::default();
        let request = api.build_request(&criteria());

        let RegistryRequest::PostJson { url, body } = request else {
            panic!("NIH search must be a JSON POST");
        };
        assert_eq!(url, "https://api.reporter.nih.gov/v2/projects/search");
        assert_eq!(
            body,
            json!({
                "criteria": {
                    "pi_names": [{"first_name": "Jane", "last_name": "Doe"}],
                    "org_names_exact_match": ["Harvard University", "MIT"],
                    "project_end_date": {"from_date": "2025-04-11", "to_date": ""}
                },
                "offset": 0,
                "limit": 50
            })
        );
    }

    #[test]
    fn substring_org_match_and_custom_page() {
        let config = NihConfig {
            exact_org_match: false,
            ..NihConfig::default()
        };
        let api = NihReporterApi::new(config, PageRequest { offset: 100, limit: 25 });
        let RegistryRequest::PostJson { body, .. } = api.build_request(&criteria()) else {
            panic!("NIH search must be a JSON POST");
        };
        assert_eq!(body["criteria"]["org_names"], json!(["Harvard University", "MIT"]));
        assert!(body["criteria"].get("org_names_exact_match").is_none());
        assert_eq!(body["offset"], 100);
        assert_eq!(body["limit"], 25);
    }

    #[test]
    fn decodes_and_normalizes_project() {
        let body = json!({
            "meta": {"total": 1, "offset": 0, "limit": 50},
            "results": [{
                "project_num": "5R01CA123456-03",
                "project_title": "Tumor Microenvironment Signalling",
                "organization": {"org_name": "HARVARD UNIVERSITY"},
                "agency_ic_admin": {"code": "CA", "abbreviation": "NCI", "name": "National Cancer Institute"},
                "agency_ic_fundings": [
                    {"code": "CA", "abbreviation": "NCI", "name": "National Cancer Institute", "total_cost": 350000}
                ],
                "fiscal_year": 2024,
                "project_start_date": "2022-07-01T00:00:00Z",
                "project_end_date": "2027-06-30T00:00:00Z",
                "award_amount": 350000,
                "direct_cost_amt": 250000,
                "indirect_cost_amt": 100000,
                "principal_investigators": [
                    {"first_name": " Jane ", "last_name": "Doe", "is_contact_pi": true},
                    {"first_name": "", "last_name": "", "full_name": "Sam Roe"},
                    {"first_name": "", "last_name": ""}
                ]
            }]
        });
        let records = NihReporterApi::default()
            .decode(body.to_string().as_bytes())
            .unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.registry, Registry::Nih);
        assert_eq!(record.project_identifier.as_deref(), Some("5R01CA123456-03"));
        assert_eq!(record.organization.as_deref(), Some("HARVARD UNIVERSITY"));
        assert_eq!(record.fiscal_year.as_deref(), Some("2024"));
        assert_eq!(record.principal_investigators, vec!["Jane Doe", "Sam Roe"]);
        assert_eq!(
            record.funding_agency.as_ref().and_then(|a| a.abbreviation.as_deref()),
            Some("NCI")
        );
        assert_eq!(record.direct_cost, Some(250000.0));
        assert_eq!(record.indirect_cost, Some(100000.0));
    }

    #[test]
    fn tolerates_missing_and_malformed_fields() {
        let body = json!({
            "results": [{
                "project_title": null,
                "award_amount": "not disclosed",
                "agency_ic_fundings": [],
                "principal_investigators": null
            }]
        });
        let records = NihReporterApi::default()
            .decode(body.to_string().as_bytes())
            .unwrap();
        let record = &records[0];
        assert!(record.project_identifier.is_none());
        assert!(record.title.is_none());
        assert!(record.total_cost.is_none());
        assert!(record.funding_agency.is_none());
        assert!(record.principal_investigators.is_empty());
    }

    #[test]
    fn missing_results_is_a_parse_error() {
        let err = NihReporterApi::default()
            .decode(br#"{"meta": {"total": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, AwardError::Parse { registry: Registry::Nih, .. }));
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        let err = NihReporterApi::default()
            .decode(b"<html>maintenance</html>")
            .unwrap_err();
        assert!(err.is_parse());
    }
}
