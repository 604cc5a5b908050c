use crate::apis::base::AwardApi;
use crate::apis::{lenient_amount, lenient_string, lenient_string_list};
use crate::app::ports::RegistryRequest;
use crate::config::NsfConfig;
use crate::error::{AwardError, Result};
use crate::types::{Agency, AwardRecord, Registry, SearchCriteria};
use serde::Deserialize;
use tracing::{debug, warn};

/// NSF Awards API (`GET /services/v1/awards.json`)
#[derive(Default)]
pub struct NsfAwardsApi {
    config: NsfConfig,
}

impl NsfAwardsApi {
    pub fn new(config: NsfConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Deserialize)]
pub struct NsfSearchResponse {
    pub response: NsfResponseBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NsfResponseBody {
    pub award: Option<Vec<NsfAward>>,
    #[serde(rename = "serviceNotification")]
    pub service_notification: Option<Vec<NsfNotification>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NsfNotification {
    #[serde(rename = "notificationType", deserialize_with = "lenient_string")]
    pub notification_type: Option<String>,
    #[serde(rename = "notificationCode", deserialize_with = "lenient_string")]
    pub notification_code: Option<String>,
    #[serde(rename = "notificationMessage", deserialize_with = "lenient_string")]
    pub notification_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NsfAward {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub agency: Option<String>,
    #[serde(rename = "awardeeName", deserialize_with = "lenient_string")]
    pub awardee_name: Option<String>,
    #[serde(rename = "pdPIName", deserialize_with = "lenient_string")]
    pub pd_pi_name: Option<String>,
    #[serde(rename = "coPDPI", deserialize_with = "lenient_string_list")]
    pub co_pd_pi: Vec<String>,
    #[serde(rename = "startDate", deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(rename = "expDate", deserialize_with = "lenient_string")]
    pub exp_date: Option<String>,
    #[serde(rename = "estimatedTotalAmt", deserialize_with = "lenient_amount")]
    pub estimated_total_amt: Option<f64>,
    #[serde(rename = "fundsObligatedAmt", deserialize_with = "lenient_amount")]
    pub funds_obligated_amt: Option<f64>,
}

impl From<NsfAward> for AwardRecord {
    fn from(award: NsfAward) -> Self {
        // Co-PIs first, then the lead PI
        let mut principal_investigators = award.co_pd_pi;
        principal_investigators.extend(award.pd_pi_name);

        let mut record = AwardRecord::empty(Registry::Nsf);
        record.project_identifier = award.id;
        record.title = award.title;
        record.organization = award.awardee_name;
        record.funding_agency = award.agency.map(|name| Agency {
            name: Some(name),
            abbreviation: None,
        });
        record.start_date = award.start_date;
        record.end_date = award.exp_date;
        record.total_cost = award.estimated_total_amt;
        record.obligated_amount = award.funds_obligated_amt;
        record.principal_investigators = principal_investigators;
        record
    }
}

impl AwardApi for NsfAwardsApi {
    fn registry(&self) -> Registry {
        Registry::Nsf
    }

    fn build_request(&self, criteria: &SearchCriteria) -> RegistryRequest {
        let mut query = vec![(
            "pdPIName".to_string(),
            format!("\"{}+{}\"", criteria.first_name, criteria.last_name),
        )];
        // The API takes one awardeeName parameter per institution
        query.extend(
            criteria
                .institutions
                .iter()
                .map(|institution| ("awardeeName".to_string(), institution.clone())),
        );
        query.push((
            "expDateStart".to_string(),
            criteria.cutoff_date.format("%m/%d/%Y").to_string(),
        ));
        query.push(("printFields".to_string(), self.config.print_fields.clone()));
        debug!(?query, "Built NSF awards query");

        RegistryRequest::Get {
            url: self.config.awards_url.clone(),
            query,
        }
    }

    fn decode(&self, body: &[u8]) -> Result<Vec<AwardRecord>> {
        let response: NsfSearchResponse =
            serde_json::from_slice(body).map_err(|e| AwardError::Parse {
                registry: Registry::Nsf,
                message: e.to_string(),
            })?;

        for notification in response.response.service_notification.iter().flatten() {
            warn!(
                kind = notification.notification_type.as_deref().unwrap_or("unknown"),
                code = notification.notification_code.as_deref().unwrap_or(""),
                "NSF service notification: {}",
                notification.notification_message.as_deref().unwrap_or("")
            );
        }

        Ok(response
            .response
            .award
            .unwrap_or_default()
            .into_iter()
            .map(AwardRecord::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

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
    fn builds_query_with_quoted_name_and_repeated_awardees() {
        let RegistryRequest::Get { url, query } = NsfAwardsApi::default().build_request(&criteria())
        else {
            panic!("NSF search must be a GET");
        };
        assert_eq!(url, "https://api.nsf.gov/services/v1/awards.json");

        let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("pdPIName", "\"Jane+Doe\""),
                ("awardeeName", "Harvard University"),
                ("awardeeName", "MIT"),
                ("expDateStart", "04/11/2025"),
                (
                    "printFields",
                    "id,agency,awardeeName,coPDPI,pdPIName,startDate,expDate,estimatedTotalAmt,fundsObligatedAmt,title"
                ),
            ]
        );
    }

    #[test]
    fn decodes_string_amounts_and_orders_pis() {
        let body = json!({
            "response": {
                "award": [{
                    "id": "2212345",
                    "agency": "NSF",
                    "awardeeName": "Massachusetts Institute of Technology",
                    "pdPIName": "Jane Doe",
                    "coPDPI": ["Sam Roe", "Ada Poe"],
                    "startDate": "09/01/2022",
                    "expDate": "08/31/2026",
                    "estimatedTotalAmt": "599999",
                    "fundsObligatedAmt": "450000",
                    "title": "Collaborative Research: Soil Carbon"
                }]
            }
        });
        let records = NsfAwardsApi::default()
            .decode(body.to_string().as_bytes())
            .unwrap();
        let record = &records[0];
        assert_eq!(record.registry, Registry::Nsf);
        assert_eq!(record.principal_investigators, vec!["Sam Roe", "Ada Poe", "Jane Doe"]);
        assert_eq!(record.total_cost, Some(599999.0));
        assert_eq!(record.obligated_amount, Some(450000.0));
        assert_eq!(record.end_date.as_deref(), Some("08/31/2026"));
    }

    #[test]
    fn missing_award_list_means_no_awards() {
        let records = NsfAwardsApi::default()
            .decode(br#"{"response": {"metadata": {"totalCount": 0}}}"#)
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn notifications_do_not_fail_decoding() {
        let body = json!({
            "response": {
                "serviceNotification": [{
                    "notificationType": "ERROR",
                    "notificationCode": "SE-004",
                    "notificationMessage": "Invalid date"
                }]
            }
        });
        let records = NsfAwardsApi::default()
            .decode(body.to_string().as_bytes())
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_response_envelope_is_a_parse_error() {
        let err = NsfAwardsApi::default().decode(br#"{"award": []}"#).unwrap_err();
        assert!(matches!(err, AwardError::Parse { registry: Registry::Nsf, .. }));
    }
}
