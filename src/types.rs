use crate::error::{AwardError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Funding registries this crate knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Registry {
    Nih,
    Nsf,
}

impl Registry {
    pub fn display_name(&self) -> &'static str {
        match self {
            Registry::Nih => crate::constants::NIH_DISPLAY_NAME,
            Registry::Nsf => crate::constants::NSF_DISPLAY_NAME,
        }
    }

    /// Short label used for metrics and log fields
    pub fn label(&self) -> &'static str {
        match self {
            Registry::Nih => crate::constants::NIH_API,
            Registry::Nsf => crate::constants::NSF_API,
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Who and where to search for. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub first_name: String,
    pub last_name: String,
    pub institutions: Vec<String>,
    pub cutoff_date: NaiveDate,
}

impl SearchCriteria {
    /// Validates the inputs. Names are trimmed and must be non-empty; the
    /// institution list must hold at least one non-empty entry.
    pub fn new(
        first_name: &str,
        last_name: &str,
        institutions: Vec<String>,
        cutoff_date: NaiveDate,
    ) -> Result<Self> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() {
            return Err(AwardError::Validation("first name must not be empty".into()));
        }
        if last_name.is_empty() {
            return Err(AwardError::Validation("last name must not be empty".into()));
        }

        let total = institutions.len();
        let institutions: Vec<String> = institutions
            .into_iter()
            .filter(|i| !i.trim().is_empty())
            .collect();
        if institutions.len() < total {
            warn!(
                dropped = total - institutions.len(),
                "Ignoring empty institution entries"
            );
        }
        if institutions.is_empty() {
            return Err(AwardError::Validation(
                "at least one institution is required".into(),
            ));
        }

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            institutions,
            cutoff_date,
        })
    }

    /// Builds criteria with today's local date as the cutoff
    pub fn for_today(first_name: &str, last_name: &str, institutions: &str) -> Result<Self> {
        Self::new(
            first_name,
            last_name,
            split_institutions(institutions),
            chrono::Local::now().date_naive(),
        )
    }
}

/// Splits a comma-separated institution list, trimming each entry.
/// Empty entries are kept here; `SearchCriteria::new` decides what to do with them.
pub fn split_institutions(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

/// Single bounded page for the NIH search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: crate::constants::DEFAULT_OFFSET,
            limit: crate::constants::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
}

/// An award normalized from either registry's wire format.
/// Dates are kept in the registry's native string form; the reporter parses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardRecord {
    pub registry: Registry,
    pub project_identifier: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub administering_agency: Option<Agency>,
    pub funding_agency: Option<Agency>,
    pub fiscal_year: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_cost: Option<f64>,
    pub direct_cost: Option<f64>,
    pub indirect_cost: Option<f64>,
    pub obligated_amount: Option<f64>,
    pub principal_investigators: Vec<String>,
}

impl AwardRecord {
    pub fn empty(registry: Registry) -> Self {
        Self {
            registry,
            project_identifier: None,
            title: None,
            organization: None,
            administering_agency: None,
            funding_agency: None,
            fiscal_year: None,
            start_date: None,
            end_date: None,
            total_cost: None,
            direct_cost: None,
            indirect_cost: None,
            obligated_amount: None,
            principal_investigators: Vec::new(),
        }
    }
}

/// Reads a monetary amount from a JSON value. Numbers and numeric strings
/// are accepted; anything else is treated as absent.
pub fn amount_from_json(value: &serde_json::Value) -> Option<f64> {
    let amount = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 11).unwrap()
    }

    #[test]
    fn split_keeps_empty_entries() {
        assert_eq!(
            split_institutions(" Harvard University , ,MIT,"),
            vec!["Harvard University", "", "MIT", ""]
        );
    }

    #[test]
    fn criteria_drops_empty_institutions() {
        let c = SearchCriteria::new(
            " Jane ",
            "Doe",
            split_institutions("Harvard University,,MIT,"),
            date(),
        )
        .unwrap();
        assert_eq!(c.first_name, "Jane");
        assert_eq!(c.institutions, vec!["Harvard University", "MIT"]);
    }

    #[test]
    fn criteria_rejects_blank_names() {
        let err = SearchCriteria::new("  ", "Doe", vec!["MIT".into()], date()).unwrap_err();
        assert!(matches!(err, AwardError::Validation(_)));
        let err = SearchCriteria::new("Jane", "", vec!["MIT".into()], date()).unwrap_err();
        assert!(matches!(err, AwardError::Validation(_)));
    }

    #[test]
    fn criteria_rejects_only_empty_institutions() {
        let err = SearchCriteria::new("Jane", "Doe", split_institutions(" , "), date()).unwrap_err();
        assert!(matches!(err, AwardError::Validation(_)));
    }

    #[test]
    fn amounts_accept_numbers_and_numeric_strings() {
        assert_eq!(amount_from_json(&json!(1234567)), Some(1234567.0));
        assert_eq!(amount_from_json(&json!("500000")), Some(500000.0));
        assert_eq!(amount_from_json(&json!("1,250.50")), Some(1250.5));
        assert_eq!(amount_from_json(&json!("pending")), None);
        assert_eq!(amount_from_json(&json!(null)), None);
        assert_eq!(amount_from_json(&json!({"amount": 1})), None);
    }

    #[test]
    fn default_page_is_first_fifty() {
        let page = PageRequest::default();
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 50);
    }
}
