use crate::constants::{NO_RESULTS_MESSAGE, PLACEHOLDER, RULE_WIDTH};
use crate::types::{Agency, AwardRecord, Registry};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// Native date formats of the two registries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// NIH: `2023-07-01T00:00:00` with optional fraction and trailing `Z`
    IsoTimestamp,
    /// NSF: `07/01/2023`
    UsSlashed,
}

impl DateStyle {
    pub fn for_registry(registry: Registry) -> Self {
        match registry {
            Registry::Nih => DateStyle::IsoTimestamp,
            Registry::Nsf => DateStyle::UsSlashed,
        }
    }
}

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// `$1,234,567.00`, or the placeholder when absent
pub fn format_currency(amount: Option<f64>) -> String {
    match amount.filter(|a| a.is_finite()) {
        Some(a) => {
            let cents = (a.abs() * 100.0).round() as u128;
            let sign = if a < 0.0 && cents > 0 { "-" } else { "" };
            format!(
                "{sign}${}.{:02}",
                group_thousands(&(cents / 100).to_string()),
                cents % 100
            )
        }
        None => PLACEHOLDER.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `indirect / direct × 100` to two decimals, e.g. `25.00%`
pub fn format_indirect_rate(direct: Option<f64>, indirect: Option<f64>) -> String {
    match (direct, indirect) {
        (Some(d), Some(i)) if d != 0.0 && d.is_finite() && i.is_finite() => {
            format!("{:.2}%", i / d * 100.0)
        }
        _ => PLACEHOLDER.to_string(),
    }
}

/// Long-form date (`July 01, 2023`, plus `12:00 AM` for NIH timestamps)
pub fn format_date(raw: Option<&str>, style: DateStyle) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    let formatted = match style {
        DateStyle::IsoTimestamp => {
            NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.format("%B %d, %Y %I:%M %p").to_string())
        }
        DateStyle::UsSlashed => NaiveDate::parse_from_str(raw, "%m/%d/%Y")
            .ok()
            .map(|d| d.format("%B %d, %Y").to_string()),
    };
    formatted.unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// `Name (ABBR)`; abbreviation dropped when unknown
pub fn format_agency(agency: Option<&Agency>) -> String {
    let Some(agency) = agency else {
        return PLACEHOLDER.to_string();
    };
    match (agency.name.as_deref(), agency.abbreviation.as_deref()) {
        (Some(name), Some(abbr)) => format!("{name} ({abbr})"),
        (Some(name), None) => name.to_string(),
        (None, Some(abbr)) => format!("{PLACEHOLDER} ({abbr})"),
        (None, None) => PLACEHOLDER.to_string(),
    }
}

fn or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(PLACEHOLDER)
}

fn pi_names(record: &AwardRecord) -> String {
    if record.principal_investigators.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        record.principal_investigators.join(", ")
    }
}

/// Renders one record block, preceded by a rule line
pub fn render_record(record: &AwardRecord) -> String {
    let style = DateStyle::for_registry(record.registry);
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "PI Name: {}", pi_names(record));
    let _ = writeln!(out, "Project Title: {}", or_placeholder(record.title.as_deref()));
    let _ = writeln!(out, "Organization: {}", or_placeholder(record.organization.as_deref()));

    match record.registry {
        Registry::Nih => {
            let _ = writeln!(out, "Admin IC: {}", format_agency(record.administering_agency.as_ref()));
            let _ = writeln!(out, "Funding IC: {}", format_agency(record.funding_agency.as_ref()));
            let _ = writeln!(out, "Fiscal Year: {}", or_placeholder(record.fiscal_year.as_deref()));
        }
        Registry::Nsf => {
            let _ = writeln!(out, "Agency: {}", format_agency(record.funding_agency.as_ref()));
        }
    }

    let _ = writeln!(
        out,
        "Project Number: {}",
        or_placeholder(record.project_identifier.as_deref())
    );
    let _ = writeln!(out, "Start: {}", format_date(record.start_date.as_deref(), style));
    let _ = writeln!(out, "End: {}", format_date(record.end_date.as_deref(), style));

    match record.registry {
        Registry::Nih => {
            let _ = writeln!(out, "Total Cost: {}", format_currency(record.total_cost));
            let _ = writeln!(out, "Direct Cost: {}", format_currency(record.direct_cost));
            let _ = writeln!(
                out,
                "Indirect Cost: {} ({})",
                format_currency(record.indirect_cost),
                format_indirect_rate(record.direct_cost, record.indirect_cost)
            );
        }
        Registry::Nsf => {
            let _ = writeln!(out, "Estimated Total Amount: {}", format_currency(record.total_cost));
            let _ = writeln!(
                out,
                "Funds Obligated Amount: {}",
                format_currency(record.obligated_amount)
            );
        }
    }
    out
}

/// Renders the full report: one block per record and a trailing rule, or the
/// no-results message when there is nothing to show
pub fn render_report(records: &[AwardRecord]) -> String {
    if records.is_empty() {
        return format!("{NO_RESULTS_MESSAGE}\n");
    }
    let mut out: String = records.iter().map(render_record).collect();
    out.push_str(&rule());
    out.push('\n');
    out
}
