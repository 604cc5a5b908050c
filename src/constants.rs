/// Registry name constants to keep log fields, metrics and messages consistent

// Short names (used in logs and metrics)
pub const NIH_API: &str = "nih";
pub const NSF_API: &str = "nsf";

// Human-facing names (used in diagnostics)
pub const NIH_DISPLAY_NAME: &str = "NIH RePORTER";
pub const NSF_DISPLAY_NAME: &str = "NSF Awards";

// Default endpoints
pub const NIH_SEARCH_URL: &str = "https://api.reporter.nih.gov/v2/projects/search";
pub const NSF_AWARDS_URL: &str = "https://api.nsf.gov/services/v1/awards.json";

/// Fields requested from the NSF awards endpoint
pub const NSF_PRINT_FIELDS: &str =
    "id,agency,awardeeName,coPDPI,pdPIName,startDate,expDate,estimatedTotalAmt,fundsObligatedAmt,title";

pub const DEFAULT_OFFSET: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 50;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const USER_AGENT: &str = concat!("award_finder/", env!("CARGO_PKG_VERSION"));

// Report text
pub const PLACEHOLDER: &str = "N/A";
pub const NO_RESULTS_MESSAGE: &str = "No projects found matching the criteria.";
pub const RULE_WIDTH: usize = 80;

// Config discovery
pub const CONFIG_ENV_VAR: &str = "AWARD_FINDER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "award_finder.toml";
pub const LOG_DIR_ENV_VAR: &str = "AWARD_FINDER_LOG_DIR";
