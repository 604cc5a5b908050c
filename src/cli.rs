use crate::constants::{DEFAULT_LIMIT, DEFAULT_OFFSET};
use crate::error::Result;
use crate::types::{PageRequest, SearchCriteria};
use clap::Args;
use std::path::PathBuf;

/// Principal investigator and institutions to search for
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Exact first name of the principal investigator.
    #[arg(long = "first", short = 'f')]
    pub first: String,

    /// Exact last name of the principal investigator.
    #[arg(long = "last", short = 'l')]
    pub last: String,

    /// Comma-separated list of institution names (exact matches).
    #[arg(long = "institutions", short = 'i')]
    pub institutions: String,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl SearchArgs {
    /// Validated criteria with today as the cutoff date
    pub fn criteria(&self) -> Result<SearchCriteria> {
        SearchCriteria::for_today(&self.first, &self.last, &self.institutions)
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Pagination offset.
    #[arg(long, short = 'o', default_value_t = DEFAULT_OFFSET)]
    pub offset: u32,

    /// Number of records to retrieve.
    #[arg(long, short = 'n', default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest {
            offset: args.offset,
            limit: args.limit,
        }
    }
}
