//! Paginated listing command.

use clap::Args;
use serde_json::Value;

use docrepo_core::error::AppError;
use docrepo_core::types::{Filter, ListQuery, RawDocument};

use super::RawRepository;
use crate::output::{self, OutputFormat};

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number, starting at 1; 0 lists every match without paging
    #[arg(short, long, default_value_t = 1)]
    pub page: u64,

    /// Documents per page (defaults to `repository.default_page_size`)
    #[arg(long)]
    pub page_size: Option<u64>,

    /// JSON predicate applied to both the count and the listing
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort keys, e.g. "age:-1,name:1"
    #[arg(long)]
    pub sort: Option<String>,

    /// Comma-separated fields to return; `_id` is always included
    #[arg(long)]
    pub select: Option<String>,
}

impl ListArgs {
    /// Build the repository query from the command-line arguments.
    pub fn to_query(&self) -> Result<ListQuery, AppError> {
        let mut query = ListQuery::page(self.page);
        if let Some(page_size) = self.page_size {
            query = query.page_size(page_size);
        }
        if let Some(search) = &self.search {
            let predicate: Value = serde_json::from_str(search)?;
            query = query.search(Filter::from_json(&predicate)?);
        }
        if let Some(sort) = &self.sort {
            query = query.sort(sort.parse()?);
        }
        if let Some(select) = &self.select {
            query = query.select_fields(select);
        }
        Ok(query)
    }
}

/// Execute the list command
pub async fn execute(
    args: &ListArgs,
    repo: &RawRepository,
    format: OutputFormat,
) -> Result<(), AppError> {
    let page = repo
        .get_all(args.to_query()?)
        .await?
        .map(RawDocument::into_value);

    match format {
        OutputFormat::Json => output::print_json(&page),
        OutputFormat::Table => {
            output::print_documents(&page.records, format);
            if let Some(pagination) = &page.pagination {
                output::print_pagination(pagination);
            }
        }
    }
    Ok(())
}
