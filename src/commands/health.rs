//! Store health check command.

use docrepo_core::config::AppConfig;
use docrepo_core::error::AppError;
use docrepo_core::traits::DocumentStore;
use docrepo_database::StoreManager;

use crate::output;

/// Execute the health command
pub async fn execute(store: &StoreManager, config: &AppConfig) -> Result<(), AppError> {
    output::print_kv("Provider", store.provider_type());
    output::print_kv(
        "Default page size",
        &config.repository.default_page_size.to_string(),
    );

    if store.health_check().await? {
        output::print_success("Document store is reachable");
        Ok(())
    } else {
        Err(AppError::store_read("Document store health check failed"))
    }
}
