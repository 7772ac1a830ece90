use crate::app::exports::ExportVariant;
use crate::config::toml_config::AppConfig;
use crate::core::aggregator::AddressPipeline;
use crate::core::ownership::OwnershipScraper;
use crate::core::registry::{build_http_client, HttpPageFetcher, RegistryClient};
use crate::core::report::OutputFormat;
use crate::domain::model::AddressQuery;
use crate::domain::ports::{ConfigProvider, PageFetcher, RegistryApi};
use crate::utils::error::Result;

/// Fetch, merge and render one export.
pub struct ExportEngine<R: RegistryApi, F: PageFetcher> {
    pipeline: AddressPipeline<R, F>,
}

impl ExportEngine<RegistryClient, HttpPageFetcher> {
    /// Wires the HTTP-backed registry and ownership lookups from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        let registry = RegistryClient::new(client.clone(), config.registry_base_url());
        let scraper = OwnershipScraper::new(
            HttpPageFetcher::new(client),
            config.ownership_base_url(),
        );
        Ok(Self::new(AddressPipeline::new(
            registry,
            scraper,
            config.concurrency(),
        )))
    }
}

impl<R: RegistryApi, F: PageFetcher> ExportEngine<R, F> {
    pub fn new(pipeline: AddressPipeline<R, F>) -> Self {
        Self { pipeline }
    }

    pub async fn run(
        &self,
        variant: &dyn ExportVariant,
        query: &AddressQuery,
        format: OutputFormat,
    ) -> Result<String> {
        tracing::info!(
            "🚀 Starting {} export for municipality {}, street {}, house numbers {}-{}",
            variant.name(),
            query.municipality_code,
            query.street_code,
            query.house_number_from,
            query.house_number_to
        );

        let rows = self.pipeline.run(variant, query).await;

        let cells: Vec<Vec<String>> = rows.iter().map(|row| variant.cells(row)).collect();
        tracing::debug!("Rendering {} rows as {}", cells.len(), format.description());

        format.renderer().render(variant.headers(), &cells)
    }
}
