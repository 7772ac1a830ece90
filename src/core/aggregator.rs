use crate::app::exports::ExportVariant;
use crate::core::classifier::basement_area;
use crate::core::ownership::OwnershipScraper;
use crate::domain::model::{Address, AddressQuery, Building, ExportRow, Floor, LandParcel};
use crate::domain::ports::{PageFetcher, RegistryApi};
use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Why an address produced no row. None of these fail the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no buildings registered")]
    NoBuildings,
    #[error("no building qualifies for the report")]
    NoMatchingBuilding,
    #[error("no floors registered for building {0}")]
    NoFloors(String),
    #[error("no land parcel {0}/{1}")]
    NoLand(String, String),
}

/// Drives the dependent lookups for every address of a street range.
///
/// Addresses are processed concurrently, at most `concurrency` at a time,
/// and rows come back in the order the registry listed the addresses.
pub struct AddressPipeline<R: RegistryApi, F: PageFetcher> {
    registry: R,
    ownership: OwnershipScraper<F>,
    concurrency: usize,
}

impl<R: RegistryApi, F: PageFetcher> AddressPipeline<R, F> {
    pub fn new(registry: R, ownership: OwnershipScraper<F>, concurrency: usize) -> Self {
        Self {
            registry,
            ownership,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn run(&self, variant: &dyn ExportVariant, query: &AddressQuery) -> Vec<ExportRow> {
        let addresses = self.fetch_addresses(query).await;
        let total = addresses.len();
        tracing::info!(
            "📡 {}: processing {} addresses (concurrency {})",
            variant.name(),
            total,
            self.concurrency
        );

        let municipality = query.municipality_code.as_str();
        // Completion order is arbitrary; each outcome lands in its address's slot.
        let mut outcomes: Vec<Option<ExportRow>> = vec![None; total];
        let finished: Vec<(usize, Option<ExportRow>)> = stream::iter(addresses.iter().enumerate())
            .map(|(index, address)| async move {
                match self.process_address(variant, municipality, address).await {
                    Ok(row) => (index, Some(row)),
                    Err(reason) => {
                        tracing::warn!(
                            "Skipping address {} ({} {}): {}",
                            address.id,
                            address.street_name,
                            address.house_number,
                            reason
                        );
                        (index, None)
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        for (index, outcome) in finished {
            outcomes[index] = outcome;
        }

        let rows: Vec<ExportRow> = outcomes.into_iter().flatten().collect();
        tracing::info!("✅ {}: {} of {} addresses exported", variant.name(), rows.len(), total);
        rows
    }

    /// Addresses in registry order, without repeats.
    pub async fn fetch_addresses(&self, query: &AddressQuery) -> Vec<Address> {
        let Some(value) = self
            .registry
            .request("adgangsadresser", &query.to_query_params())
            .await
        else {
            tracing::warn!("No addresses returned for {:?}", query);
            return Vec::new();
        };

        let Some(items) = value.as_array() else {
            tracing::warn!("Address lookup did not return a list");
            return Vec::new();
        };

        let mut seen = HashSet::new();
        decode_entries::<Address>("adgangsadresser", items)
            .into_iter()
            .filter(|address| seen.insert(address.id.clone()))
            .collect()
    }

    pub async fn process_address(
        &self,
        variant: &dyn ExportVariant,
        municipality_code: &str,
        address: &Address,
    ) -> Result<ExportRow, SkipReason> {
        let buildings: Vec<Building> = self
            .fetch_list("bbrlight/bygninger", &[("adgangsadresseid", address.id.clone())])
            .await
            .filter(|b| !b.is_empty())
            .ok_or(SkipReason::NoBuildings)?;

        let selection = variant
            .select_buildings(&buildings)
            .ok_or(SkipReason::NoMatchingBuilding)?;

        let floors: Vec<Floor> = self
            .fetch_list("bbrlight/etager", &[("bygningsid", selection.primary.id.clone())])
            .await
            .filter(|f| !f.is_empty())
            .ok_or_else(|| SkipReason::NoFloors(selection.primary.id.clone()))?;

        let (land, ownership) = tokio::join!(
            self.fetch_land(address),
            self.ownership.fetch(municipality_code, &address.owner_reference)
        );
        let land = land.ok_or_else(|| {
            SkipReason::NoLand(
                address.registry_area_code.clone(),
                address.parcel_number.clone(),
            )
        })?;

        Ok(ExportRow {
            address: address.clone(),
            buildings: selection,
            basement_area: basement_area(&floors),
            land,
            ownership,
        })
    }

    async fn fetch_land(&self, address: &Address) -> Option<LandParcel> {
        let path = format!(
            "jordstykker/{}/{}",
            address.registry_area_code.trim(),
            address.parcel_number.trim()
        );
        let value = self.registry.request(&path, &[]).await?;
        serde_json::from_value(value)
            .map_err(|e| tracing::warn!("Unexpected land parcel payload for {}: {}", path, e))
            .ok()
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Option<Vec<T>> {
        let value = self.registry.request(path, query).await?;
        let Some(items) = value.as_array() else {
            tracing::warn!("Unexpected payload from {}: not a list", path);
            return None;
        };
        Some(decode_entries(path, items))
    }
}

/// Decodes each list entry on its own so one malformed record only drops itself.
fn decode_entries<T: DeserializeOwned>(path: &str, items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Ignoring malformed entry from {}: {}", path, e);
                None
            }
        })
        .collect()
}
