use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::models::{ActivityRecord, ApplianceRegistry, ConsumptionResponse, PowerRecord};
use crate::repositories::FeedRepository;
use crate::services::allocation::{allocate_energy, annotate_readings};
use crate::services::timeline::build_timelines;

/// Orchestrates one attribution request: fetch both feeds, reconstruct
/// appliance state over time, allocate interval energy. Everything but
/// the registry is rebuilt per request; the registry is shared
/// read-only.
#[derive(Clone)]
pub struct EnergyService {
    feeds: FeedRepository,
    registry: Arc<ApplianceRegistry>,
}

impl EnergyService {
    pub fn new(feeds: FeedRepository, registry: ApplianceRegistry) -> Self {
        Self {
            feeds,
            registry: Arc::new(registry),
        }
    }

    pub async fn appliances_consumption(&self) -> Result<ConsumptionResponse> {
        let power = self.feeds.fetch_power().await?;
        let activity = self.feeds.fetch_activity().await?;

        info!(
            power_records = power.len(),
            activity_records = activity.len(),
            "feeds fetched"
        );

        Ok(compute_consumption(&self.registry, &activity, &power))
    }
}

/// The pure computation core: activity log + power feed in, per-appliance
/// watt-hour report out. Free of I/O so it can be exercised directly.
pub fn compute_consumption(
    registry: &ApplianceRegistry,
    activity: &[ActivityRecord],
    power: &[PowerRecord],
) -> ConsumptionResponse {
    let timelines = build_timelines(registry, activity);
    let readings = annotate_readings(registry, &timelines, power);
    let totals = allocate_energy(registry, &readings);

    ConsumptionResponse {
        appliance_consumption: totals.into_report(),
    }
}
