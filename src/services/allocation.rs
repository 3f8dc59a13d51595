use tracing::debug;

use crate::models::{AnnotatedReading, ApplianceEnergy, ApplianceRegistry, PowerRecord};
use crate::services::timeline::{parse_feed_timestamp, state_at, ApplianceTimelines, SwitchState};

/// Annotate each valid power reading with the appliances resolved as on
/// at that instant.
///
/// Records missing a field or carrying an unparseable timestamp are
/// dropped. Appliances that are off or were never observed are both
/// inactive. The feed's relative order is preserved, never re-sorted:
/// interval allocation is defined over adjacent pairs in source order.
/// Active sets are built in registry order, which fixes the encounter
/// order of the final report.
pub fn annotate_readings(
    registry: &ApplianceRegistry,
    timelines: &ApplianceTimelines,
    records: &[PowerRecord],
) -> Vec<AnnotatedReading> {
    let mut readings = Vec::with_capacity(records.len());

    for record in records {
        let (Some(raw_ts), Some(power_w)) = (record.timestamp.as_deref(), record.consumption)
        else {
            continue;
        };

        let Some(timestamp) = parse_feed_timestamp(raw_ts) else {
            debug!(timestamp = raw_ts, "dropping power reading with unparseable timestamp");
            continue;
        };

        let active: Vec<String> = registry
            .names()
            .filter(|name| {
                state_at(timelines.transitions_for(name), timestamp) == Some(SwitchState::On)
            })
            .map(str::to_string)
            .collect();

        readings.push(AnnotatedReading {
            timestamp,
            power_w,
            active,
        });
    }

    readings
}

/// Accumulated watt-hours per appliance, in the order each appliance
/// first received energy. Absence means no interval ever attributed
/// energy to that appliance, which is distinct from an accumulated zero.
#[derive(Debug, Default)]
pub struct EnergyTotals {
    entries: Vec<(String, f64)>,
}

impl EnergyTotals {
    fn add(&mut self, appliance: &str, energy_wh: f64) {
        match self
            .entries
            .iter_mut()
            .find(|(name, _)| name == appliance)
        {
            Some((_, total)) => *total += energy_wh,
            None => self.entries.push((appliance.to_string(), energy_wh)),
        }
    }

    pub fn get(&self, appliance: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == appliance)
            .map(|(_, total)| *total)
    }

    /// Emit the report. Accumulation runs at full precision; rounding to
    /// two decimals happens only here.
    pub fn into_report(self) -> Vec<ApplianceEnergy> {
        self.entries
            .into_iter()
            .map(|(appliance, energy_wh)| ApplianceEnergy {
                appliance,
                energy_wh: (energy_wh * 100.0).round() / 100.0,
            })
            .collect()
    }
}

/// Integrate energy over adjacent reading pairs and split each interval
/// across the earlier reading's active set in proportion to rated
/// wattage (left-endpoint rectangle rule).
///
/// Duration comes from the literal forward difference; out-of-order
/// timestamps yield a non-positive contribution rather than an error.
/// Intervals with an empty active set are skipped outright and their
/// consumption stays unaccounted.
pub fn allocate_energy(
    registry: &ApplianceRegistry,
    readings: &[AnnotatedReading],
) -> EnergyTotals {
    let mut totals = EnergyTotals::default();

    for pair in readings.windows(2) {
        let (t0, t1) = (&pair[0], &pair[1]);

        if t0.active.is_empty() {
            continue;
        }

        let duration_hours =
            (t1.timestamp - t0.timestamp).num_milliseconds() as f64 / 3_600_000.0;

        let total_rated_watts: f64 = t0
            .active
            .iter()
            .filter_map(|name| registry.rated_watts(name))
            .sum();

        for appliance in &t0.active {
            let rated = registry.rated_watts(appliance).unwrap_or(0.0);
            let share = rated / total_rated_watts;
            totals.add(appliance, share * t0.power_w * duration_hours);
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityRecord;
    use crate::services::timeline::build_timelines;
    use chrono::{DateTime, TimeZone, Utc};

    fn small_registry() -> ApplianceRegistry {
        ApplianceRegistry::new(vec![("A".to_string(), 100.0), ("B".to_string(), 300.0)])
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, minute, 0).unwrap()
    }

    fn reading(hour: u32, minute: u32, power_w: f64, active: &[&str]) -> AnnotatedReading {
        AnnotatedReading {
            timestamp: at(hour, minute),
            power_w,
            active: active.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_proportional_allocation_end_to_end() {
        let registry = small_registry();
        let readings = vec![
            reading(9, 0, 400.0, &["A", "B"]),
            reading(10, 0, 400.0, &["A", "B"]),
        ];

        let report = allocate_energy(&registry, &readings).into_report();

        assert_eq!(
            report,
            vec![
                ApplianceEnergy {
                    appliance: "A".to_string(),
                    energy_wh: 100.0,
                },
                ApplianceEnergy {
                    appliance: "B".to_string(),
                    energy_wh: 300.0,
                },
            ]
        );
    }

    #[test]
    fn test_interval_energy_is_conserved() {
        let registry = ApplianceRegistry::default();
        let readings = vec![
            reading(9, 0, 735.5, &["AC 1", "Fan 1", "Exhaust 2"]),
            reading(9, 30, 500.0, &["AC 1"]),
        ];

        let totals = allocate_energy(&registry, &readings);
        let attributed: f64 = ["AC 1", "Fan 1", "Exhaust 2"]
            .iter()
            .map(|name| totals.get(name).unwrap())
            .sum();

        // Shares sum to 1, so the interval total is power x duration.
        assert!((attributed - 735.5 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_uses_earlier_reading_state() {
        let registry = small_registry();
        let readings = vec![
            reading(9, 0, 400.0, &["A"]),
            reading(10, 0, 999.0, &["B"]),
            reading(11, 0, 999.0, &[]),
        ];

        let totals = allocate_energy(&registry, &readings);

        // First interval is all A at 400 W; second is all B at 999 W.
        assert!((totals.get("A").unwrap() - 400.0).abs() < 1e-9);
        assert!((totals.get("B").unwrap() - 999.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_active_interval_is_skipped() {
        let registry = small_registry();
        let readings = vec![
            reading(9, 0, 400.0, &[]),
            reading(10, 0, 400.0, &["A"]),
            reading(11, 0, 0.0, &[]),
        ];

        let totals = allocate_energy(&registry, &readings);

        assert_eq!(totals.get("B"), None);
        assert!((totals.get("A").unwrap() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_and_negative_durations_stay_inert() {
        let registry = small_registry();
        let readings = vec![
            reading(10, 0, 400.0, &["A"]),
            reading(10, 0, 400.0, &["A"]),
            reading(9, 0, 400.0, &["A"]),
        ];

        let totals = allocate_energy(&registry, &readings);

        // Zero-duration pair contributes nothing; the backwards pair
        // contributes the literal (negative) forward difference.
        assert!((totals.get("A").unwrap() - (-400.0)).abs() < 1e-9);
    }

    #[test]
    fn test_allocator_is_pure() {
        let registry = small_registry();
        let readings = vec![
            reading(9, 0, 400.0, &["A", "B"]),
            reading(10, 0, 400.0, &["A", "B"]),
        ];

        let first = allocate_energy(&registry, &readings).into_report();
        let second = allocate_energy(&registry, &readings).into_report();

        assert_eq!(first, second);
    }

    #[test]
    fn test_rounding_happens_at_emission_only() {
        let registry = ApplianceRegistry::new(vec![
            ("A".to_string(), 1.0),
            ("B".to_string(), 2.0),
        ]);
        let readings = vec![
            reading(9, 0, 100.0, &["A", "B"]),
            reading(9, 20, 100.0, &["A", "B"]),
        ];

        let totals = allocate_energy(&registry, &readings);

        // A's share: 1/3 x 100 W x 1/3 h.
        let exact = 100.0 / 9.0;
        assert!((totals.get("A").unwrap() - exact).abs() < 1e-9);

        let report = allocate_energy(&registry, &readings).into_report();
        assert_eq!(report[0].energy_wh, 11.11);
        assert_eq!(report[1].energy_wh, 22.22);
    }

    #[test]
    fn test_annotate_skips_malformed_records() {
        let registry = ApplianceRegistry::default();
        let timelines = build_timelines(
            &registry,
            &[ActivityRecord {
                timestamp: Some("2025-01-01T08:00:00Z".to_string()),
                action: Some("Fan 1 Turned on".to_string()),
            }],
        );

        let records = vec![
            PowerRecord {
                timestamp: Some("2025-01-01T09:00:00Z".to_string()),
                consumption: None,
            },
            PowerRecord {
                timestamp: None,
                consumption: Some(120.0),
            },
            PowerRecord {
                timestamp: Some("noonish".to_string()),
                consumption: Some(120.0),
            },
            PowerRecord {
                timestamp: Some("2025-01-01T10:00:00Z".to_string()),
                consumption: Some(120.0),
            },
        ];

        let readings = annotate_readings(&registry, &timelines, &records);

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].power_w, 120.0);
        assert_eq!(readings[0].active, vec!["Fan 1".to_string()]);
    }

    #[test]
    fn test_annotate_treats_off_and_unobserved_as_inactive() {
        let registry = ApplianceRegistry::default();
        let timelines = build_timelines(
            &registry,
            &[
                ActivityRecord {
                    timestamp: Some("2025-01-01T08:00:00Z".to_string()),
                    action: Some("AC 1 Turned on".to_string()),
                },
                ActivityRecord {
                    timestamp: Some("2025-01-01T08:00:00Z".to_string()),
                    action: Some("Fan 2 Turned off".to_string()),
                },
            ],
        );

        let records = vec![PowerRecord {
            timestamp: Some("2025-01-01T09:00:00Z".to_string()),
            consumption: Some(1900.0),
        }];

        let readings = annotate_readings(&registry, &timelines, &records);

        // Fan 2 is off, everything else was never observed.
        assert_eq!(readings[0].active, vec!["AC 1".to_string()]);
    }

    #[test]
    fn test_annotate_active_set_follows_registry_order() {
        let registry = ApplianceRegistry::default();
        let timelines = build_timelines(
            &registry,
            &[
                ActivityRecord {
                    timestamp: Some("2025-01-01T08:00:00Z".to_string()),
                    action: Some("Blower 1 Turned on".to_string()),
                },
                ActivityRecord {
                    timestamp: Some("2025-01-01T08:05:00Z".to_string()),
                    action: Some("AC 2 Turned on".to_string()),
                },
            ],
        );

        let records = vec![PowerRecord {
            timestamp: Some("2025-01-01T09:00:00Z".to_string()),
            consumption: Some(1700.0),
        }];

        let readings = annotate_readings(&registry, &timelines, &records);

        // Registry order, not activity-log order.
        assert_eq!(
            readings[0].active,
            vec!["AC 2".to_string(), "Blower 1".to_string()]
        );
    }
}
