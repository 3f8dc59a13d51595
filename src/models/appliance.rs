/// Rated wattage table for the monitored site.
///
/// Entries keep their insertion order; that order is the tie-break used
/// when matching appliance names against free-text activity entries, so
/// it must stay deterministic. The table is data only; swapping it for
/// another site touches no other component.
#[derive(Debug, Clone)]
pub struct ApplianceRegistry {
    entries: Vec<(String, f64)>,
}

impl ApplianceRegistry {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Rated draw in watts, `None` for names not in the table.
    pub fn rated_watts(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, watts)| *watts)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry, _)| entry == name)
    }

    /// Appliance names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ApplianceRegistry {
    /// The reference deployment: two air conditioners, four fans, two
    /// exhaust fans and one blower.
    fn default() -> Self {
        Self::new(vec![
            ("AC 1".to_string(), 1850.0),
            ("AC 2".to_string(), 1510.0),
            ("Fan 1".to_string(), 65.0),
            ("Fan 2".to_string(), 65.0),
            ("Fan 3".to_string(), 65.0),
            ("Fan 4".to_string(), 65.0),
            ("Exhaust 1".to_string(), 50.0),
            ("Exhaust 2".to_string(), 50.0),
            ("Blower 1".to_string(), 200.0),
        ])
    }
}
