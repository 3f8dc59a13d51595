pub mod appliance;
pub mod energy;

pub use appliance::ApplianceRegistry;
pub use energy::{
    ActivityRecord, AnnotatedReading, ApplianceEnergy, ConsumptionResponse, PowerRecord,
};
