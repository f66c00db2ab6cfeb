pub mod batch;
pub mod constants;
pub mod globe;
pub mod methods;
pub mod options;
pub mod psychro;
pub mod solar;
pub mod time;
pub mod wetbulb;
pub mod wind;

// Prelude
pub use batch::ObservationBatch;
pub use methods::{Method, WbgtResult, estimate_wbgt};
pub use options::WbgtOptions;
pub use solar::SolarModel;
pub use wetbulb::{NaturalWetBulb, PsychrometricWetBulb};
