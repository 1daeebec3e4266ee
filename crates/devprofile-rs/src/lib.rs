// crates/devprofile-rs/src/lib.rs

#![doc = "Canonical, grammar-independent model of an industrial device description."]
#![doc = ""]
#![doc = "Both the markup (IODD-style XML) and the section-text (EDS-style INI)"]
#![doc = "front-ends produce a [`DeviceProfile`]; storage, reconstruction and the"]
#![doc = "fidelity engine all operate on it."]

// --- Foundation Modules ---
pub mod config;
pub mod encoding;
pub mod error;
pub mod grammar;
pub mod numeric;

// --- Canonical Model ---
pub mod model;
pub mod validate;

// --- Top-level Exports ---
pub use config::{Config, Limits, WeightTable};
pub use error::{ConfigError, ParseError, ReconstructError};
pub use grammar::Grammar;
pub use model::DeviceProfile;
pub use validate::validate_profile;
