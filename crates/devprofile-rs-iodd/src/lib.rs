// crates/devprofile-rs-iodd/src/lib.rs

#![doc = "Parser and writer for IODD-style XML device descriptions."]
#![doc = ""]
#![doc = "`load_iodd` turns a document into a [`devprofile_rs::DeviceProfile`];"]
#![doc = "`save_iodd_to_string` writes a profile back as XML."]

// --- Internal Modules ---
mod builder;
mod error;
mod guard;
mod model;
mod parser;
mod resolver;

// --- Public API Exports ---
pub use builder::save_iodd_to_string;
pub use guard::{prescan, schema_version};
pub use parser::load_iodd;
