// crates/devprofile-rs-eds/src/lib.rs

#![doc = "Parser and writer for EDS-style section-text device descriptions."]
#![doc = ""]
#![doc = "`load_eds` turns a document into a [`devprofile_rs::DeviceProfile`];"]
#![doc = "`save_eds_to_string` writes a profile back as section text. Sections"]
#![doc = "without a canonical mapping survive the round trip verbatim."]

// --- Internal Modules ---
mod datatypes;
pub mod lexer;
mod parser;
mod resolver;
mod writer;

// --- Public API Exports ---
pub use parser::load_eds;
pub use writer::save_eds_to_string;
