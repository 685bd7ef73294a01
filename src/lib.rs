pub mod catalog;
pub mod config;
pub mod generation;
pub mod profiles;
pub mod selection;

// Re-export commonly used types for convenience.
pub use catalog::{Category, CategoryCatalog, Gender, Segment};
pub use config::AppConfig;
pub use generation::{BatchRequest, JobController, OutputLayout};
pub use profiles::{Profile, ProfileAssembler, TraitOverrides};
