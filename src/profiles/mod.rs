//! Profile records, their assembly from the catalog and their prompt text.

pub mod assembler;
pub mod model;
pub mod prompt;

pub use assembler::{AssemblyError, ProfileAssembler, SlotInputs, TraitChoice, TraitOverrides};
pub use model::{Demographics, GenerationMethod, Profile};
pub use prompt::{build_prompt, passport_safe_hair_style, PromptText};
