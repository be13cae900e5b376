//! Questionnaires and forms for exercising the status engine.

pub mod cardiac_rehab;
pub mod fixture;
pub mod medication_review;
pub mod prenatal;

// Re-export fixture helpers
pub use fixture::{Side, content_tree};

// Re-export cardiac_rehab types
pub use cardiac_rehab::{CardiacRehab, CardiacRehabForm, Intake};

// Re-export prenatal types
pub use prenatal::{Prenatal, PrenatalForm};
