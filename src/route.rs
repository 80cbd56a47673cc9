//! Entity-type → coding-system routing.
//!
//! The mapping is a fixed, exhaustively checked table: `Medicine` goes to
//! RxNorm, every other recognized type goes to SNOMED CT. Unrecognized
//! labels are an error; there is no silent default system.

use crate::types::{EntityType, System};

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("unrecognized entity type: {0:?} (expected Medicine, Procedure, Diagnosis, or Lab)")]
    UnknownEntityType(String),
}

impl EntityType {
    /// Case-insensitive parse of the configured entity-type labels.
    pub fn parse(label: &str) -> Result<Self, RouteError> {
        let trimmed = label.trim();
        for et in [Self::Medicine, Self::Procedure, Self::Diagnosis, Self::Lab] {
            if trimmed.eq_ignore_ascii_case(et.name()) {
                return Ok(et);
            }
        }
        Err(RouteError::UnknownEntityType(label.to_string()))
    }
}

/// Target coding system for an entity type.
pub fn route(entity_type: EntityType) -> System {
    match entity_type {
        EntityType::Medicine => System::Rxnorm,
        EntityType::Procedure | EntityType::Diagnosis | EntityType::Lab => System::SnomedCtUs,
    }
}
