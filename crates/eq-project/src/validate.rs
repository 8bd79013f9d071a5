//! Problem file validation logic.

use crate::schema::{LATEST_VERSION, ProblemFile, ReactionDef, SolverDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Empty ID in {context}")]
    EmptyId { context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_problem_file(file: &ProblemFile) -> Result<(), ValidationError> {
    if file.version == 0 || file.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    let mut reaction_ids = HashSet::new();
    for reaction in &file.reactions {
        if reaction.id.trim().is_empty() {
            return Err(ValidationError::EmptyId {
                context: "reactions".to_string(),
            });
        }
        if !reaction_ids.insert(&reaction.id) {
            return Err(ValidationError::DuplicateId {
                id: reaction.id.clone(),
                context: "reactions".to_string(),
            });
        }
        validate_reaction(reaction)?;
    }
    Ok(())
}

fn invalid(field: String, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_reaction(reaction: &ReactionDef) -> Result<(), ValidationError> {
    let rid = &reaction.id;

    if reaction.species.is_empty() {
        return Err(invalid(
            format!("{rid}.species"),
            "[]",
            "at least one species is required",
        ));
    }

    if !(reaction.keq.is_finite() && reaction.keq > 0.0) {
        return Err(invalid(
            format!("{rid}.keq"),
            reaction.keq,
            "must be finite and positive",
        ));
    }

    let mut names = HashSet::new();
    for species in &reaction.species {
        if species.name.trim().is_empty() {
            return Err(ValidationError::EmptyId {
                context: format!("{rid}.species"),
            });
        }
        if !names.insert(&species.name) {
            return Err(ValidationError::DuplicateId {
                id: species.name.clone(),
                context: format!("{rid}.species"),
            });
        }
        if !species.stoichiometry.is_finite() || species.stoichiometry == 0.0 {
            return Err(invalid(
                format!("{rid}.{}.stoichiometry", species.name),
                species.stoichiometry,
                "must be finite and non-zero",
            ));
        }
        if !species.concentration.is_finite() || species.concentration < 0.0 {
            return Err(invalid(
                format!("{rid}.{}.concentration", species.name),
                species.concentration,
                "must be finite and non-negative",
            ));
        }
    }

    validate_solver(rid, &reaction.solver)
}

fn validate_solver(rid: &str, solver: &SolverDef) -> Result<(), ValidationError> {
    let positive = [
        ("step_size", solver.step_size),
        ("relative_tolerance", solver.relative_tolerance),
    ];
    for (field, value) in positive {
        if let Some(v) = value {
            if !(v.is_finite() && v > 0.0) {
                return Err(invalid(
                    format!("{rid}.solver.{field}"),
                    v,
                    "must be finite and positive",
                ));
            }
        }
    }
    if solver.max_iterations == Some(0) {
        return Err(invalid(
            format!("{rid}.solver.max_iterations"),
            0,
            "must be positive",
        ));
    }
    Ok(())
}
