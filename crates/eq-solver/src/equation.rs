//! Human-readable reaction equations.

use crate::error::{SolverError, SolverResult};
use regex::Regex;
use std::sync::LazyLock;

static CHARGE_NUMBERED_POS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\+").expect("static regex"));
static CHARGE_TRAILING_POS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+$").expect("static regex"));
static CHARGE_NUMBERED_NEG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)-").expect("static regex"));
static CHARGE_TRAILING_NEG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-$").expect("static regex"));

/// Superscript charges: `H+` -> `H^{+}`, `Fe3+` -> `Fe^{3+}`, `Cl-` -> `Cl^{-}`.
/// All digits directly before the sign are read as the charge.
fn latex_species(name: &str) -> String {
    let s = CHARGE_NUMBERED_POS.replace_all(name, "^{${1}+}");
    let s = CHARGE_TRAILING_POS.replace_all(&s, "^{+}");
    let s = CHARGE_NUMBERED_NEG.replace_all(&s, "^{${1}-}");
    CHARGE_TRAILING_NEG.replace_all(&s, "^{-}").into_owned()
}

fn split_sides<S, F>(
    species: &[S],
    stoichiometry: &[f64],
    term: F,
) -> SolverResult<(Vec<String>, Vec<String>)>
where
    S: AsRef<str>,
    F: Fn(&str, f64) -> String,
{
    if species.len() != stoichiometry.len() {
        return Err(SolverError::LengthMismatch {
            concentrations: species.len(),
            stoichiometry: stoichiometry.len(),
        });
    }

    let mut reactants = Vec::new();
    let mut products = Vec::new();
    for (name, &nu) in species.iter().zip(stoichiometry) {
        if nu < 0.0 {
            reactants.push(term(name.as_ref(), nu.abs()));
        } else if nu > 0.0 {
            products.push(term(name.as_ref(), nu));
        }
    }
    Ok((reactants, products))
}

/// LaTeX form, e.g. `2\mathrm{A} \rightleftharpoons \mathrm{B}`.
///
/// Species with a zero coefficient are omitted.
pub fn format_equation_latex<S: AsRef<str>>(
    species: &[S],
    stoichiometry: &[f64],
) -> SolverResult<String> {
    let (reactants, products) = split_sides(species, stoichiometry, |name, coef| {
        let formatted = latex_species(name);
        if coef > 1.0 {
            format!("{coef}\\mathrm{{{formatted}}}")
        } else {
            format!("\\mathrm{{{formatted}}}")
        }
    })?;
    Ok(format!(
        "{} \\rightleftharpoons {}",
        reactants.join(" + "),
        products.join(" + ")
    ))
}

/// Plain-text form, e.g. `2 A <=> B`.
pub fn format_equation<S: AsRef<str>>(
    species: &[S],
    stoichiometry: &[f64],
) -> SolverResult<String> {
    let (reactants, products) = split_sides(species, stoichiometry, |name, coef| {
        if coef > 1.0 {
            format!("{coef} {name}")
        } else {
            name.to_string()
        }
    })?;
    Ok(format!("{} <=> {}", reactants.join(" + "), products.join(" + ")))
}
