use eq_project::schema::*;
use eq_project::{ProjectError, load, load_json, load_yaml, save, save_json, save_yaml};

fn sample() -> ProblemFile {
    ProblemFile {
        version: LATEST_VERSION,
        name: "Dimerization study".to_string(),
        reactions: vec![
            ReactionDef {
                id: "dimer".to_string(),
                name: Some("2A <=> B".to_string()),
                species: vec![
                    SpeciesDef {
                        name: "A".to_string(),
                        stoichiometry: -2.0,
                        concentration: 0.2,
                    },
                    SpeciesDef {
                        name: "B".to_string(),
                        stoichiometry: 1.0,
                        concentration: 0.1,
                    },
                ],
                keq: 12.0,
                solver: SolverDef::default(),
            },
            ReactionDef {
                id: "association".to_string(),
                name: None,
                species: vec![
                    SpeciesDef {
                        name: "A".to_string(),
                        stoichiometry: -1.0,
                        concentration: 0.1,
                    },
                    SpeciesDef {
                        name: "B".to_string(),
                        stoichiometry: -1.0,
                        concentration: 0.2,
                    },
                    SpeciesDef {
                        name: "C".to_string(),
                        stoichiometry: 1.0,
                        concentration: 0.0,
                    },
                ],
                keq: 5.0,
                solver: SolverDef {
                    step_size: Some(0.005),
                    max_iterations: Some(5000),
                    decrease_step_on_sign_change: true,
                    ..SolverDef::default()
                },
            },
        ],
    }
}

#[test]
fn roundtrip_yaml() {
    let file = sample();
    let path = std::env::temp_dir().join("eq_project_roundtrip.yaml");

    save_yaml(&path, &file).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(file, loaded);
    assert_eq!(load(&path).unwrap(), file);
}

#[test]
fn roundtrip_json() {
    let file = sample();
    let path = std::env::temp_dir().join("eq_project_roundtrip.json");

    save_json(&path, &file).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(file, loaded);
    assert_eq!(load(&path).unwrap(), file);
}

#[test]
fn save_picks_format_from_extension() {
    let file = sample();
    let path = std::env::temp_dir().join("eq_project_dispatch.json");

    save(&path, &file).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.trim_start().starts_with('{'));
    assert_eq!(load_json(&path).unwrap(), file);
}

#[test]
fn save_rejects_invalid_file() {
    let mut file = sample();
    file.reactions[0].keq = -1.0;
    let path = std::env::temp_dir().join("eq_project_invalid.yaml");

    let err = save_yaml(&path, &file).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn loaded_reactions_solve() {
    let file = sample();
    let results: Vec<_> = file
        .reactions
        .iter()
        .map(|r| r.to_problem().solve().unwrap())
        .collect();

    assert!(results.iter().all(|r| r.converged));
    for (reaction, result) in file.reactions.iter().zip(&results) {
        assert!(result.relative_error(reaction.keq).unwrap() < 0.01);
    }
}
