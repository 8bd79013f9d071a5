use clap::{Parser, Subcommand};
use eq_project::{ProblemFile, ProjectError, ReactionDef};
use eq_solver::{
    EquilibriumResult, IterationEvent, Quotient, SolverError, concentrations_for,
    format_equation, format_equation_latex, solve_basic_analytic, solve_batch,
    solve_with_progress,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "eq-cli")]
#[command(about = "Chemical equilibrium solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate problem file syntax and structure
    Validate {
        /// Path to the problem file (YAML or JSON)
        problem_path: PathBuf,
    },
    /// Solve reactions from a problem file
    Solve {
        /// Path to the problem file (YAML or JSON)
        problem_path: PathBuf,
        /// Solve only this reaction
        #[arg(short, long)]
        reaction: Option<String>,
        /// Write results (including traces) as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Print every iteration of the trace
        #[arg(long)]
        trace: bool,
        /// Show a live progress line
        #[arg(long)]
        progress: bool,
    },
    /// Solve all reactions of a problem file in parallel
    Batch {
        /// Path to the problem file (YAML or JSON)
        problem_path: PathBuf,
    },
    /// Closed-form extent for 2A <=> B
    Analytic {
        /// Initial concentration of A
        #[arg(long, allow_hyphen_values = true)]
        a: f64,
        /// Initial concentration of B
        #[arg(long, allow_hyphen_values = true)]
        b: f64,
        /// Equilibrium constant
        #[arg(long, allow_hyphen_values = true)]
        keq: f64,
    },
    /// Format a reaction equation
    Equation {
        /// Comma-separated species names
        #[arg(long, value_delimiter = ',')]
        species: Vec<String>,
        /// Comma-separated stoichiometric coefficients
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        stoich: Vec<f64>,
        /// Emit LaTeX instead of plain text
        #[arg(long)]
        latex: bool,
    },
}

#[derive(Serialize)]
struct ReactionReport<'a> {
    id: &'a str,
    equation: String,
    keq: f64,
    result: &'a EquilibriumResult,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { problem_path } => cmd_validate(&problem_path),
        Commands::Solve {
            problem_path,
            reaction,
            json,
            trace,
            progress,
        } => cmd_solve(
            &problem_path,
            reaction.as_deref(),
            json.as_deref(),
            trace,
            progress,
        ),
        Commands::Batch { problem_path } => cmd_batch(&problem_path),
        Commands::Analytic { a, b, keq } => cmd_analytic(a, b, keq),
        Commands::Equation {
            species,
            stoich,
            latex,
        } => cmd_equation(&species, &stoich, latex),
    }
}

fn cmd_validate(problem_path: &Path) -> CliResult<()> {
    println!("Validating problem file: {}", problem_path.display());
    let file = eq_project::load(problem_path)?;
    println!(
        "✓ Problem file is valid ({} reactions)",
        file.reactions.len()
    );
    Ok(())
}

fn select_reactions<'a>(
    file: &'a ProblemFile,
    reaction: Option<&str>,
) -> CliResult<Vec<&'a ReactionDef>> {
    match reaction {
        Some(id) => file
            .reaction(id)
            .map(|r| vec![r])
            .ok_or_else(|| ProjectError::UnknownReaction { id: id.to_string() }.into()),
        None => Ok(file.reactions.iter().collect()),
    }
}

fn cmd_solve(
    problem_path: &Path,
    reaction: Option<&str>,
    json: Option<&Path>,
    show_trace: bool,
    progress: bool,
) -> CliResult<()> {
    let file = eq_project::load(problem_path)?;
    info!(path = %problem_path.display(), name = %file.name, "loaded problem file");
    let reactions = select_reactions(&file, reaction)?;
    if reactions.is_empty() {
        println!("No reactions found in problem file");
        return Ok(());
    }

    let mut solved = Vec::with_capacity(reactions.len());
    for def in reactions {
        let problem = def.to_problem();
        let equation = format_equation(&def.species_names(), &problem.stoichiometry)?;
        println!("Solving {}: {}", def.id, equation);

        let started = Instant::now();
        let mut last_emit = Instant::now();
        let mut render = |event: &IterationEvent<'_>| {
            if last_emit.elapsed().as_millis() >= 100 {
                render_cli_progress(event);
                last_emit = Instant::now();
            }
        };
        let observer: Option<&mut dyn FnMut(&IterationEvent<'_>)> =
            if progress { Some(&mut render) } else { None };

        let result = solve_with_progress(
            &problem.initial_concentrations,
            &problem.stoichiometry,
            problem.keq,
            &problem.config,
            observer,
        )?;
        if progress {
            clear_progress_line();
        }

        print_result(def, &result, started.elapsed().as_secs_f64());
        if show_trace {
            print_trace(&result);
        }
        solved.push((def, equation, result));
    }

    if let Some(path) = json {
        let reports: Vec<ReactionReport<'_>> = solved
            .iter()
            .map(|(def, equation, result)| ReactionReport {
                id: &def.id,
                equation: equation.clone(),
                keq: def.keq,
                result,
            })
            .collect();
        std::fs::write(path, serde_json::to_string_pretty(&reports)?)?;
        println!("✓ Wrote {} results to {}", reports.len(), path.display());
    }

    Ok(())
}

fn cmd_batch(problem_path: &Path) -> CliResult<()> {
    let file = eq_project::load(problem_path)?;
    info!(path = %problem_path.display(), reactions = file.reactions.len(), "batch");
    let problems: Vec<_> = file.reactions.iter().map(ReactionDef::to_problem).collect();

    let started = Instant::now();
    let results = solve_batch(&problems);
    let elapsed = started.elapsed().as_secs_f64();

    println!(
        "{:<20} {:>10} {:>10} {:>14} {:>14}",
        "reaction", "converged", "iters", "final Q", "Keq"
    );
    for (def, result) in file.reactions.iter().zip(&results) {
        match result {
            Ok(res) => println!(
                "{:<20} {:>10} {:>10} {:>14} {:>14.6e}",
                def.id,
                res.converged,
                res.iterations,
                quotient_label(res.final_q),
                def.keq
            ),
            Err(e) => println!("{:<20} error: {}", def.id, e),
        }
    }
    let converged = results
        .iter()
        .filter(|r| matches!(r, Ok(res) if res.converged))
        .count();
    println!(
        "\n{}/{} reactions converged in {:.3}s",
        converged,
        results.len(),
        elapsed
    );
    Ok(())
}

fn cmd_analytic(a: f64, b: f64, keq: f64) -> CliResult<()> {
    let roots = solve_basic_analytic(a, b, keq)?;
    println!("2A <=> B with [A]0 = {a}, [B]0 = {b}, Keq = {keq}");
    for (label, x) in [("x0", roots.x0), ("x1", roots.x1)] {
        let [ca, cb] = concentrations_for(a, b, x);
        println!("  {label} = {x:.8}  ->  [A] = {ca:.8}, [B] = {cb:.8}");
    }
    match roots.physical_root(a, b) {
        Some(x) => println!("✓ Physical root: {x:.8}"),
        None => println!("No root keeps both concentrations non-negative"),
    }
    Ok(())
}

fn cmd_equation(species: &[String], stoich: &[f64], latex: bool) -> CliResult<()> {
    if species.is_empty() {
        return Err(CliError::InvalidArg(
            "at least one species is required".to_string(),
        ));
    }
    let equation = if latex {
        format_equation_latex(species, stoich)?
    } else {
        format_equation(species, stoich)?
    };
    println!("{equation}");
    Ok(())
}

fn quotient_label(q: Quotient) -> String {
    match q {
        Quotient::Value(v) => format!("{v:.6e}"),
        Quotient::UndefinedReactant => "undefined".to_string(),
    }
}

fn print_result(def: &ReactionDef, result: &EquilibriumResult, elapsed_s: f64) {
    if result.converged {
        println!("✓ Converged in {} iterations", result.iterations);
    } else {
        println!(
            "✗ Not converged after {} iterations (|force| = {:.3e})",
            result.iterations,
            result.trace.last_force().unwrap_or(f64::NAN).abs()
        );
    }
    for (name, c) in def.species_names().iter().zip(&result.final_concentrations) {
        println!("  [{name}] = {c:.8}");
    }
    println!(
        "  Q = {}, Keq = {}",
        quotient_label(result.final_q),
        def.keq
    );
    if let Some(err) = result.relative_error(def.keq) {
        println!("  Relative error: {err:.3e}");
    }
    println!("  Elapsed: {elapsed_s:.3}s");
}

fn print_trace(result: &EquilibriumResult) {
    println!("  {:>6} {:>14} {:>12}  concentrations", "iter", "force", "step");
    for (i, (conc, force, dc)) in result.trace.iter().enumerate() {
        let conc: Vec<String> = conc.iter().map(|c| format!("{c:.6e}")).collect();
        println!("  {i:>6} {force:>14.6e} {dc:>12.4e}  [{}]", conc.join(", "));
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &IterationEvent<'_>) {
    let width = 28usize;
    let fraction = event.iteration as f64 / event.max_iterations as f64;
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] iter={}/{}  force={:.3e}  step={:.3e}",
        bar, event.iteration, event.max_iterations, event.force, event.step_size
    );
    let _ = io::stdout().flush();
}
