use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use lpwrap::{Lp, Simplex, Solution, Solver};

#[derive(Parser)]
#[command(name = "lpwrap")]
#[command(about = "Solve and export linear programs over named variables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an LP given as JSON and print the optimum
    Solve {
        /// The JSON file containing the LP
        file: PathBuf,
        /// Tolerance passed to the simplex backend
        #[arg(long, default_value_t = lpwrap::DEFAULT_TOLERANCE)]
        tolerance: f64,
        /// Maximum simplex pivots per phase
        #[arg(long, default_value_t = 10000)]
        max_iterations: usize,
    },
    /// Write an LP given as JSON in the .lp model format
    Write {
        /// The JSON file containing the LP
        file: PathBuf,
        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Read a .sol solution file and print its bindings
    ReadSol {
        /// The solution file
        file: PathBuf,
        /// JSON LP to evaluate the objective against
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { file, tolerance, max_iterations } => {
            let lp = load_lp(&file);
            let solver = Solver::with_backend(Simplex::new().with_max_iterations(max_iterations))
                .with_tolerance(tolerance);

            match solver.solve(&lp) {
                Ok(solution) => print_solution(&solution),
                Err(e) => {
                    eprintln!("Solve error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Write { file, output } => {
            let lp = load_lp(&file);
            let result = match output {
                Some(path) => File::create(&path)
                    .map_err(lpwrap::FormatError::from)
                    .and_then(|mut f| lpwrap::write_model(&mut f, &lp)),
                None => lpwrap::write_model(&mut io::stdout().lock(), &lp),
            };
            if let Err(e) = result {
                eprintln!("Write error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ReadSol { file, model } => {
            let values = match File::open(&file)
                .map_err(lpwrap::FormatError::from)
                .and_then(|f| lpwrap::parse_solution(BufReader::new(f)))
            {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Error reading {}: {}", file.display(), e);
                    std::process::exit(1);
                }
            };

            match model {
                Some(path) => {
                    let lp = load_lp(&path);
                    print_solution(&Solution::from_bindings(&lp, values));
                }
                None => {
                    let mut ordered: Vec<_> = values.into_iter().collect();
                    ordered.sort_by(|a, b| a.0.cmp(&b.0));
                    for (name, value) in ordered {
                        println!("{} = {}", name, value);
                    }
                }
            }
        }
    }
}

/// Install a stderr subscriber filtered by `LPWRAP_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("LPWRAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_lp(path: &Path) -> Lp {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str::<Lp>(&source) {
        Ok(lp) => {
            tracing::debug!(
                file = %path.display(),
                num_constraints = lp.constraints.len(),
                "Loaded LP"
            );
            lp
        }
        Err(e) => {
            eprintln!("Error parsing {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_solution(solution: &Solution) {
    println!("Objective: {}", solution.value);
    println!();
    println!("Optimal variable values");
    for (name, value) in solution.ordered() {
        println!("{} = {}", name, value);
    }
}
