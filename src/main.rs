use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bid_scorer::config::Config;
use bid_scorer::scoring::{Bid, CalculationResult, ScoringConfig};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_SCORING: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score and rank bids (default if no subcommand)
    Calculate {
        /// Bids file, JSON or YAML (defaults to `bidders` in the config file)
        bids: Option<PathBuf>,

        /// Use a bundled template instead of the configured scoring
        #[arg(short, long)]
        template: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Save config, bids and result to a JSON project file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check the scoring configuration and report every problem
    Validate {
        #[arg(short, long)]
        template: Option<String>,
    },
    /// List bundled templates, or print one as YAML
    Templates {
        name: Option<String>,
    },
    /// Describe the benchmark and scoring rules in plain language
    Explain {
        #[arg(short, long)]
        template: Option<String>,
    },
    /// Write a starter config file
    Init {
        /// Template to start from
        #[arg(short, long, default_value = "standard")]
        template: String,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Re-score a saved project file and report any difference
    Replay {
        project: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Parser, Debug)]
#[command(name = "bid-scorer")]
#[command(about = "Score and rank competing bids against a benchmark price", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/bid-scorer/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "bid_scorer=debug,warn" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn fail(code: i32, message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

fn fail_all(code: i32, heading: &str, errors: Vec<String>) -> ! {
    eprintln!("{}", heading);
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(code);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Calculate {
        bids: None,
        template: None,
        format: OutputFormat::default(),
        output: None,
    });
    let config_path = cli.config.map(PathBuf::from);

    match command {
        Commands::Calculate {
            bids,
            template,
            format,
            output,
        } => {
            let start_time = Instant::now();
            let config = load_config(config_path);
            let scoring = resolve_scoring(&config, template.as_deref());

            let bids = match bids {
                Some(path) => bid_scorer::bids::load_bids(&path)
                    .unwrap_or_else(|e| fail(EXIT_INPUT, format!("Bids error: {:#}", e))),
                None if !config.bidders.is_empty() => config.bidders.clone(),
                None => fail(
                    EXIT_INPUT,
                    "No bids given. Pass a bids file or add `bidders:` to the config file.",
                ),
            };
            if let Err(errors) = bid_scorer::bids::validate_bids(&bids) {
                fail_all(EXIT_INPUT, "Bid errors:", errors);
            }

            let result = score(&scoring, &bids);
            print_result(&result, format, cli.verbose);

            if let Some(path) = output {
                let project = bid_scorer::project::ProjectFile::new(scoring, bids, result);
                if let Err(e) = bid_scorer::project::save_project(&path, &project) {
                    fail(EXIT_INPUT, format!("Failed to save project: {:#}", e));
                }
                info!(path = %path.display(), "project saved");
            }

            if cli.verbose {
                eprintln!();
                eprintln!("Scored in {:?}", start_time.elapsed());
            }
        }
        Commands::Validate { template } => {
            let config = load_config(config_path);
            let _ = resolve_scoring(&config, template.as_deref());
            if let Err(errors) = bid_scorer::bids::validate_bids(&config.bidders) {
                fail_all(EXIT_INPUT, "Bid errors:", errors);
            }
            println!("Configuration is valid.");
        }
        Commands::Templates { name } => match name {
            None => {
                for template in bid_scorer::scoring::TEMPLATES {
                    println!("{:<14}{}", template.name, template.description);
                }
            }
            Some(name) => {
                let Some(template) = bid_scorer::scoring::find_template(&name) else {
                    fail(
                        EXIT_CONFIG,
                        format!(
                            "Unknown template '{}'. Available: {}",
                            name,
                            bid_scorer::scoring::template_names().join(", ")
                        ),
                    );
                };
                match serde_saphyr::to_string(&template.config()) {
                    Ok(yaml) => print!("{}", yaml),
                    Err(e) => fail(EXIT_CONFIG, format!("Failed to render template: {}", e)),
                }
            }
        },
        Commands::Explain { template } => {
            let config = load_config(config_path);
            let scoring = resolve_scoring(&config, template.as_deref());
            for line in bid_scorer::scoring::explain(&scoring) {
                println!("{}", line);
            }
        }
        Commands::Init { template, force } => {
            let path = match config_path {
                Some(p) => p,
                None => bid_scorer::config::get_config_path()
                    .unwrap_or_else(|e| fail(EXIT_CONFIG, format!("Config error: {:#}", e))),
            };
            if let Err(e) =
                bid_scorer::config::init::write_starter_config(&path, &template, force)
            {
                fail(EXIT_CONFIG, format!("Config error: {:#}", e));
            }
            println!("Wrote {} (template: {})", path.display(), template);
        }
        Commands::Replay { project, format } => {
            let saved = bid_scorer::project::load_project(&project)
                .unwrap_or_else(|e| fail(EXIT_INPUT, format!("Project error: {:#}", e)));
            if let Err(errors) = bid_scorer::scoring::validate_scoring(&saved.config) {
                fail_all(EXIT_CONFIG, "Scoring config errors:", errors);
            }

            let result = score(&saved.config, &saved.bidders);
            if result != saved.result {
                warn!(path = %project.display(), "saved result differs from a fresh evaluation");
                eprintln!(
                    "Note: the saved result differs from a fresh evaluation; showing the fresh one."
                );
            }
            print_result(&result, format, cli.verbose);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn load_config(path: Option<PathBuf>) -> Config {
    bid_scorer::config::load_config(path)
        .unwrap_or_else(|e| fail(EXIT_CONFIG, format!("Config error: {:#}", e)))
}

/// Pick the scoring policy and validate it, exiting on any problem.
fn resolve_scoring(config: &Config, template: Option<&str>) -> ScoringConfig {
    let scoring = config
        .effective_scoring(template)
        .unwrap_or_else(|e| fail(EXIT_CONFIG, format!("Config error: {:#}", e)));

    if let Err(errors) = bid_scorer::scoring::validate_scoring(&scoring) {
        fail_all(EXIT_CONFIG, "Scoring config errors:", errors);
    }
    scoring
}

fn score(scoring: &ScoringConfig, bids: &[Bid]) -> CalculationResult {
    bid_scorer::scoring::evaluate(scoring, bids)
        .unwrap_or_else(|e| fail(EXIT_SCORING, format!("Scoring error: {}", e)))
}

fn print_result(result: &CalculationResult, format: OutputFormat, verbose: bool) {
    match format {
        OutputFormat::Table => {
            let use_colors = bid_scorer::output::should_use_colors();
            println!("{}", bid_scorer::output::format_result_table(result, use_colors));

            if verbose {
                println!();
                if let Some(ref filter) = result.filter {
                    println!("Outliers: {}", bid_scorer::output::format_filter_summary(filter));
                }
                for r in &result.results {
                    println!(
                        "{:>2}. {}: {}",
                        r.original_index + 1,
                        r.name,
                        bid_scorer::output::format_adjustment(r)
                    );
                }
            }
        }
        OutputFormat::Tsv => {
            let tsv = bid_scorer::output::format_tsv(result);
            if !tsv.is_empty() {
                println!("{}", tsv);
            }
        }
        OutputFormat::Json => match bid_scorer::output::format_json(result) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(EXIT_SCORING, format!("Failed to serialize result: {}", e)),
        },
    }
}
