use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use pt_app::{AppError, AppResult, Configurator, load_plan_options};
use pt_core::{InstanceId, Phase};
use pt_plan::{PlanOptions, Stage};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ptc")]
#[command(about = "Power-train topology configurator for hybrid-electric propulsion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and report its size
    Validate {
        /// Path to the architecture document
        doc_path: PathBuf,
    },
    /// Produce the assembly plan
    Plan {
        /// Path to the architecture document
        doc_path: PathBuf,
        /// Planning options file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Flight phase for control-parameter variants
        #[arg(long)]
        phase: Option<Phase>,
        /// Comma-separated instance ids ordering performance stages
        #[arg(long, value_delimiter = ',')]
        hint: Option<Vec<String>>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// List disjoint branches
    Partition {
        /// Path to the architecture document
        doc_path: PathBuf,
    },
    /// Write the branch containing an instance as a standalone document
    Extract {
        /// Path to the architecture document
        doc_path: PathBuf,
        /// Any instance of the wanted branch
        seed: String,
        /// Output document (.yaml, .yml or .json)
        out_path: PathBuf,
    },
    /// Print the phase variants of every control parameter
    Rename {
        /// Path to the architecture document
        doc_path: PathBuf,
        /// Target flight phase
        phase: Phase,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Configurator::with_defaults();

    match cli.command {
        Commands::Validate { doc_path } => cmd_validate(&session, &doc_path),
        Commands::Plan {
            doc_path,
            config,
            phase,
            hint,
            format,
        } => cmd_plan(&session, &doc_path, config.as_deref(), phase, hint, format),
        Commands::Partition { doc_path } => cmd_partition(&session, &doc_path),
        Commands::Extract {
            doc_path,
            seed,
            out_path,
        } => cmd_extract(&session, &doc_path, &seed, &out_path),
        Commands::Rename { doc_path, phase } => cmd_rename(&session, &doc_path, phase),
    }
}

fn parse_id(raw: &str) -> AppResult<InstanceId> {
    InstanceId::parse(raw.trim()).map_err(|e| AppError::InvalidInput(e.to_string()))
}

fn cmd_validate(session: &Configurator, doc_path: &Path) -> AppResult<()> {
    println!("Validating architecture: {}", doc_path.display());
    let summary = session.summarize(doc_path)?;
    println!(
        "✓ {} is valid ({} instances, {} connections, {} branches, {} control parameters)",
        summary.name,
        summary.instance_count,
        summary.connection_count,
        summary.branch_count,
        summary.control_parameter_count
    );
    Ok(())
}

fn cmd_plan(
    session: &Configurator,
    doc_path: &Path,
    config: Option<&Path>,
    phase: Option<Phase>,
    hint: Option<Vec<String>>,
    format: Format,
) -> AppResult<()> {
    let mut options = match config {
        Some(path) => load_plan_options(path)?,
        None => PlanOptions::default(),
    };
    if phase.is_some() {
        options.phase = phase;
    }
    if let Some(hint) = hint {
        options.hint = Some(hint.iter().map(|s| parse_id(s)).collect::<AppResult<_>>()?);
    }

    let plan = session.plan(doc_path, &options)?;
    let rendered = match format {
        Format::Yaml => serde_yaml::to_string(&plan).map_err(|e| AppError::Render(e.to_string()))?,
        Format::Json => {
            serde_json::to_string_pretty(&plan).map_err(|e| AppError::Render(e.to_string()))?
        }
    };
    println!("{}", rendered);

    let stages = &plan.evaluation.performance_stages;
    let groups = stages.iter().filter(|s| matches!(s, Stage::CycleGroup(_))).count();
    tracing::info!(
        stages = stages.len(),
        cycle_groups = groups,
        fingerprint = %plan.fingerprint(),
        "plan ready"
    );
    Ok(())
}

fn cmd_partition(session: &Configurator, doc_path: &Path) -> AppResult<()> {
    let branches = session.partition(doc_path)?;
    if branches.is_empty() {
        println!("No instances in architecture");
        return Ok(());
    }
    println!("Branches:");
    for (i, branch) in branches.iter().enumerate() {
        let nodes: Vec<&str> = branch.nodes.iter().map(InstanceId::as_str).collect();
        println!(
            "  {} - {} ({} connections)",
            i + 1,
            nodes.join(", "),
            branch.edges.len()
        );
    }
    Ok(())
}

fn cmd_extract(session: &Configurator, doc_path: &Path, seed: &str, out_path: &Path) -> AppResult<()> {
    let seed = parse_id(seed)?;
    let branch = session.write_reduced(doc_path, &seed, out_path)?;
    println!(
        "✓ Wrote {} instances to {}",
        branch.nodes.len(),
        out_path.display()
    );
    Ok(())
}

fn cmd_rename(session: &Configurator, doc_path: &Path, phase: Phase) -> AppResult<()> {
    let renamed = session.rename_control_parameters(doc_path, phase)?;
    if renamed.is_empty() {
        println!("No control parameters in architecture");
    }
    for (from, to) in renamed {
        println!("{} -> {}", from, to);
    }
    Ok(())
}
