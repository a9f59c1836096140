use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hoslabel_core::{cluster, resolve_batch, AppConfig, LabelError, MatchIndex};
use hoslabel_parse::Entity;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hoslabel", version, about = "Resolve hospital names against a canonical list")]
struct Cli {
    /// Config file to use instead of the user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log per-record decisions.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Label each external name with its canonical counterpart.
    Classify {
        /// External names, one per line.
        names: PathBuf,
        /// Canonical reference list, one per line.
        labels: PathBuf,
        /// Output file: `<name>\t<label or empty>` per input line.
        output: PathBuf,
        /// Worker threads (overrides the config file).
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Collapse a name list to one line per institution.
    Cluster {
        names: PathBuf,
        output: PathBuf,
    },
    /// Print the parsed form of each line as JSON.
    Parse {
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// Inspect or create the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the config file location.
    Path,
    /// Write the default config to the config file location.
    Init,
}

fn main() -> Result<(), LabelError> {
    let Cli {
        config: config_file,
        verbose,
        command,
    } = Cli::parse();

    let default_filter = if verbose {
        "hoslabel=debug"
    } else {
        "hoslabel=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &config_file {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    match command {
        Command::Classify {
            names,
            labels,
            output,
            workers,
        } => classify(&config, &names, &labels, &output, workers),
        Command::Cluster { names, output } => run_cluster(&config, &names, &output),
        Command::Parse { lines } => parse(&config, &lines),
        Command::Config { action } => match action {
            ConfigAction::Path => {
                let path = config_file.unwrap_or_else(AppConfig::config_path);
                println!("{}", path.display());
                Ok(())
            }
            ConfigAction::Init => {
                let defaults = AppConfig::default();
                let path = match config_file {
                    Some(path) => {
                        defaults.save_to(&path)?;
                        path
                    }
                    None => defaults.save()?,
                };
                tracing::info!("Wrote default config to {}", path.display());
                Ok(())
            }
        },
    }
}

fn classify(
    config: &AppConfig,
    names: &Path,
    labels: &Path,
    output: &Path,
    workers: Option<usize>,
) -> Result<(), LabelError> {
    let lexicon = config.lexicon()?;
    let workers = workers.filter(|&n| n > 0).unwrap_or_else(|| config.worker_count());

    let label_lines = read_lines(labels)?;
    let index = MatchIndex::build(&lexicon, &label_lines);
    tracing::info!("Indexed {} labels from {}", index.len(), labels.display());

    let queries = read_lines(names)?;
    tracing::info!("Classifying {} names on {workers} workers", queries.len());
    let outcome = resolve_batch(&index, &lexicon, queries.as_slice(), workers)?;

    let mut out = BufWriter::new(fs::File::create(output)?);
    for (line, matched) in queries.iter().zip(&outcome.matches) {
        writeln!(out, "{line}\t{}", matched.map(Entity::original).unwrap_or(""))?;
    }
    out.flush()?;

    let stats = outcome.stats;
    tracing::info!(
        "Labeled {} / {} ({:.2}%)",
        stats.labeled(),
        stats.total(),
        percent(stats.labeled(), stats.total())
    );
    tracing::debug!(
        exact = stats.exact,
        heuristic = stats.heuristic,
        too_short = stats.too_short,
        misses = stats.misses,
        "Resolution paths"
    );
    Ok(())
}

fn run_cluster(config: &AppConfig, names: &Path, output: &Path) -> Result<(), LabelError> {
    let lines = read_lines(names)?;
    let total = lines.iter().filter(|l| !l.trim().is_empty()).count();
    let kept = cluster(&config.lexicon()?, &lines);

    let mut out = BufWriter::new(fs::File::create(output)?);
    for entity in &kept {
        writeln!(out, "{}", entity.original())?;
    }
    out.flush()?;

    tracing::info!("{total} => {} ({:.2}%)", kept.len(), percent(kept.len(), total));
    Ok(())
}

fn parse(config: &AppConfig, lines: &[String]) -> Result<(), LabelError> {
    let lexicon = config.lexicon()?;
    for line in lines {
        let entity = Entity::parse(line, &lexicon);
        let json = serde_json::to_string_pretty(&entity)
            .map_err(|e| LabelError::Io(e.into()))?;
        println!("{json}");
    }
    Ok(())
}

/// Read a UTF-8 file into lines, keeping blank lines so output rows align
/// with input rows.
fn read_lines(path: &Path) -> Result<Vec<String>, LabelError> {
    if !path.exists() {
        return Err(LabelError::MissingInput(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|l| l.trim_end_matches('\r').to_string())
        .collect())
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_keeps_fractions() {
        assert_eq!(format!("{:.2}", percent(1, 3)), "33.33");
        assert_eq!(format!("{:.2}", percent(2, 3)), "66.67");
        assert_eq!(format!("{:.2}", percent(5, 5)), "100.00");
    }

    #[test]
    fn percent_of_nothing_is_zero() {
        assert_eq!(percent(0, 0), 0.0);
    }
}
