use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use grantinsight_core::display::{days_remaining, OpportunityCardView};
use grantinsight_core::repository::source_for;
use grantinsight_core::{
    filter_opportunities, Config, Exporter, FilterEngine, OpportunityRepository, OpportunitySource, Status,
    StatusFilter,
};
use grantinsight_tui::App;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "grantinsight")]
#[command(version, about = "Terminal dashboard for funding opportunities", long_about = None)]
struct Cli {
    /// JSON file with opportunities (built-in sample data when omitted)
    #[arg(long, global = true, env = "GRANTINSIGHT_DATA")]
    data: Option<PathBuf>,

    /// Date countdowns are computed against, YYYY-MM-DD (defaults to today)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard {
        /// Where the `e` key writes its report
        #[arg(long)]
        export_path: Option<PathBuf>,
    },
    /// Print the opportunities matching a search and status
    List {
        /// Case-insensitive text matched against title, organization and tags
        #[arg(short, long, default_value = "")]
        search: String,
        /// all, nueva, evaluando, preparando or presentada
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Print the number of opportunities per status
    Counts,
    /// Write the matching opportunities to a .md, .csv or .json report
    Export {
        path: PathBuf,
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Dashboard { .. }));
    init_logging(interactive)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    let data_path = cli.data.clone().or_else(|| config.data.source.clone());
    let source = source_for(data_path.as_deref());
    let repository = OpportunityRepository::from_source(source.as_ref())
        .with_context(|| format!("Failed to load opportunities from {}", source.name()))?;

    let today = cli.today.unwrap_or_else(|| chrono::Local::now().date_naive());

    match cli.command {
        None => run_dashboard(repository, source, &config, today, None),
        Some(Commands::Dashboard { export_path }) => {
            run_dashboard(repository, source, &config, today, export_path)
        }
        Some(Commands::List { search, status }) => {
            print_list(&repository, &search, status, today, config.display.alert_window_days);
            Ok(())
        }
        Some(Commands::Counts) => {
            print_counts(&repository);
            Ok(())
        }
        Some(Commands::Export {
            path,
            search,
            status,
        }) => export(&repository, &path, &search, status, today),
    }
}

/// Subcommands log to stderr; the dashboard logs to a file so the
/// alternate screen stays clean.
fn init_logging(to_file: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "grantinsight=info".into());

    if to_file {
        let path = log_file_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn log_file_path() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .context("Could not find local data directory")?
        .join("grantinsight");
    Ok(dir.join("grantinsight.log"))
}

fn run_dashboard(
    repository: OpportunityRepository,
    source: Box<dyn OpportunitySource>,
    config: &Config,
    today: NaiveDate,
    export_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    tracing::info!("Starting dashboard with {} opportunities", repository.len());

    let engine = FilterEngine::new(repository);
    let mut app = App::new(engine, config, today)?;
    app.set_source(source);
    if let Some(path) = export_path {
        app.set_export_path(path);
    }

    grantinsight_tui::run_tui(app)
}

fn print_list(
    repository: &OpportunityRepository,
    search: &str,
    status: StatusFilter,
    today: NaiveDate,
    alert_window_days: i64,
) {
    let visible = filter_opportunities(repository.records(), search, status);

    if visible.is_empty() {
        println!("No se encontraron oportunidades que coincidan con los filtros seleccionados.");
        return;
    }

    for opp in &visible {
        let card = OpportunityCardView::build(opp, today, alert_window_days);
        println!(
            "[{}] {} ({}, {} {})",
            opp.id,
            opp.title,
            opp.status.label(),
            opp.priority.symbol(),
            opp.priority.label()
        );
        println!(
            "    {} | {} | {} ({} días) | {} | {}",
            opp.organization,
            opp.amount,
            card.deadline_label,
            card.days_remaining,
            opp.region,
            opp.category
        );
        if let Some(banner) = &card.banner {
            println!("    ⚠ {}", banner.message());
        }
        let mut tags = card.tags.shown.join(", ");
        if let Some(badge) = card.tags.overflow_badge() {
            tags.push(' ');
            tags.push_str(&badge);
        }
        if !tags.is_empty() {
            println!("    Etiquetas: {}", tags);
        }
        println!("    → {}", card.action_label);
        println!();
    }

    println!("{} oportunidades", visible.len());
}

fn print_counts(repository: &OpportunityRepository) {
    let counts = grantinsight_core::count_by_status(repository.records());
    println!("{:<16} {:>4}", StatusFilter::All.label(), counts.all);
    for status in Status::ALL {
        println!("{:<16} {:>4}", status.tab_label(), counts.for_status(status));
    }
}

fn export(
    repository: &OpportunityRepository,
    path: &Path,
    search: &str,
    status: StatusFilter,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let visible = filter_opportunities(repository.records(), search, status);
    let format = Exporter::export_to_file(&visible, path, today)?;

    let overdue = visible
        .iter()
        .filter(|opp| days_remaining(opp.deadline, today) < 0)
        .count();
    println!(
        "Exported {} opportunities to {} ({})",
        visible.len(),
        path.display(),
        format.extension()
    );
    if overdue > 0 {
        println!("{} of them are past their deadline", overdue);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_dashboard() {
        let cli = Cli::try_parse_from(["grantinsight"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.today.is_none());
    }

    #[test]
    fn test_list_flags() {
        let cli = Cli::try_parse_from([
            "grantinsight",
            "list",
            "--search",
            "IA",
            "--status",
            "evaluando",
            "--today",
            "2024-04-10",
        ])
        .unwrap();

        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 4, 10));
        match cli.command {
            Some(Commands::List { search, status }) => {
                assert_eq!(search, "IA");
                assert_eq!(status, StatusFilter::Only(Status::Evaluating));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_bad_status_is_rejected() {
        assert!(Cli::try_parse_from(["grantinsight", "list", "--status", "archivada"]).is_err());
    }

    #[test]
    fn test_export_writes_filtered_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nuevas.csv");
        let repository = OpportunityRepository::from_source(&grantinsight_core::FixtureSource).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();

        export(&repository, &path, "", StatusFilter::Only(Status::New), today).unwrap();
        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("Horizonte Europa"));
    }
}
