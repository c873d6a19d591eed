//! CLI entry point for the peer-review rating analyzer.
//!
//! Provides subcommands for the per-group overview, a single student's
//! ratings, per-student report export, normalized-table export, and the
//! companion rating page server.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use peer_rater::groups::GroupRoster;
use peer_rater::output::{
    export_all, log_group_overview, log_student_view, print_json, print_pretty,
    write_normalized_csv,
};
use peer_rater::server::{self, AppState};
use peer_rater::session::Session;
use peer_rater::summarize::LexiconModel;
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "peer_rater")]
#[command(about = "Analyze peer-evaluation ratings exported as CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show rating spread and member averages for every group
    Overview {
        /// Folder containing the rating CSVs
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Print JSON on stdout instead of log lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show ratings given and received by one student
    Student {
        /// Folder containing the rating CSVs
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Student name as it appears in the Reviewer column
        name: String,

        /// Print JSON on stdout instead of log lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the students found in a folder
    Students {
        /// Folder containing the rating CSVs
        #[arg(value_name = "DIR")]
        input: PathBuf,
    },
    /// Write the combined table with normalized scores to a CSV file
    Normalize {
        /// Folder containing the rating CSVs
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// CSV file to write
        #[arg(short, long, default_value = "normalized.csv")]
        output: PathBuf,
    },
    /// Export one JSON report per student (no PDF rendering)
    Export {
        /// Folder containing the rating CSVs
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Folder to write the JSON reports into, one `<student>_Report.json` each
        #[arg(short = 'd', long)]
        export_dir: Option<PathBuf>,
    },
    /// Serve the rating page and group-membership lookups
    Serve {
        /// JSON file mapping group names to member names
        #[arg(short, long, default_value = "groups.json")]
        groups: PathBuf,

        /// HTML page served at `/`
        #[arg(short, long, default_value = "static/rating.html")]
        page: PathBuf,

        /// Folder served under `/static/` (the page's script lives here)
        #[arg(short, long, default_value = "static")]
        static_dir: PathBuf,

        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/peer_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("peer_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let model = LexiconModel::default();

    match cli.command {
        Commands::Overview { input, json } => {
            let session = load(&input)?;
            let groups = session.group_overview();

            if json {
                print_json(&groups)?;
            } else {
                log_group_overview(&groups);
            }
        }
        Commands::Student { input, name, json } => {
            let session = load(&input)?;
            if !session.students().contains(&name) {
                warn!(student = %name, "Student gave no ratings in this folder");
            }
            let view = session.student_view(&name, &model);

            if json {
                print_json(&view)?;
            } else {
                print_pretty(&view);
                log_student_view(&view);
            }
        }
        Commands::Students { input } => {
            let session = load(&input)?;
            for student in session.students() {
                println!("{student}");
            }
            info!(total = session.students().len(), "Students listed");
        }
        Commands::Normalize { input, output } => {
            let session = load(&input)?;
            write_normalized_csv(&output, session.records())?;
            info!(
                rows = session.records().len(),
                output = %output.display(),
                "Normalized table written"
            );
        }
        Commands::Export { input, export_dir } => {
            let session = load(&input)?;
            let written = export_all(&session, export_dir.as_deref(), &model)?;
            info!(written, "Reports exported");
        }
        Commands::Serve {
            groups,
            page,
            static_dir,
            addr,
        } => {
            let roster = GroupRoster::load(&groups)?;
            info!(groups = roster.len(), roster = %groups.display(), "Roster loaded");
            server::serve(AppState::new(roster, page, static_dir), addr).await?;
        }
    }

    Ok(())
}

/// Loads a folder into a fresh session, refusing folders without any rows.
///
/// Reviewers whose points do not add up to 100 are warned about while loading.
fn load(input: &Path) -> Result<Session> {
    let session = Session::load(input)?;
    if session.is_empty() {
        bail!("No CSV rows found in {}", input.display());
    }
    Ok(session)
}
