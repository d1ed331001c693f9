use clap::{Parser, Subcommand};
use reviewscope::report::Summary;
use reviewscope::{catalog, ArtistGroup, ChartConfig, Event, LoadReport, Navigator, RowPolicy};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "reviewscope")]
#[command(author, version, about = "Rank artists by the average score of their reviewed albums")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Review table to rank (id,title,artist,date,score,link)
    path: Option<PathBuf>,

    /// Output report file (.html, .json, .csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail on the first malformed row instead of skipping it
    #[arg(long, global = true)]
    strict: bool,

    /// Chart settings (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging and skipped rows
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show summary
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive chart in the browser
    Serve {
        /// Review table to chart
        path: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Don't open a browser window
        #[arg(long)]
        no_open: bool,
    },

    /// Print one artist's albums as the detail view shows them
    Show {
        /// Review table
        path: PathBuf,

        /// Artist name (case-insensitive)
        artist: String,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => ChartConfig::load(path).unwrap_or_else(|e| fail(&e)),
        None => ChartConfig::default(),
    };
    let policy = if args.strict { RowPolicy::Strict } else { RowPolicy::Skip };

    if let Some(cmd) = args.command {
        match cmd {
            Command::Serve { path, port, no_open } => {
                if let Err(e) = reviewscope::serve::start(port, path, config, policy, !no_open) {
                    eprintln!("Server error: {}", e);
                    std::process::exit(1);
                }
            }
            Command::Show { path, artist } => {
                let report = load(&path, policy);
                show_artist(&report, &artist, config);
            }
        }
        return;
    }

    let path = if let Some(p) = args.path.clone() {
        p
    } else {
        eprintln!("Usage: reviewscope <PATH>");
        eprintln!("Run 'reviewscope --help' for more options.");
        std::process::exit(1);
    };

    let report = load(&path, policy);

    if !args.quiet {
        eprintln!("\x1b[1mReviewscope - Artist Ranking\x1b[0m");
        eprintln!("{}", "─".repeat(70));
        print_ranking(&report.groups);
    }

    if args.verbose {
        for row in &report.skipped {
            eprintln!("    \x1b[90mskipped {}\x1b[0m", row);
        }
    }

    print_summary(&Summary::from_report(&report));

    if let Some(ref output) = args.output {
        if let Err(e) = reviewscope::report::generate(output, &report, &config) {
            eprintln!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", output.display());
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "reviewscope=debug" } else { "reviewscope=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(err: &reviewscope::Error) -> ! {
    eprintln!("\x1b[31mError:\x1b[0m {}", err);
    std::process::exit(1);
}

fn load(path: &Path, policy: RowPolicy) -> LoadReport {
    catalog::load(path, policy).unwrap_or_else(|e| fail(&e))
}

fn print_ranking(groups: &[ArtistGroup]) {
    // Highest first on the terminal, matching the top of the chart
    for (rank, g) in groups.iter().rev().enumerate() {
        let color = match g.average_score.tenths() {
            t if t >= 80 => "\x1b[32m", // Green
            t if t >= 60 => "\x1b[33m", // Yellow
            _ => "\x1b[31m",            // Red
        };
        println!(
            "{:>4}. {}{:>5}\x1b[0m  {:>3} albums  {}",
            rank + 1,
            color,
            g.average_score.to_string(),
            g.albums.len(),
            g.artist
        );
    }
}

fn print_summary(summary: &Summary) {
    eprintln!("\n{}", "─".repeat(70));
    eprintln!("\x1b[1mSummary:\x1b[0m");
    eprintln!("  Artists ranked: {}", summary.artists);
    eprintln!("  Albums:         {}", summary.albums);
    eprintln!("  Reviews read:   {}", summary.reviews_read);
    if summary.skipped_rows > 0 {
        eprintln!("  \x1b[33mRows skipped:\x1b[0m   {}", summary.skipped_rows);
    }
    if let (Some(low), Some(high)) = (&summary.lowest, &summary.highest) {
        eprintln!("  Lowest:         {}", low);
        eprintln!("  Highest:        {}", high);
    }
}

fn show_artist(report: &LoadReport, name: &str, config: ChartConfig) {
    let index = match report
        .groups
        .iter()
        .position(|g| g.artist.eq_ignore_ascii_case(name))
    {
        Some(i) => i,
        None => {
            eprintln!("No ranked artist named {:?} (artists need at least {} reviews)", name, reviewscope::MIN_ALBUMS);
            std::process::exit(1);
        }
    };

    let mut nav = Navigator::new(&report.groups, config).unwrap_or_else(|e| fail(&e));
    nav.start();
    nav.handle(Event::Select { artist: index }).unwrap_or_else(|e| fail(&e));
    info!(artist = %name, "showing detail");

    let group = &report.groups[index];
    println!("\x1b[1m{}\x1b[0m  {}", group.artist, group.score_label());
    println!("{}", "─".repeat(70));

    let layout = match nav.detail_layout() {
        Some(layout) => layout,
        None => return,
    };
    debug!(path_length = layout.path_length, "detail stroke");

    for (album, marker) in group.albums.iter().zip(&layout.markers) {
        println!(
            "  {}  {:>2}/10  ({:>6.1},{:>6.1})  {}",
            album.date.format("%Y-%m-%d"),
            album.score,
            marker.center.x,
            marker.center.y,
            album.title
        );
    }
}
