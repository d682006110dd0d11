use std::process::ExitCode;

use agent::{
    client::Client,
    strategy::{Always, CounterLast, Cycle, RandomMove, Strategy},
};
use clap::{Parser, Subcommand, ValueEnum};
use common::{
    gateway::{DataGateway, HttpGateway, DEFAULT_API_URL},
    model::{
        game::{Choice, Winner},
        messages::RoundFilter,
    },
    utility::shutdown_signal,
};
use game_engine::{
    model::format::DEFAULT_FORMAT, GameError, HttpSession, RoundReport, SessionConfig,
};
use history::{HistoryStore, SqliteStore, Statistics, DEFAULT_CAPACITY};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn, Level};

const MAX_ROUNDS: u32 = 1000;

#[derive(Parser)]
#[command(name = "rps", about = "Rock, paper, scissors against the computer")]
struct Cli {
    /// Base url of the game backend
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,
    /// SQLite file holding the local match history
    #[arg(long, default_value = "history.db")]
    db: String,
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    history_capacity: usize,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play one match
    Play {
        #[arg(long, default_value = DEFAULT_FORMAT)]
        format: String,
        #[arg(long, value_enum, default_value_t = StrategyKind::Interactive)]
        strategy: StrategyKind,
    },
    /// List the rounds stored on the backend
    Rounds {
        #[arg(long, value_enum, default_value_t = FilterKind::All)]
        filter: FilterKind,
    },
    /// Show statistics over the local match history
    Stats,
    /// List the available match formats
    Formats,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyKind {
    Interactive,
    Rock,
    Paper,
    Scissors,
    Cycle,
    Counter,
    Random,
}

impl StrategyKind {
    fn build(self) -> Option<Box<dyn Strategy>> {
        match self {
            StrategyKind::Interactive => None,
            StrategyKind::Rock => Some(Box::new(Always(Choice::Rock))),
            StrategyKind::Paper => Some(Box::new(Always(Choice::Paper))),
            StrategyKind::Scissors => Some(Box::new(Always(Choice::Scissors))),
            StrategyKind::Cycle => Some(Box::new(Cycle {})),
            StrategyKind::Counter => Some(Box::new(CounterLast {})),
            StrategyKind::Random => Some(Box::new(RandomMove::new())),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterKind {
    All,
    Win,
    Loss,
    Draw,
}

impl From<FilterKind> for RoundFilter {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::All => RoundFilter::All,
            FilterKind::Win => RoundFilter::Only(Winner::Player),
            FilterKind::Loss => RoundFilter::Only(Winner::Cpu),
            FilterKind::Draw => RoundFilter::Only(Winner::Draw),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_max_level(level)
        .init();

    let result = match cli.command {
        Command::Play {
            ref format,
            strategy,
        } => {
            let config = SessionConfig {
                api_url: cli.api_url.clone(),
                db_url: cli.db.clone(),
                history_capacity: cli.history_capacity,
                format_id: format.clone(),
            };
            play(&config, strategy).await
        }
        Command::Rounds { filter } => rounds(&cli.api_url, filter.into()).await,
        Command::Stats => stats(&cli.db, cli.history_capacity),
        Command::Formats => {
            formats();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn play(config: &SessionConfig, strategy: StrategyKind) -> Result<(), GameError> {
    let mut session = HttpSession::connect(config)?;
    session.load_catalog().await?;
    info!(
        "Playing {} (first to {})",
        session.format().name(),
        session.format().wins_required()
    );

    let Some(strategy) = strategy.build() else {
        return play_interactive(&mut session).await;
    };
    let mut client = Client::new(session, strategy);
    client.play_match(MAX_ROUNDS, print_report).await?;
    Ok(())
}

async fn play_interactive(session: &mut HttpSession) -> Result<(), GameError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = async {
        match shutdown_signal().await {
            Ok(stop) => stop,
            Err(e) => {
                warn!("Cannot listen for shutdown signals: {}", e);
                std::future::pending().await
            }
        }
    };
    tokio::pin!(shutdown);

    println!("Pick rock, paper or scissors (or reset / quit)");
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = &mut shutdown => return Ok(()),
        };
        let Ok(Some(line)) = line else {
            return Ok(());
        };
        match line.trim() {
            "" => continue,
            "quit" => return Ok(()),
            "reset" => {
                session.reset();
                println!("New match: {}", session.format().name());
                continue;
            }
            pick => match session.select_choice(pick).await {
                Ok(report) => {
                    print_report(&report);
                    if report.completion.is_some() {
                        return Ok(());
                    }
                    println!("{} more win(s) needed", session.machine().remaining_rounds());
                }
                // The pick can be retried
                Err(e @ (GameError::InvalidChoice(_) | GameError::Gateway(_))) => {
                    println!("{}", e);
                }
                Err(e) => return Err(e),
            },
        }
    }
}

fn print_report(report: &RoundReport) {
    let outcome = &report.outcome;
    println!(
        "you: {:<8} cpu: {:<8} -> {:<6} [{} - {}]",
        outcome.player_choice,
        outcome.cpu_choice,
        outcome.winner,
        report.state.player_score,
        report.state.cpu_score
    );
    if let Some(completion) = &report.completion {
        println!(
            "{} wins the match {} after {} rounds",
            completion.winner,
            completion.final_score(),
            completion.rounds_played
        );
    }
}

async fn rounds(api_url: &str, filter: RoundFilter) -> Result<(), GameError> {
    let gateway = HttpGateway::new(api_url)?;
    let records = gateway.list_rounds().await?;
    for record in filter.apply(&records) {
        println!(
            "#{:<5} {:<22} {:<8} vs {:<8} {:?}",
            record.id, record.date, record.user_choice, record.cpu_choice, record.verdict
        );
    }
    Ok(())
}

fn stats(db_url: &str, capacity: usize) -> Result<(), GameError> {
    let history = HistoryStore::open(SqliteStore::open(db_url)?, capacity);
    print_statistics(&history.statistics());
    Ok(())
}

fn print_statistics(stats: &Statistics) {
    println!("matches:          {}", stats.total_matches);
    println!("player wins:      {}", stats.player_wins);
    println!("cpu wins:         {}", stats.cpu_wins);
    println!("success rate:     {:.1}%", stats.success_rate);
    println!("favourite format: {}", stats.favourite_format);
    for summary in &stats.recent {
        println!(
            "  {} {:<12} {:<6} {} in {} rounds ({}s)",
            summary.timestamp.date(),
            summary.format,
            summary.winner,
            summary.final_score,
            summary.rounds_played,
            summary.duration_seconds
        );
    }
}

fn formats() {
    for format in game_engine::MatchFormat::catalog() {
        println!(
            "{:<10} {:<12} first to {}",
            format.id(),
            format.name(),
            format.wins_required()
        );
    }
}
