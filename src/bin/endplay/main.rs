use clap::Parser;
use endplay::{
    analyze, render_steps, Card, Contract, Deal, Error, GameState, ParseCardError,
    ParseContractError, ParseHandError, SearchConfig, Seat, Tally,
};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "endplay")]
#[command(about = "Find strip-and-endplay lines in a bridge deal", long_about = None)]
struct Args {
    /// Deal in PBN, e.g. "N:.A3.2.4 .QJ.87. .5.3.AQ .K.9.K5"
    deal: String,

    /// Contract, e.g. "6S by S" or "3NTX W"
    #[arg(short, long)]
    contract: String,

    /// Cards already played from the deal, in order, e.g. "HA HQ H5 HK"
    #[arg(short, long, default_value = "")]
    played: String,

    /// Seat on lead when the deal is an ending rather than 13 cards each
    #[arg(short, long)]
    leader: Option<Seat>,

    /// Tricks won by the declaring side before the ending
    #[arg(long, default_value = "0")]
    declarer_tricks: u8,

    /// Tricks won by the defenders before the ending
    #[arg(long, default_value = "0")]
    defender_tricks: u8,

    /// Only try to endplay this defender
    #[arg(short, long)]
    target: Option<Seat>,

    /// Search nodes per target
    #[arg(short, long, env = "ENDPLAY_NODE_BUDGET")]
    budget: Option<u64>,

    /// Search both defenders in parallel
    #[arg(long)]
    parallel: bool,

    /// JSON file with search settings, overridden by flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Deal(#[from] ParseHandError),

    #[error(transparent)]
    Contract(#[from] ParseContractError),

    #[error("{0}: {1}")]
    Card(String, ParseCardError),

    #[error("Cannot read {0}: {1}")]
    Config(PathBuf, std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Analysis(#[from] Error),
}

impl Args {
    fn state(&self) -> Result<GameState, CliError> {
        let deal: Deal = self.deal.parse()?;
        let contract: Contract = self.contract.parse()?;

        let state = match self.leader {
            Some(leader) => {
                let tally = Tally::new(self.declarer_tricks, self.defender_tricks);
                GameState::from_ending(deal, contract, leader, tally)
            }
            None => GameState::new(deal, contract),
        }
        .map_err(Error::from)?;

        let cards = self
            .played
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|text| !text.is_empty())
            .map(|text| {
                text.parse::<Card>()
                    .map_err(|error| CliError::Card(text.to_owned(), error))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(state.replay(cards).map_err(Error::from)?)
    }

    fn config(&self) -> Result<SearchConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|error| CliError::Config(path.clone(), error))?;
                serde_json::from_str(&text)?
            }
            None => SearchConfig::default(),
        };

        if let Some(budget) = self.budget {
            config.node_budget = budget;
        }
        if self.target.is_some() {
            config.target = self.target;
        }
        config.parallel |= self.parallel;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let state = args.state()?;
    let config = args.config()?;
    log::debug!("analysing {} in {}", state.deal(), state.contract());

    let analysis = analyze(&state, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("{}", analysis.explanation.lines().next().unwrap_or_default());
    if analysis.feasible {
        for line in render_steps(&analysis.play_sequence)? {
            println!("  {line}");
        }
        if let Some(tricks) = analysis.projected_tricks {
            println!(
                "Declarer takes {tricks} tricks, needing {}",
                state.contract().target_tricks()
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("endplay: {error}");
            ExitCode::FAILURE
        }
    }
}
