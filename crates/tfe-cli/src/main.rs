//! Terminal adapter for the merge-puzzle engine: translates keystrokes to
//! directions, renders the board after each move, and offers "play again"
//! when the game ends. All game logic lives in `tfe-engine`.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use tfe_engine::{Direction, MoveOutcome, Rules, Session, Status};

#[derive(Parser, Debug)]
struct Args {
    /// Path to a TOML rules file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Board side length (overrides the rules file).
    #[arg(long)]
    size: Option<usize>,
    /// Fixed seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter, e.g. "info", "debug".
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new().parse_filters(&args.log).init();

    let mut rules = match &args.config {
        Some(path) => Rules::from_toml(path)
            .with_context(|| format!("loading rules from {}", path.display()))?,
        None => Rules::default(),
    };
    if let Some(size) = args.size {
        rules.size = size;
        rules.validate().context("invalid --size override")?;
    }

    let mut session = match args.seed {
        Some(seed) => Session::with_seed(rules, seed),
        None => Session::new(rules),
    };

    println!("Moves: w/a/s/d or up/left/down/right, q quits.");
    render(&session);

    // Set once a game ends; the next input answers "play again?".
    let mut awaiting_replay = false;

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        if awaiting_replay {
            if input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes") {
                session.new_game();
                awaiting_replay = false;
                render(&session);
            } else if input.eq_ignore_ascii_case("n") || input.eq_ignore_ascii_case("no") {
                break;
            } else {
                println!("Play again? (y/n)");
            }
            continue;
        }

        let direction = match input.parse::<Direction>() {
            Ok(direction) => direction,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };

        let outcome = session.apply_move(direction);
        report(&outcome);
        render(&session);

        if outcome.status.is_terminal() {
            match outcome.status {
                Status::Won => println!("You win!"),
                Status::Lost => println!("Game over — no moves left."),
                Status::Ongoing => unreachable!(),
            }
            println!("Play again? (y/n)");
            awaiting_replay = true;
        }
    }

    println!("Final score: {}", session.score());
    Ok(())
}

fn render(session: &Session) {
    print!("{}", session.board());
    println!("Score: {}", session.score());
}

fn report(outcome: &MoveOutcome) {
    if !outcome.moved {
        println!("(nothing moved)");
    } else if outcome.score_delta > 0 {
        println!("+{}", outcome.score_delta);
    }
}
