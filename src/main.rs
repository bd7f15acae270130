use std::io::{stdin, stdout, BufRead, Write};

use anyhow::{anyhow, Context, Result};
use scorebook::api::client::ApiClient;
use scorebook::api::session::{EditSession, SessionState};
use scorebook::config::Config;
use scorebook::{PlateAppearanceKey, PlateAppearanceRecord, ScorerAction, Snapshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
counts:  b+  b-  balls N  clear-balls  s+ [w|s|u|bs]  s- [w|s|u|bs]  strikes N  clear-strikes  f+  f-
outcome: why CODE  why -  init N  final N  final -  out N  sb N  ha N
fielders: hit-to N  pa-err N  br-err N   (use - to clear)
batter:  player ID  jersey NUMBER
editor:  show  save  delete  help  quit";

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorebook=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = main0() {
        eprintln!("Error while scoring plate appearance: {e:#}");
        std::process::exit(1);
    }
}

fn main0() -> Result<()> {
    let config = Config::from_env()?;
    let key = parse_key(std::env::args().skip(1))?;
    let client = ApiClient::new(&config);
    let record = client.load(key)?.unwrap_or_else(|| PlateAppearanceRecord::new(key));
    let mut session = EditSession::open(record);

    println!("Scoring {key}");
    println!("{}", session.record());

    let stdin = stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout().flush()?;
        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line.context("Could not read scoring command")?;
        let line = line.trim();
        match line {
            "" => continue,
            "help" | "?" => println!("{HELP}"),
            "show" => print_snapshot(&session.record().snapshot()),
            "quit" | "q" => {
                let abandoned = session.abandon();
                println!("Closed {} without saving", abandoned.key());
                return Ok(());
            }
            "save" => match client.save(&mut session) {
                Ok(()) => {
                    println!("Saved: {}", session.record());
                    return Ok(());
                }
                Err(e) => eprintln!("{e:#}\nNothing was lost; fix the problem and save again."),
            },
            "delete" => match client.delete(key) {
                Ok(()) => {
                    println!("Deleted {key}");
                    return Ok(());
                }
                Err(e) => eprintln!("{e:#}"),
            },
            command => match command.parse::<ScorerAction>() {
                Ok(action) => {
                    if session.apply(action) {
                        println!("{}", session.record());
                    } else if session.state() == SessionState::Saving {
                        eprintln!("A save is in progress; wait for it to finish.");
                    }
                }
                Err(e) => eprintln!("{e}"),
            },
        }
    }
}

fn parse_key(mut args: impl Iterator<Item = String>) -> Result<PlateAppearanceKey> {
    let mut next = |name: &str| args.next().with_context(|| format!("Missing {name}; usage: scorebook <game id> <inning> <top|bot> <batter seq>"));
    let game_id = next("game id")?.parse::<i64>().context("Game id must be a number")?;
    let inning = next("inning")?.parse::<u8>().context("Inning must be a number")?;
    let top = match &*next("inning half")?.to_ascii_lowercase() {
        "top" | "t" => true,
        "bot" | "bottom" | "b" => false,
        other => return Err(anyhow!("Inning half must be 'top' or 'bot', got '{other}'")),
    };
    let batter_seq = next("batter seq")?.parse::<u32>().context("Batter seq must be a number")?;
    Ok(PlateAppearanceKey { game_id, inning, top, batter_seq })
}

fn print_snapshot(snapshot: &Snapshot) {
    let Snapshot {
        balls,
        strikes,
        strikes_watching,
        strikes_swinging,
        strikes_unsure,
        ball_swinging,
        fouls,
        fouls_after_two_strikes,
        pitch_count,
        why,
        code,
        category,
        color,
        initial_base,
        final_base,
        out_at,
        stolen_bases,
        hit_around_bases,
        out,
    } = snapshot;

    println!("Count:    {balls}-{strikes} ({strikes_watching} watching, {strikes_swinging} swinging, {strikes_unsure} unsure, {ball_swinging} ball swinging)");
    println!("Fouls:    {fouls} ({fouls_after_two_strikes} after two strikes)");
    println!("Pitches:  {pitch_count}");
    println!("Why:      {}", why.map_or("-", |why| why.as_str()));
    println!("Result:   {code} [{category}, {color}]");
    println!("Bases:    reached {initial_base}, final {}, out at {out_at}", final_base.map_or("-".to_owned(), |base| base.to_string()));
    println!("Stolen:   {stolen_bases}");
    println!("Hit on:   {hit_around_bases}");
    println!("Out:      {}", if *out { "yes" } else { "no" });
}
