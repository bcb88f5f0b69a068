//! Skirmish Headless Battle Simulator
//!
//! Plays seeded battles between an automatically driven player and a
//! generated opponent, using the same `run_battle` driver a real host uses,
//! and reports win rate and battle length for balance work.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --runs N          Battles with incrementing seeds (default: 1000)
//!   --seed N          Seed of the first battle (default: 42)
//!   --tier T          common | zone-boss | final-boss (default: common)
//!   --experience N    Player experience (default: 0)
//!   --points I,H,S,A  Intelligence,Health,Special,Abilities points
//!   --verbose         Print every combat log line
//!   --quiet           Only the final summary line

use skirmish::character::attributes::{Attributes, PrimaryAttribute};
use skirmish::character::player::Player;
use skirmish::combat::action::{ActionId, ActionKind, Catalogue};
use skirmish::combat::battle::{Battle, BattleOutcome, BattleSnapshot, Side};
use skirmish::combat::combatant::Combatant;
use skirmish::combat::host::{run_battle, BattleHost};
use skirmish::combat::types::{CombatLogEntry, Opponent, Tier};
use skirmish::core::config::SimConfig;
use tracing_subscriber::EnvFilter;

// ── CLI Configuration ────────────────────────────────────────────────

fn parse_args() -> SimConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                config.runs = args[i].parse().expect("--runs requires a number");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("--seed requires a number");
            }
            "--tier" => {
                i += 1;
                config.tier = parse_tier(&args[i]).unwrap_or_else(|| {
                    eprintln!("Unknown tier: {}", args[i]);
                    std::process::exit(1);
                });
            }
            "--experience" => {
                i += 1;
                config.experience = args[i].parse().expect("--experience requires a number");
            }
            "--points" => {
                i += 1;
                config.attributes = parse_points(&args[i]).unwrap_or_else(|| {
                    eprintln!("--points expects four comma-separated numbers, e.g. 1,1,1,1");
                    std::process::exit(1);
                });
            }
            "--verbose" => config.verbose = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    config
}

fn parse_tier(value: &str) -> Option<Tier> {
    match value {
        "common" => Some(Tier::Common),
        "zone-boss" => Some(Tier::ZoneBoss),
        "final-boss" => Some(Tier::FinalBoss),
        _ => None,
    }
}

fn parse_points(value: &str) -> Option<Attributes> {
    let points: Vec<u32> = value
        .split(',')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<_>>()?;
    match points.as_slice() {
        &[int, hlt, spc, abl] => Some(Attributes::from_points(int, hlt, spc, abl)),
        _ => None,
    }
}

fn print_usage() {
    eprintln!(
        "Skirmish Headless Battle Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --runs N          Battles with incrementing seeds (default: 1000)\n\
         \x20 --seed N          Seed of the first battle (default: 42)\n\
         \x20 --tier T          common | zone-boss | final-boss (default: common)\n\
         \x20 --experience N    Player experience (default: 0)\n\
         \x20 --points I,H,S,A  Intelligence,Health,Special,Abilities points\n\
         \x20 --verbose         Print every combat log line\n\
         \x20 --quiet           Only the final summary line\n\
         \x20 --help, -h        Show this help"
    );
}

// ── Automatic Player ─────────────────────────────────────────────────

/// Heals when low, keeps poison and protection up, otherwise hits as hard
/// as it can afford.
struct AutoPlayer {
    verbose: bool,
    crits: u64,
    outcome: Option<BattleOutcome>,
}

impl AutoPlayer {
    fn new(verbose: bool) -> Self {
        Self {
            verbose,
            crits: 0,
            outcome: None,
        }
    }

    fn best_of(available: &[ActionId], catalogue: &Catalogue, kind: ActionKind) -> Option<ActionId> {
        available
            .iter()
            .copied()
            .filter(|&id| catalogue.get(id).is_some_and(|a| a.kind == kind))
            .max_by(|&a, &b| {
                let (a, b) = (catalogue.get(a), catalogue.get(b));
                let a = a.map_or(0.0, |a| a.magnitude);
                let b = b.map_or(0.0, |b| b.magnitude);
                a.total_cmp(&b)
            })
    }
}

impl BattleHost for AutoPlayer {
    fn choose_action(&mut self, snapshot: &BattleSnapshot, available: &[ActionId], catalogue: &Catalogue) -> ActionId {
        let health = snapshot.player_health as f64 / snapshot.player_max_health.max(1) as f64;

        let preferences: &[ActionKind] = if health < 0.4 {
            &[ActionKind::Healing, ActionKind::Protection, ActionKind::Special, ActionKind::Hit]
        } else if health < 0.7 {
            &[ActionKind::Protection, ActionKind::Poison, ActionKind::Special, ActionKind::Hit]
        } else {
            &[ActionKind::Poison, ActionKind::Special, ActionKind::Hit]
        };

        preferences
            .iter()
            .find_map(|&kind| Self::best_of(available, catalogue, kind))
            .unwrap_or(ActionId(0))
    }

    fn post_message(&mut self, entry: &CombatLogEntry) {
        if entry.is_crit && entry.is_player_action {
            self.crits += 1;
        }
        if self.verbose {
            let side = if entry.is_player_action { ">" } else { "<" };
            println!("  {side} {}", entry.message);
        }
    }

    fn battle_ended(&mut self, outcome: BattleOutcome) {
        self.outcome = Some(outcome);
    }
}

// ── Simulation Statistics ────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct SimStats {
    battles: u64,
    wins: u64,
    total_turns: u64,
    min_turns: Option<u32>,
    max_turns: u32,
    total_health_left_on_win: u64,
    total_player_crits: u64,
    total_experience: u64,
}

impl SimStats {
    fn record(&mut self, battle: &Battle, host: &AutoPlayer) {
        let Some(outcome) = host.outcome else {
            return;
        };
        let turns = battle.turn();
        self.battles += 1;
        self.total_turns += turns as u64;
        self.min_turns = Some(self.min_turns.map_or(turns, |m| m.min(turns)));
        self.max_turns = self.max_turns.max(turns);
        self.total_player_crits += host.crits;
        if outcome.winner == Side::Player {
            self.wins += 1;
            self.total_health_left_on_win += battle.snapshot().player_health as u64;
            self.total_experience += outcome.experience_reward;
        }
    }

    fn ratio(numerator: u64, denominator: u64) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            numerator as f64 / denominator as f64
        }
    }
}

fn run_one(config: &SimConfig, run: u32) -> Option<(Battle, AutoPlayer)> {
    let battle_config = config.battle_config(run);
    let mut rolls = battle_config.rolls();

    let player = match Player::with_attributes("Sim", config.attributes, config.experience) {
        Ok(player) => player,
        Err(err) => {
            eprintln!("Invalid player: {err}");
            std::process::exit(1);
        }
    };
    let opponent = Opponent::generate(config.tier, config.experience, &mut rolls);

    if config.verbose {
        println!(
            "--- Run {} (seed={}): {} vs {} [{} hp] ---",
            run + 1,
            battle_config.seed.unwrap_or_default(),
            player.name,
            opponent.name,
            opponent.max_health(),
        );
    }

    let mut battle = Battle::start(player, opponent, Catalogue::builtin(), &battle_config);
    let mut host = AutoPlayer::new(config.verbose);
    match run_battle(&mut battle, &mut host, &mut rolls, &battle_config) {
        Ok(_) => Some((battle, host)),
        Err(err) => {
            tracing::error!(run, %err, "battle aborted");
            None
        }
    }
}

fn print_summary(stats: &SimStats, config: &SimConfig) {
    let win_rate = SimStats::ratio(stats.wins, stats.battles) * 100.0;
    let avg_turns = SimStats::ratio(stats.total_turns, stats.battles);

    if config.quiet {
        println!(
            "tier={} runs={} win_rate={win_rate:.1}% avg_turns={avg_turns:.1}",
            config.tier, stats.battles
        );
        return;
    }

    println!("============================================================");
    println!("  Skirmish Simulation Report  (seed={}, {} runs)", config.seed, stats.battles);
    println!("============================================================");
    println!();
    let points: Vec<String> = PrimaryAttribute::all()
        .iter()
        .map(|&attr| format!("{}={}", attr.abbrev(), config.attributes.get(attr)))
        .collect();
    println!("Player: experience={} {}", config.experience, points.join(" "));
    println!("Opponent tier: {}", config.tier);
    println!();
    println!("--- Results ---");
    println!("Win rate:          {win_rate:.1}% ({}/{})", stats.wins, stats.battles);
    println!(
        "Turns:             avg {avg_turns:.1}  min {}  max {}",
        stats.min_turns.unwrap_or(0),
        stats.max_turns
    );
    println!(
        "Health left (win): avg {:.0}",
        SimStats::ratio(stats.total_health_left_on_win, stats.wins)
    );
    println!(
        "Player crits:      avg {:.2} per battle",
        SimStats::ratio(stats.total_player_crits, stats.battles)
    );
    println!("Experience earned: {}", stats.total_experience);
}

fn main() {
    let config = parse_args();

    let level = if config.verbose {
        tracing::Level::DEBUG
    } else if config.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    if !config.quiet {
        eprintln!(
            "Skirmish Simulator: {} run(s) vs {}, seed={}, experience={}",
            config.runs, config.tier, config.seed, config.experience,
        );
    }

    let mut stats = SimStats::default();
    for run in 0..config.runs {
        if let Some((battle, host)) = run_one(&config, run) {
            stats.record(&battle, &host);
        }
    }

    print_summary(&stats, &config);
}
