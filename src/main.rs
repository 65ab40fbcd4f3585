//! Skirmish runner
//!
//! Builds two demo squads from the template registry, lets them trade
//! attacks and counterattacks for a number of rounds and prints the combat
//! logs. Several battles run in parallel, each on its own copy of the world.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use squad_tactics::combat::{squad_status, CombatLog, CombatResolver, SquadStatus};
use squad_tactics::core::error::Result;
use squad_tactics::core::{CombatConfig, SquadId, WorldPos};
use squad_tactics::ecs::World;
use squad_tactics::squad::{is_squad_destroyed, roster, squad_health_percent, TemplateRegistry};

/// Squad skirmish runner - seeded squad-vs-squad exchanges
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run seeded squad-vs-squad skirmishes and print the combat logs")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum exchange rounds per battle
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// Number of independent battles (run in parallel)
    #[arg(long, default_value_t = 1)]
    battles: u32,

    /// Combat config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Unit template JSON file (array of templates)
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct BattleReport {
    battle: u32,
    seed: u64,
    rounds_fought: u32,
    winner: String,
    red_status: SquadStatus,
    blue_status: SquadStatus,
    logs: Vec<CombatLog>,
}

struct Skirmish {
    world: World,
    red: SquadId,
    blue: SquadId,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("squad_tactics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => CombatConfig::load(path)?,
        None => CombatConfig::default(),
    };
    let registry = match &args.templates {
        Some(path) => TemplateRegistry::from_json_str(&fs::read_to_string(path)?)?,
        None => TemplateRegistry::with_defaults(),
    };

    let skirmish = build_skirmish(&registry)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Running {} battle(s) from seed {}", args.battles, seed);

    let reports: Vec<BattleReport> = (0..args.battles)
        .into_par_iter()
        .map(|battle| {
            let battle_seed = seed.wrapping_add(u64::from(battle));
            run_battle(&skirmish, &config, battle, battle_seed, args.rounds)
        })
        .collect();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                print!("{}", render_report(report));
            }
        }
    }
    Ok(())
}

fn build_skirmish(registry: &TemplateRegistry) -> Result<Skirmish> {
    let mut world = World::new();

    let red = roster::create_squad(&mut world, "Red Company", WorldPos::new(0, 0));
    let captain = roster::place_unit(&mut world, red, registry.require("captain")?, 1, 1)?;
    roster::set_leader(&mut world, red, captain)?;
    roster::place_unit(&mut world, red, registry.require("knight")?, 0, 0)?;
    roster::place_unit(&mut world, red, registry.require("shieldbearer")?, 0, 2)?;
    roster::place_unit(&mut world, red, registry.require("archer")?, 2, 0)?;
    roster::place_unit(&mut world, red, registry.require("mage")?, 2, 2)?;

    let blue = roster::create_squad(&mut world, "Blue Warband", WorldPos::new(1, 0));
    let warlord = roster::place_unit(&mut world, blue, registry.require("knight")?, 0, 2)?;
    roster::set_leader(&mut world, blue, warlord)?;
    roster::place_unit(&mut world, blue, registry.require("ogre")?, 0, 0)?;
    roster::place_unit(&mut world, blue, registry.require("crossbowman")?, 2, 2)?;

    Ok(Skirmish { world, red, blue })
}

fn run_battle(skirmish: &Skirmish, config: &CombatConfig, battle: u32, seed: u64, rounds: u32) -> BattleReport {
    let mut world = skirmish.world.clone();
    let (red, blue) = (skirmish.red, skirmish.blue);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut resolver = CombatResolver::new(config, &mut rng);

    let mut logs = Vec::new();
    let mut rounds_fought = 0;

    for _ in 0..rounds {
        if is_squad_destroyed(&world, red) || is_squad_destroyed(&world, blue) {
            break;
        }
        rounds_fought += 1;

        for (attacker, defender) in [(red, blue), (blue, red)] {
            if is_squad_destroyed(&world, attacker) {
                continue;
            }
            let attack = resolver.execute_squad_attack(&mut world, attacker, defender);
            let survived = !attack.target_destroyed;
            logs.push(attack.log);

            if survived {
                let counter = resolver.execute_squad_counterattack(&mut world, defender, attacker);
                logs.push(counter.log);
            }

            if let Some(squad) = world.squad_mut(attacker) {
                squad.turn_count += 1;
            }
        }
    }

    let winner = match (is_squad_destroyed(&world, red), is_squad_destroyed(&world, blue)) {
        (false, true) => "Red Company",
        (true, false) => "Blue Warband",
        (true, true) => "none",
        (false, false) => {
            let red_hp = squad_health_percent(&world, red);
            let blue_hp = squad_health_percent(&world, blue);
            if red_hp > blue_hp {
                "Red Company (on health)"
            } else if blue_hp > red_hp {
                "Blue Warband (on health)"
            } else {
                "draw"
            }
        }
    };

    BattleReport {
        battle,
        seed,
        rounds_fought,
        winner: winner.to_string(),
        red_status: squad_status(&world, red),
        blue_status: squad_status(&world, blue),
        logs,
    }
}

fn render_report(report: &BattleReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Battle {} (seed {}) - {} round(s), winner: {} ===",
        report.battle, report.seed, report.rounds_fought, report.winner
    );

    for log in &report.logs {
        let _ = writeln!(
            out,
            "\n{} -> {} (distance {})",
            log.attacker_name, log.defender_name, log.squad_distance
        );
        for event in &log.events {
            let hit = &event.hit_result;
            let _ = write!(
                out,
                "  #{:<2} {} -> {} at ({}, {}) [{}]: {:<7}",
                event.attack_index,
                event.attacker_id,
                event.defender_id,
                event.target_info.target_row,
                event.target_info.target_col,
                event.target_info.target_mode,
                hit.hit_type.to_string()
            );
            if hit.hit_type.landed() {
                let _ = write!(
                    out,
                    " base {} x{:.1} - res {} - cover {:.0}% = {} (HP {} -> {})",
                    event.base_damage,
                    event.crit_multiplier,
                    event.resistance,
                    event.cover.total_reduction * 100.0,
                    event.final_damage,
                    event.defender_hp_before,
                    event.defender_hp_after
                );
                if event.was_killed {
                    out.push_str(" KILLED");
                }
            } else {
                let _ = write!(out, " hit {}/{}", hit.hit_roll, hit.hit_threshold);
                if hit.dodge_roll > 0 {
                    let _ = write!(out, ", dodge {}/{}", hit.dodge_roll, hit.dodge_threshold);
                }
            }
            out.push('\n');
        }
        let status = &log.defender_status;
        let _ = writeln!(
            out,
            "  total {} damage, {} killed; {} {}/{} alive at {}% HP",
            log.total_damage,
            log.units_killed,
            log.defender_name,
            status.alive_units,
            status.total_units,
            status.average_hp_percent
        );
    }

    let _ = writeln!(
        out,
        "\nRed: {}/{} alive ({}% HP)  Blue: {}/{} alive ({}% HP)\n",
        report.red_status.alive_units,
        report.red_status.total_units,
        report.red_status.average_hp_percent,
        report.blue_status.alive_units,
        report.blue_status.total_units,
        report.blue_status.average_hp_percent
    );
    out
}
