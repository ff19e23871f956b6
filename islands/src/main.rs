//! Sky-island server entry point.
//!
//! Loads the configuration and island database, prepares the spawn area of
//! every island and then reads island commands from the console:
//!
//! ```text
//! as <player> island create
//! reload
//! worlds
//! stop
//! ```

mod spawn_progress;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use islands_core::config::IslandsSettings;
use islands_core::islands::{
    command::{CommandOutcome, CommandSource, IslandCommand},
    manager::IslandManager,
    players::PlayerDirectory,
};
use islands_utils::BlockPos;
use rustc_hash::FxHashMap;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

const DEFAULT_CONFIG: &str = "islands.json";
const DEFAULT_DATABASE: &str = "islands-db.json";

/// Config path from the first argument, then `ISLANDS_CONFIG`.
fn config_path() -> PathBuf {
    env::args()
        .nth(1)
        .or_else(|| env::var("ISLANDS_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG.to_owned())
        .into()
}

fn database_path() -> PathBuf {
    env::var("ISLANDS_DATABASE")
        .unwrap_or_else(|_| DEFAULT_DATABASE.to_owned())
        .into()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Arc::new(IslandsSettings::load(config_path())?);
    let manager = Arc::new(IslandManager::open(Arc::clone(&settings), database_path())?);

    let loaded = tokio::task::spawn_blocking({
        let manager = Arc::clone(&manager);
        move || manager.load_all()
    })
    .await??;
    log::info!(
        "Loaded {loaded} islands ({} worlds)",
        manager.dimensions().world_count()
    );

    for key in manager.dimensions().world_keys() {
        if manager.dimensions().overworld_of(&key).is_some() {
            continue;
        }
        if let Some(world) = manager.dimensions().get_world(&key) {
            spawn_progress::generate_spawn_chunks(&world).await?;
        }
    }

    Console::new(manager, settings).run().await
}

/// Reads commands from stdin and runs them as players.
struct Console {
    manager: Arc<IslandManager>,
    settings: Arc<IslandsSettings>,
    players: Arc<PlayerDirectory>,
    positions: FxHashMap<Uuid, BlockPos>,
}

impl Console {
    fn new(manager: Arc<IslandManager>, settings: Arc<IslandsSettings>) -> Self {
        Self {
            manager,
            settings,
            players: Arc::new(PlayerDirectory::new()),
            positions: FxHashMap::default(),
        }
    }

    async fn run(mut self) -> anyhow::Result<()> {
        log::info!("Ready. Type `as <player> <command>`, `reload`, `worlds` or `stop`");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            match line.split_once(' ') {
                _ if line == "stop" => break,
                _ if line == "reload" => {
                    if let Err(err) = self.settings.reload() {
                        log::error!("Failed to reload config: {err:#}");
                    }
                }
                _ if line == "worlds" => {
                    for key in self.manager.dimensions().world_keys() {
                        log::info!("{key}");
                    }
                }
                Some(("as", rest)) => match rest.trim().split_once(' ') {
                    Some((name, command)) => self.run_as(name, command).await?,
                    None => log::warn!("Usage: as <player> <command>"),
                },
                _ if line.is_empty() => {}
                _ => log::warn!("Unknown console command `{line}`"),
            }
        }
        log::info!("Stopping");
        Ok(())
    }

    async fn run_as(&mut self, name: &str, command: &str) -> anyhow::Result<()> {
        let player = self.players.join(name);
        let source = CommandSource {
            player,
            name: name.to_owned(),
            position: self
                .positions
                .get(&player)
                .copied()
                .unwrap_or(BlockPos::ORIGIN),
        };

        let outcome = tokio::task::spawn_blocking({
            let manager = Arc::clone(&self.manager);
            let players = Arc::clone(&self.players);
            let command = command.to_owned();
            move || IslandCommand::dispatch(&command, &manager, &players, &source)
        })
        .await?;

        self.show(name, player, outcome);
        Ok(())
    }

    fn show(&mut self, name: &str, player: Uuid, outcome: CommandOutcome) {
        for reply in &outcome.replies {
            log::info!("[{name}] {reply}");
        }
        for (target, reply) in &outcome.notifications {
            let target_name = self
                .players
                .name_of(*target)
                .unwrap_or_else(|| target.to_string());
            log::info!("[{target_name}] {reply}");
        }
        if let Some((dimension, pos)) = outcome.teleport {
            log::info!("{name} teleported to {pos} in {dimension}");
            self.positions.insert(player, pos);
        }
    }
}
