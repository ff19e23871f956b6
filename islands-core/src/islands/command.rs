//! The `/island` command.
//!
//! ```text
//! island|is home [set]
//! island|is team add|remove|accept <player>
//! island|is transfer <player>
//! island|is leave|create|delete|seed
//! ```

use std::fmt;
use std::str::FromStr;

use islands_utils::{BlockPos, Identifier};
use uuid::Uuid;

use crate::islands::{IslandError, manager::IslandManager, players::PlayerDirectory};

const ISLAND_TRANSFERRED: &str = "gunpowder.island.island_transferred";
const ISLAND_DELETED: &str = "gunpowder.island.island_deleted";
const USER_INVITED: &str = "gunpowder.island.user_invited";
const LEAVE_ISLAND: &str = "gunpowder.island.leave_island";
const ACCEPT_INVITE: &str = "gunpowder.island.accept_invite";
const HOME_SET: &str = "gunpowder.island.home_set";
const SEED: &str = "gunpowder.island.seed";
const INVITE_FROM: &str = "gunpowder.island.invite_from";
const INVITE_ACCEPTED: &str = "gunpowder.island.invite_accepted";
const REMOVE_PLAYER: &str = "gunpowder.island.remove_player";
const ISLAND_REMOVE: &str = "gunpowder.island.island_remove";

/// A parsed `/island` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IslandCommand {
    /// Teleport to the island.
    Home,
    /// Make the current position the island spawn.
    SetHome,
    /// Invite a player to the team.
    TeamAdd(String),
    /// Remove a player from the team.
    TeamRemove(String),
    /// Accept an invite from a player.
    TeamAccept(String),
    /// Give the island to another player.
    Transfer(String),
    /// Leave the current team.
    Leave,
    /// Create an island.
    Create,
    /// Delete the owned island.
    Delete,
    /// Show the island seed.
    Seed,
}

fn player_arg<'a>(args: &mut impl Iterator<Item = &'a str>) -> Result<String, IslandError> {
    args.next()
        .map(str::to_owned)
        .ok_or(IslandError::InvalidArgument)
}

impl FromStr for IslandCommand {
    type Err = IslandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut args = input.trim().trim_start_matches('/').split_whitespace();
        if !matches!(args.next(), Some("island" | "is")) {
            return Err(IslandError::UnknownCommand);
        }

        let command = match args.next() {
            Some("home") => match args.next() {
                None => Self::Home,
                Some("set") => Self::SetHome,
                Some(_) => return Err(IslandError::InvalidArgument),
            },
            Some("team") => match args.next() {
                Some("add") => Self::TeamAdd(player_arg(&mut args)?),
                Some("remove") => Self::TeamRemove(player_arg(&mut args)?),
                Some("accept") => Self::TeamAccept(player_arg(&mut args)?),
                _ => return Err(IslandError::InvalidArgument),
            },
            Some("transfer") => Self::Transfer(player_arg(&mut args)?),
            Some("leave") => Self::Leave,
            Some("create") => Self::Create,
            Some("delete") => Self::Delete,
            Some("seed") => Self::Seed,
            _ => return Err(IslandError::UnknownCommand),
        };

        if args.next().is_some() {
            return Err(IslandError::InvalidArgument);
        }
        Ok(command)
    }
}

/// Who runs a command.
#[derive(Debug, Clone)]
pub struct CommandSource {
    /// The player's uuid.
    pub player: Uuid,
    /// The player's name.
    pub name: String,
    /// Where the player stands.
    pub position: BlockPos,
}

/// A translatable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The translation key.
    pub key: &'static str,
    /// Values substituted into the translation.
    pub args: Vec<String>,
}

impl Reply {
    /// A message without arguments.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            args: Vec::new(),
        }
    }

    /// A message with one argument.
    #[must_use]
    pub fn with_arg(key: &'static str, arg: impl ToString) -> Self {
        Self {
            key,
            args: vec![arg.to_string()],
        }
    }
}

impl From<&IslandError> for Reply {
    fn from(err: &IslandError) -> Self {
        match err {
            IslandError::UnknownPlayer(name) => Self::with_arg(err.translation_key(), name),
            _ => Self::new(err.translation_key()),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)?;
        if !self.args.is_empty() {
            write!(f, " [{}]", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// What a successful command produced.
#[derive(Debug, Default)]
pub struct CommandOutcome {
    /// Messages for the player who ran the command.
    pub replies: Vec<Reply>,
    /// Messages for other players.
    pub notifications: Vec<(Uuid, Reply)>,
    /// Where to send the player who ran the command.
    pub teleport: Option<(Identifier, BlockPos)>,
}

impl CommandOutcome {
    fn reply(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            ..Self::default()
        }
    }

    fn notify(mut self, player: Uuid, reply: Reply) -> Self {
        self.notifications.push((player, reply));
        self
    }
}

impl IslandCommand {
    /// Runs the command for `source`.
    ///
    /// # Errors
    /// Returns the reason the command was refused.
    pub fn execute(
        &self,
        manager: &IslandManager,
        players: &PlayerDirectory,
        source: &CommandSource,
    ) -> Result<CommandOutcome, IslandError> {
        let lookup = |name: &str| {
            players
                .uuid_of(name)
                .ok_or_else(|| IslandError::UnknownPlayer(name.to_owned()))
        };

        let outcome = match self {
            Self::Home => CommandOutcome {
                teleport: Some(manager.home(source.player)?),
                ..CommandOutcome::default()
            },
            Self::SetHome => {
                manager.set_home(source.player, source.position)?;
                CommandOutcome::reply(Reply::new(HOME_SET))
            }
            Self::TeamAdd(name) => {
                let target = lookup(name)?;
                manager.invite(source.player, target)?;
                CommandOutcome::reply(Reply::new(USER_INVITED))
                    .notify(target, Reply::with_arg(INVITE_FROM, &source.name))
            }
            Self::TeamRemove(name) => {
                let target = lookup(name)?;
                manager.remove_member(source.player, target)?;
                CommandOutcome::reply(Reply::with_arg(REMOVE_PLAYER, name))
                    .notify(target, Reply::with_arg(ISLAND_REMOVE, &source.name))
            }
            Self::TeamAccept(name) => {
                let from = lookup(name)?;
                manager.accept_invite(source.player, from)?;
                CommandOutcome::reply(Reply::new(ACCEPT_INVITE))
                    .notify(from, Reply::with_arg(INVITE_ACCEPTED, &source.name))
            }
            Self::Transfer(name) => {
                let target = lookup(name)?;
                manager.transfer_island(source.player, target)?;
                CommandOutcome::reply(Reply::new(ISLAND_TRANSFERRED))
            }
            Self::Leave => {
                manager.leave_island(source.player)?;
                CommandOutcome::reply(Reply::new(LEAVE_ISLAND))
            }
            Self::Create => {
                manager.create_island(source.player)?;
                CommandOutcome {
                    teleport: Some(manager.home(source.player)?),
                    ..CommandOutcome::default()
                }
            }
            Self::Delete => {
                manager.delete_island(source.player)?;
                CommandOutcome::reply(Reply::new(ISLAND_DELETED))
            }
            Self::Seed => CommandOutcome::reply(Reply::with_arg(SEED, manager.seed(source.player)?)),
        };
        Ok(outcome)
    }

    /// Parses and runs `input`, turning a refusal into the reply the player
    /// sees.
    pub fn dispatch(
        input: &str,
        manager: &IslandManager,
        players: &PlayerDirectory,
        source: &CommandSource,
    ) -> CommandOutcome {
        match input
            .parse::<Self>()
            .and_then(|command| command.execute(manager, players, source))
        {
            Ok(outcome) => outcome,
            Err(err) => {
                if let IslandError::Internal(inner) = &err {
                    log::error!("Island command `{input}` failed for {}: {inner:#}", source.name);
                }
                CommandOutcome::reply(Reply::from(&err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{IslandsConfig, IslandsSettings};
    use crate::islands::registry::IslandRegistry;

    fn setup() -> (IslandManager, PlayerDirectory) {
        let manager = IslandManager::new(
            Arc::new(IslandsSettings::in_memory(IslandsConfig::default())),
            IslandRegistry::default(),
            None,
        );
        (manager, PlayerDirectory::new())
    }

    fn source(players: &PlayerDirectory, name: &str) -> CommandSource {
        CommandSource {
            player: players.join(name),
            name: name.to_owned(),
            position: BlockPos::new(1, 70, 1),
        }
    }

    fn keys(outcome: &CommandOutcome) -> Vec<&'static str> {
        outcome.replies.iter().map(|reply| reply.key).collect()
    }

    #[test]
    fn test_parse() {
        assert_eq!("/island home".parse::<IslandCommand>().unwrap(), IslandCommand::Home);
        assert_eq!("is home set".parse::<IslandCommand>().unwrap(), IslandCommand::SetHome);
        assert_eq!(
            "is team add Steve".parse::<IslandCommand>().unwrap(),
            IslandCommand::TeamAdd("Steve".into())
        );
        assert_eq!(
            "island transfer Alex".parse::<IslandCommand>().unwrap(),
            IslandCommand::Transfer("Alex".into())
        );
        assert!(matches!(
            "island team add".parse::<IslandCommand>(),
            Err(IslandError::InvalidArgument)
        ));
        assert!(matches!(
            "island leave now".parse::<IslandCommand>(),
            Err(IslandError::InvalidArgument)
        ));
        assert!(matches!(
            "island fly".parse::<IslandCommand>(),
            Err(IslandError::UnknownCommand)
        ));
        assert!(matches!(
            "spawn".parse::<IslandCommand>(),
            Err(IslandError::UnknownCommand)
        ));
    }

    #[test]
    fn test_create_then_home() {
        let (manager, players) = setup();
        let alex = source(&players, "Alex");

        let outcome = IslandCommand::dispatch("is create", &manager, &players, &alex);
        let (dimension, pos) = outcome.teleport.unwrap();
        assert!(crate::islands::is_island_dimension(&dimension));
        assert_eq!(pos, BlockPos::new(2, 67, 2));

        let outcome = IslandCommand::dispatch("is create", &manager, &players, &alex);
        assert_eq!(keys(&outcome), ["gunpowder.island.already_on_island"]);

        let outcome = IslandCommand::dispatch("is home set", &manager, &players, &alex);
        assert_eq!(keys(&outcome), [HOME_SET]);
        let outcome = IslandCommand::dispatch("is home", &manager, &players, &alex);
        assert_eq!(outcome.teleport.unwrap().1, alex.position);
    }

    #[test]
    fn test_team_messages() {
        let (manager, players) = setup();
        let alex = source(&players, "Alex");
        let steve = source(&players, "Steve");
        IslandCommand::dispatch("is create", &manager, &players, &alex);

        let outcome = IslandCommand::dispatch("is team add steve", &manager, &players, &alex);
        assert_eq!(keys(&outcome), [USER_INVITED]);
        assert_eq!(
            outcome.notifications,
            vec![(steve.player, Reply::with_arg(INVITE_FROM, "Alex"))]
        );

        let outcome = IslandCommand::dispatch("is team accept Alex", &manager, &players, &steve);
        assert_eq!(keys(&outcome), [ACCEPT_INVITE]);
        assert_eq!(outcome.notifications[0].0, alex.player);

        let outcome = IslandCommand::dispatch("is seed", &manager, &players, &steve);
        assert_eq!(outcome.replies[0].key, SEED);
        assert_eq!(outcome.replies[0].args, vec![manager.seed(alex.player).unwrap().to_string()]);

        let outcome = IslandCommand::dispatch("is leave", &manager, &players, &alex);
        assert_eq!(keys(&outcome), ["gunpowder.island.island_owned"]);

        let outcome = IslandCommand::dispatch("is team remove Steve", &manager, &players, &alex);
        assert_eq!(outcome.replies[0], Reply::with_arg(REMOVE_PLAYER, "Steve"));
        assert!(!manager.has_island(steve.player));
    }

    #[test]
    fn test_unknown_player() {
        let (manager, players) = setup();
        let alex = source(&players, "Alex");
        IslandCommand::dispatch("is create", &manager, &players, &alex);
        let outcome = IslandCommand::dispatch("is transfer Herobrine", &manager, &players, &alex);
        assert_eq!(
            outcome.replies,
            vec![Reply::with_arg("argument.player.unknown", "Herobrine")]
        );
        assert!(manager.has_own_island(alex.player));
    }

    #[test]
    fn test_delete() {
        let (manager, players) = setup();
        let alex = source(&players, "Alex");
        let outcome = IslandCommand::dispatch("is delete", &manager, &players, &alex);
        assert_eq!(keys(&outcome), ["gunpowder.island.no_island_owned"]);
        IslandCommand::dispatch("is create", &manager, &players, &alex);
        let outcome = IslandCommand::dispatch("is delete", &manager, &players, &alex);
        assert_eq!(keys(&outcome), [ISLAND_DELETED]);
        assert_eq!(manager.island_count(), 0);
    }
}
