use std::fmt;

/// Why an island command was refused.
///
/// Each variant renders as the translation key of the message shown to the
/// player.
#[derive(Debug)]
pub enum IslandError {
    /// The player already has or belongs to an island.
    AlreadyOnIsland,
    /// The target already has or belongs to an island.
    AlreadyOnOtherIsland,
    /// The player does not own an island.
    NoIslandOwned,
    /// The player owns the island they tried to leave.
    IslandOwned,
    /// The player neither owns nor belongs to an island.
    NoIsland,
    /// No pending invite from that player.
    NoInvite,
    /// The team has reached the configured size.
    IslandFull,
    /// The position lies outside the island's world border.
    OutsideBorder,
    /// No player with that name is known.
    UnknownPlayer(String),
    /// The input is not an island command.
    UnknownCommand,
    /// A required argument is missing or malformed.
    InvalidArgument,
    /// World generation or storage failed.
    Internal(anyhow::Error),
}

impl IslandError {
    /// The translation key shown to the player.
    #[must_use]
    pub const fn translation_key(&self) -> &'static str {
        match self {
            Self::AlreadyOnIsland => "gunpowder.island.already_on_island",
            Self::AlreadyOnOtherIsland => "gunpowder.island.already_on_other_island",
            Self::NoIslandOwned => "gunpowder.island.no_island_owned",
            Self::IslandOwned => "gunpowder.island.island_owned",
            Self::NoIsland => "gunpowder.island.no_island",
            Self::NoInvite => "gunpowder.island.no_invite",
            Self::IslandFull => "gunpowder.island.island_full",
            Self::OutsideBorder => "gunpowder.island.outside_border",
            Self::UnknownPlayer(_) => "argument.player.unknown",
            Self::UnknownCommand => "command.unknown.command",
            Self::InvalidArgument => "command.unknown.argument",
            Self::Internal(_) => "command.failed",
        }
    }
}

impl fmt::Display for IslandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlayer(name) => write!(f, "{} ({name})", self.translation_key()),
            Self::Internal(err) => write!(f, "{}: {err:#}", self.translation_key()),
            _ => f.write_str(self.translation_key()),
        }
    }
}

impl std::error::Error for IslandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Internal(err) => Some(&**err),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for IslandError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}
