use apexbot::prelude::*;

pub const USAGE: &str = "用法：apex <指令> [参数]\n输入 'apex help' 查看帮助";
pub const DEFAULT_PLATFORM: &str = "PC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Help,
    Player,
    Uid,
    Matches,
    Leaderboard,
    Map,
    Store,
    Crafting,
    News,
    Status,
    Predator,
}

use Subcommand::*;

impl Subcommand {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "help" => Help,
            "player" | "p" => Player,
            "uid" => Uid,
            "matches" | "m" => Matches,
            "leaderboard" | "lb" => Leaderboard,
            "map" | "maps" => Map,
            "store" => Store,
            "crafting" => Crafting,
            "news" => News,
            "status" => Status,
            "predator" => Predator,
            _ => return None,
        })
    }

    /// Canonical name, also used as the reply tag.
    pub fn name(self) -> &'static str {
        match self {
            Help => "help",
            Player => "player",
            Uid => "uid",
            Matches => "matches",
            Leaderboard => "leaderboard",
            Map => "map",
            Store => "store",
            Crafting => "crafting",
            News => "news",
            Status => "status",
            Predator => "predator",
        }
    }

    pub fn usage(self) -> Option<&'static str> {
        match self {
            Player => Some("用法：apex player <玩家名> <平台(PC/PS4/X1)>"),
            Uid => Some("用法：apex uid <玩家名> <平台(PC/PS4/X1)>"),
            Matches => Some("用法：apex matches <玩家名> <平台(PC/PS4/X1)>"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub player: String,
    pub platform: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Player(Target),
    Uid(Target),
    Matches(Target),
    Leaderboard,
    Map,
    Store,
    Crafting,
    News,
    Status,
    Predator,
}

impl Invocation {
    pub fn subcommand(&self) -> Subcommand {
        match self {
            Invocation::Help => Help,
            Invocation::Player(_) => Player,
            Invocation::Uid(_) => Uid,
            Invocation::Matches(_) => Matches,
            Invocation::Leaderboard => Leaderboard,
            Invocation::Map => Map,
            Invocation::Store => Store,
            Invocation::Crafting => Crafting,
            Invocation::News => News,
            Invocation::Status => Status,
            Invocation::Predator => Predator,
        }
    }
}

/// Parses a full `apex <subcommand> [player] [platform]` line. Failures are `UserError`s
/// carrying the usage or unknown-command text.
pub fn parse(text: &str) -> Result<Invocation> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() < 2 {
        bail_user!("{}", USAGE);
    }

    let name = parts[1].to_lowercase();
    let sub = match Subcommand::from_name(&name) {
        Some(s) => s,
        None => bail_user!("未知指令：{}\n输入 'apex help' 查看帮助", name),
    };

    let args = &parts[2..];
    Ok(match sub {
        Help => Invocation::Help,
        Player => Invocation::Player(target(sub, args)?),
        Uid => Invocation::Uid(target(sub, args)?),
        Matches => Invocation::Matches(target(sub, args)?),
        Leaderboard => Invocation::Leaderboard,
        Map => Invocation::Map,
        Store => Invocation::Store,
        Crafting => Invocation::Crafting,
        News => Invocation::News,
        Status => Invocation::Status,
        Predator => Invocation::Predator,
    })
}

// Extra tokens after the platform are ignored; only `uid` may leave the platform out.
fn target(sub: Subcommand, args: &[&str]) -> Result<Target> {
    match (sub, args) {
        (_, [player, platform, ..]) => Ok(Target {
            player: player.to_string(),
            platform: platform.to_uppercase(),
        }),
        (Uid, [player]) => Ok(Target {
            player: player.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
        }),
        _ => bail_user!("{}", sub.usage().unwrap_or(USAGE)),
    }
}
