use crate::behavior::formation;
use crate::error::ConfigError;
use crate::world::{ServerParameters, Side};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    pub team: String,
    pub version: u32,
}

impl Default for Server {
    fn default() -> Server {
        Server {
            host: "localhost".to_owned(),
            port: 6000,
            team: "soccerbot".to_owned(),
            version: 15,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
#[serde(default)]
pub struct Agent {
    /// Uniform number that takes our kick-offs.
    pub kicker: u8,
    /// Angular resolution of the heading clustering, in degrees.
    pub angle_step: u32,
    /// Think period in ms. Defaults to the server's `simulator_step`.
    pub think_period_ms: Option<u64>,
    pub seed: Option<u64>,
}

impl Default for Agent {
    fn default() -> Agent {
        Agent {
            kicker: formation::DEFAULT_KICKER,
            angle_step: 36,
            think_period_ms: None,
            seed: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
#[serde(default)]
pub struct Fleet {
    pub players: u8,
}

impl Default for Fleet {
    fn default() -> Fleet {
        Fleet { players: 11 }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Mode {
    /// A single player; `position` only labels the process.
    #[default]
    Agent,
    Fleet,
}

#[derive(Debug, PartialEq, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: Server,
    pub agent: Agent,
    pub fleet: Fleet,
    pub params: ServerParameters,

    #[serde(skip)]
    pub mode: Mode,
    #[serde(skip)]
    pub position: Option<u8>,
    /// File the config was read from, handed down to fleet children.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn think_period_ms(&self) -> u64 {
        self.agent.think_period_ms.unwrap_or(self.params.simulator_step)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;

        formation::kick_off_position(self.agent.kicker, Side::Left)?;
        if let Some(position) = self.position {
            formation::kick_off_position(position, Side::Left)?;
        }

        if self.agent.angle_step == 0 || self.agent.angle_step > 360 {
            return Err(ConfigError::InvalidParameter {
                name: "agent.angle_step",
                reason: format!("{} is not within 1..=360", self.agent.angle_step),
            });
        }
        if self.think_period_ms() == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "agent.think_period_ms",
                reason: "must be positive".to_owned(),
            });
        }
        if self.fleet.players == 0 || self.fleet.players > 11 {
            return Err(ConfigError::InvalidParameter {
                name: "fleet.players",
                reason: format!("{} is not within 1..=11", self.fleet.players),
            });
        }
        if self.server.team.is_empty() || self.server.team.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidParameter {
                name: "server.team",
                reason: format!("'{}' must be a single non-empty word", self.server.team),
            });
        }

        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "RoboCup 2D soccer agents")]
struct Args {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    host: Option<String>,

    #[arg(long, global = true)]
    port: Option<u16>,

    #[arg(long, global = true)]
    team: Option<String>,

    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single position
    Agent {
        #[arg(long)]
        position: Option<u8>,
    },
    /// Launch one agent process per position and supervise them
    Fleet {
        #[arg(long)]
        players: Option<u8>,
    },
}

fn load(args: Args) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = Config::from_yaml(&fs::read_to_string(path)?)?;
            config.source = Some(path.clone());
            config
        }
        None => match fs::read_to_string(DEFAULT_CONFIG) {
            Ok(string) => {
                let mut config = Config::from_yaml(&string)?;
                config.source = Some(PathBuf::from(DEFAULT_CONFIG));
                config
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("no {} found, using defaults", DEFAULT_CONFIG);
                Config::default()
            }
            Err(err) => return Err(err.into()),
        },
    };

    // Command line wins over the file
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(team) = args.team {
        config.server.team = team;
    }
    if let Some(seed) = args.seed {
        config.agent.seed = Some(seed);
    }

    match args.command {
        Some(Commands::Fleet { players }) => {
            config.mode = Mode::Fleet;
            if let Some(players) = players {
                config.fleet.players = players;
            }
        }
        Some(Commands::Agent { position }) => {
            config.mode = Mode::Agent;
            config.position = position;
        }
        None => config.mode = Mode::Agent,
    }

    config.validate()?;
    Ok(config)
}

pub fn read_from_disk() -> Result<Config, ConfigError> {
    let config = load(Args::parse())?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        team = %config.server.team,
        mode = ?config.mode,
        "configuration loaded"
    );
    Ok(config)
}
