use crate::world::percept::Side;
use std::fmt;
use std::str::FromStr;

/// Referee-controlled phase of the match. Exactly one is active at a time.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PlayMode {
    BeforeKickOff,
    PlayOn,
    TimeOver,
    KickOff(Side),
    KickIn(Side),
    FreeKick(Side),
    CornerKick(Side),
    GoalKick(Side),
    DropBall,
    Offside(Side),
}

impl PlayMode {
    pub const ALL: [PlayMode; 16] = [
        PlayMode::BeforeKickOff,
        PlayMode::PlayOn,
        PlayMode::TimeOver,
        PlayMode::KickOff(Side::Left),
        PlayMode::KickOff(Side::Right),
        PlayMode::KickIn(Side::Left),
        PlayMode::KickIn(Side::Right),
        PlayMode::FreeKick(Side::Left),
        PlayMode::FreeKick(Side::Right),
        PlayMode::CornerKick(Side::Left),
        PlayMode::CornerKick(Side::Right),
        PlayMode::GoalKick(Side::Left),
        PlayMode::GoalKick(Side::Right),
        PlayMode::DropBall,
        PlayMode::Offside(Side::Left),
        PlayMode::Offside(Side::Right),
    ];

    /// The string the referee uses for this mode.
    pub fn wire_code(&self) -> &'static str {
        match self {
            PlayMode::BeforeKickOff => "before_kick_off",
            PlayMode::PlayOn => "play_on",
            PlayMode::TimeOver => "time_over",
            PlayMode::KickOff(Side::Left) => "kick_off_l",
            PlayMode::KickOff(Side::Right) => "kick_off_r",
            PlayMode::KickIn(Side::Left) => "kick_in_l",
            PlayMode::KickIn(Side::Right) => "kick_in_r",
            PlayMode::FreeKick(Side::Left) => "free_kick_l",
            PlayMode::FreeKick(Side::Right) => "free_kick_r",
            PlayMode::CornerKick(Side::Left) => "corner_kick_l",
            PlayMode::CornerKick(Side::Right) => "corner_kick_r",
            PlayMode::GoalKick(Side::Left) => "goal_kick_l",
            PlayMode::GoalKick(Side::Right) => "goal_kick_r",
            PlayMode::DropBall => "drop_ball",
            PlayMode::Offside(Side::Left) => "offside_l",
            PlayMode::Offside(Side::Right) => "offside_r",
        }
    }
}

impl FromStr for PlayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<PlayMode, String> {
        PlayMode::ALL
            .iter()
            .find(|mode| mode.wire_code() == s)
            .copied()
            .ok_or_else(|| format!("unknown play mode '{}'", s))
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_code())
    }
}

/// Referee announcements that are not play modes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RefereeMessage {
    Foul(Side),
    GoalieCatchBall(Side),
    TimeUpWithoutATeam,
    TimeUp,
    HalfTime,
    TimeExtended,
    /// A goal for the given side, with that side's score so far.
    Goal(Side, u32),
}

impl FromStr for RefereeMessage {
    type Err = String;

    fn from_str(s: &str) -> Result<RefereeMessage, String> {
        let message = match s {
            "foul_l" => RefereeMessage::Foul(Side::Left),
            "foul_r" => RefereeMessage::Foul(Side::Right),
            "goalie_catch_ball_l" => RefereeMessage::GoalieCatchBall(Side::Left),
            "goalie_catch_ball_r" => RefereeMessage::GoalieCatchBall(Side::Right),
            "time_up_without_a_team" => RefereeMessage::TimeUpWithoutATeam,
            "time_up" => RefereeMessage::TimeUp,
            "half_time" => RefereeMessage::HalfTime,
            "time_extended" => RefereeMessage::TimeExtended,
            other => {
                let (side, count) = if let Some(count) = other.strip_prefix("goal_l_") {
                    (Side::Left, count)
                } else if let Some(count) = other.strip_prefix("goal_r_") {
                    (Side::Right, count)
                } else {
                    return Err(format!("unknown referee message '{}'", other));
                };

                let score = count
                    .parse::<u32>()
                    .map_err(|_| format!("bad goal count in '{}'", other))?;
                RefereeMessage::Goal(side, score)
            }
        };

        Ok(message)
    }
}

/// What a referee `hear` message turned out to be.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RefereeEvent {
    Mode(PlayMode),
    Message(RefereeMessage),
}

impl FromStr for RefereeEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<RefereeEvent, String> {
        if let Ok(mode) = s.parse::<PlayMode>() {
            return Ok(RefereeEvent::Mode(mode));
        }
        s.parse::<RefereeMessage>().map(RefereeEvent::Message)
    }
}
