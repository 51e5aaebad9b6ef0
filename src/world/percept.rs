use std::fmt;
use std::str::FromStr;

/// Team side as assigned by the server at init.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// +1 on the left side, -1 on the right; used to mirror x coordinates.
    pub fn x_sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Side::Left => "l",
            Side::Right => "r",
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Side, String> {
        match s {
            "l" => Ok(Side::Left),
            "r" => Ok(Side::Right),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Observer-relative polar coordinates. `None` means not observed this tick.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Polar {
    pub distance: Option<f32>,
    pub direction: Option<f32>,
}

impl Polar {
    pub fn new(distance: f32, direction: f32) -> Polar {
        Polar {
            distance: Some(distance),
            direction: Some(direction),
        }
    }

    pub fn direction_only(direction: f32) -> Polar {
        Polar {
            distance: None,
            direction: Some(direction),
        }
    }
}

/// Rate-of-change fields reported for mobile objects.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Motion {
    pub dist_change: Option<f32>,
    pub dir_change: Option<f32>,
    pub speed: Option<f32>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Ball {
    pub polar: Polar,
    pub motion: Motion,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Player {
    pub polar: Polar,
    pub motion: Motion,
    pub team: Option<String>,
    pub side: Option<Side>,
    pub uniform_number: Option<u8>,
    pub goalie: bool,
    pub body_direction: Option<f32>,
    pub neck_direction: Option<f32>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Flag {
    pub polar: Polar,
    pub flag_id: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Goal {
    pub polar: Polar,
    pub goal_id: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Line {
    pub polar: Polar,
    pub line_id: String,
}

/// Any single entity reported in a `see` message.
#[derive(Debug, PartialEq, Clone)]
pub enum Percept {
    Ball(Ball),
    Player(Player),
    Flag(Flag),
    Goal(Goal),
    Line(Line),
}

impl Percept {
    pub fn polar(&self) -> &Polar {
        match self {
            Percept::Ball(b) => &b.polar,
            Percept::Player(p) => &p.polar,
            Percept::Flag(f) => &f.polar,
            Percept::Goal(g) => &g.polar,
            Percept::Line(l) => &l.polar,
        }
    }
}

/// Everything seen in one perception tick, already split by kind.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Sighting {
    pub ball: Option<Ball>,
    pub flags: Vec<Flag>,
    pub goals: Vec<Goal>,
    pub players: Vec<Player>,
    pub lines: Vec<Line>,
}

impl Sighting {
    pub fn push(&mut self, percept: Percept) {
        match percept {
            // the server reports at most one ball; a later one wins
            Percept::Ball(b) => self.ball = Some(b),
            Percept::Player(p) => self.players.push(p),
            Percept::Flag(f) => self.flags.push(f),
            Percept::Goal(g) => self.goals.push(g),
            Percept::Line(l) => self.lines.push(l),
        }
    }
}

impl FromIterator<Percept> for Sighting {
    fn from_iter<I: IntoIterator<Item = Percept>>(iter: I) -> Sighting {
        let mut sighting = Sighting::default();
        for percept in iter {
            sighting.push(percept);
        }
        sighting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sighting_splits_percepts_by_kind() {
        let sighting: Sighting = vec![
            Percept::Flag(Flag {
                polar: Polar::new(10.0, 5.0),
                flag_id: "c".to_owned(),
            }),
            Percept::Ball(Ball {
                polar: Polar::new(3.0, -2.0),
                motion: Motion::default(),
            }),
            Percept::Player(Player::default()),
        ]
        .into_iter()
        .collect();

        assert_eq!(sighting.flags.len(), 1);
        assert_eq!(sighting.players.len(), 1);
        assert_eq!(sighting.ball.unwrap().polar.distance, Some(3.0));
    }

    #[test]
    fn side_parses_and_mirrors() {
        assert_eq!("l".parse::<Side>(), Ok(Side::Left));
        assert_eq!("r".parse::<Side>(), Ok(Side::Right));
        assert!("x".parse::<Side>().is_err());
        assert_eq!(Side::Right.x_sign(), -1.0);
        assert_eq!(Side::Left.opponent(), Side::Right);
    }
}
