//! rcssserver s-expression messages.
//!
//! The server measures angles clockwise; every direction is negated here so
//! the rest of the crate can work counter-clockwise.

use crate::error::TransportError;
use crate::transport::ServerMessage;
use crate::world::{
    ActionCounts, Ball, BodyState, Flag, Goal, Line, Motion, Percept, PlayMode, Player, Polar, Side, Sighting,
};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, PartialEq, Clone)]
pub enum Sexp {
    Atom(String),
    List(Vec<Sexp>),
}

impl Sexp {
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Sexp::Atom(atom) => Some(atom),
            Sexp::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::Atom(_) => None,
            Sexp::List(items) => Some(items),
        }
    }
}

fn parse_error(msg: impl Into<String>) -> TransportError {
    TransportError::Parse(msg.into())
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while matches!(chars.peek(), Some(c) if c.is_whitespace() || *c == '\0') {
        chars.next();
    }
}

fn read_sexp(chars: &mut Peekable<Chars<'_>>) -> Result<Sexp, TransportError> {
    skip_whitespace(chars);
    match chars.next() {
        None => Err(parse_error("unexpected end of message")),
        Some(')') => Err(parse_error("unbalanced ')'")),
        Some('(') => {
            let mut items = Vec::new();
            loop {
                skip_whitespace(chars);
                match chars.peek() {
                    None => return Err(parse_error("unterminated list")),
                    Some(')') => {
                        chars.next();
                        return Ok(Sexp::List(items));
                    }
                    Some(_) => items.push(read_sexp(chars)?),
                }
            }
        }
        Some('"') => {
            let mut atom = String::new();
            for c in chars.by_ref() {
                if c == '"' {
                    return Ok(Sexp::Atom(atom));
                }
                atom.push(c);
            }
            Err(parse_error("unterminated string"))
        }
        Some(first) => {
            let mut atom = first.to_string();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '(' || c == ')' || c == '\0' {
                    break;
                }
                atom.push(c);
                chars.next();
            }
            Ok(Sexp::Atom(atom))
        }
    }
}

/// Parses exactly one expression; trailing NUL padding is ignored.
pub fn parse_sexp(text: &str) -> Result<Sexp, TransportError> {
    let mut chars = text.chars().peekable();
    let sexp = read_sexp(&mut chars)?;
    skip_whitespace(&mut chars);
    match chars.peek() {
        None => Ok(sexp),
        Some(c) => Err(parse_error(format!("trailing input at '{}'", c))),
    }
}

fn atom<'a>(items: &'a [Sexp], index: usize, what: &str) -> Result<&'a str, TransportError> {
    items
        .get(index)
        .and_then(Sexp::as_atom)
        .ok_or_else(|| parse_error(format!("missing {}", what)))
}

fn number<T: std::str::FromStr>(text: &str, what: &str) -> Result<T, TransportError> {
    text.parse::<T>()
        .map_err(|_| parse_error(format!("bad {} '{}'", what, text)))
}

fn numbers(items: &[Sexp]) -> Vec<f32> {
    items
        .iter()
        .filter_map(Sexp::as_atom)
        .filter_map(|atom| atom.parse::<f32>().ok())
        .collect()
}

fn polar_of(values: &[f32]) -> Polar {
    match values {
        [] => Polar::default(),
        [direction] => Polar::direction_only(-direction),
        [distance, direction, ..] => Polar::new(*distance, -direction),
    }
}

fn motion_of(values: &[f32]) -> Motion {
    Motion {
        dist_change: values.get(2).copied(),
        dir_change: values.get(3).map(|d| -d),
        speed: None,
    }
}

fn see_object(entry: &[Sexp], sighting: &mut Sighting) -> Result<(), TransportError> {
    let (name, values) = entry
        .split_first()
        .ok_or_else(|| parse_error("empty object in see"))?;
    let name = name
        .as_list()
        .ok_or_else(|| parse_error("object name is not a list"))?;
    let parts: Vec<&str> = name.iter().filter_map(Sexp::as_atom).collect();
    let values = numbers(values);
    let polar = polar_of(&values);

    let (kind, rest) = parts
        .split_first()
        .ok_or_else(|| parse_error("object without a name"))?;

    match kind.to_ascii_lowercase().as_str() {
        "b" => sighting.push(Percept::Ball(Ball {
            polar,
            motion: motion_of(&values),
        })),
        "f" => sighting.push(Percept::Flag(Flag {
            polar,
            flag_id: rest.concat(),
        })),
        "g" => {
            let side = rest.concat();
            // the goal centre doubles as a landmark
            sighting.push(Percept::Flag(Flag {
                polar,
                flag_id: format!("g{}", side),
            }));
            sighting.push(Percept::Goal(Goal { polar, goal_id: side }));
        }
        "l" => sighting.push(Percept::Line(Line {
            polar,
            line_id: rest.concat(),
        })),
        "p" => sighting.push(Percept::Player(Player {
            polar,
            motion: motion_of(&values),
            team: rest.first().map(|team| team.to_string()),
            side: None,
            uniform_number: rest.get(1).and_then(|unum| unum.parse().ok()),
            goalie: rest.get(2) == Some(&"goalie"),
            body_direction: values.get(4).map(|d| -d),
            neck_direction: values.get(5).map(|d| -d),
        })),
        other => return Err(parse_error(format!("unknown object '{}'", other))),
    }

    Ok(())
}

fn see(rest: &[Sexp]) -> Result<ServerMessage, TransportError> {
    let time = number(atom(rest, 0, "see time")?, "see time")?;
    let mut sighting = Sighting::default();

    for entry in &rest[1..] {
        let entry = entry
            .as_list()
            .ok_or_else(|| parse_error("see object is not a list"))?;
        see_object(entry, &mut sighting)?;
    }

    Ok(ServerMessage::See { time, sighting })
}

fn hear(rest: &[Sexp]) -> Result<ServerMessage, TransportError> {
    let time = number(atom(rest, 0, "hear time")?, "hear time")?;
    let sender = atom(rest, 1, "hear sender")?.to_owned();
    let message = rest
        .last()
        .filter(|_| rest.len() > 2)
        .and_then(Sexp::as_atom)
        .ok_or_else(|| parse_error("missing hear message"))?
        .to_owned();

    Ok(ServerMessage::Hear { time, sender, message })
}

fn init(rest: &[Sexp]) -> Result<ServerMessage, TransportError> {
    let side = atom(rest, 0, "init side")?;
    if side == "ok" {
        return Ok(ServerMessage::Other("init".to_owned()));
    }

    let side: Side = side.parse().map_err(parse_error)?;
    let uniform_number = number(atom(rest, 1, "uniform number")?, "uniform number")?;
    let play_mode: PlayMode = atom(rest, 2, "play mode")?.parse().map_err(parse_error)?;

    Ok(ServerMessage::Init {
        side,
        uniform_number,
        play_mode,
    })
}

fn sense_body(rest: &[Sexp]) -> Result<ServerMessage, TransportError> {
    let time = number(atom(rest, 0, "sense_body time")?, "sense_body time")?;
    let mut body = BodyState::default();
    let mut counts = ActionCounts::default();

    for field in rest[1..].iter().filter_map(Sexp::as_list) {
        let name = match field.first().and_then(Sexp::as_atom) {
            Some(name) => name,
            None => continue,
        };
        let values = numbers(&field[1..]);
        let count = values.first().map(|v| *v as u32).unwrap_or(0);

        match name {
            "view_mode" => {
                body.view_quality = field.get(1).and_then(Sexp::as_atom).map(str::to_owned);
                body.view_width = field.get(2).and_then(Sexp::as_atom).map(str::to_owned);
            }
            "stamina" => {
                body.stamina = values.first().copied();
                body.effort = values.get(1).copied();
            }
            "speed" => {
                body.speed_amount = values.first().copied();
                body.speed_direction = values.get(1).map(|d| -d);
            }
            "head_angle" => body.neck_direction = values.first().map(|d| -d),
            "kick" => counts.kick = count,
            "dash" => counts.dash = count,
            "turn" => counts.turn = count,
            "say" => counts.say = count,
            "turn_neck" => counts.turn_neck = count,
            "catch" => counts.catch = count,
            "move" => counts.move_ = count,
            "change_view" => counts.change_view = count,
            _ => {}
        }
    }
    body.counts = counts;

    Ok(ServerMessage::SenseBody { time, body })
}

/// Decodes one datagram from the server.
pub fn parse_message(text: &str) -> Result<ServerMessage, TransportError> {
    let sexp = parse_sexp(text)?;
    let items = sexp
        .as_list()
        .ok_or_else(|| parse_error("message is not a list"))?;
    let (head, rest) = items
        .split_first()
        .ok_or_else(|| parse_error("empty message"))?;
    let head = head
        .as_atom()
        .ok_or_else(|| parse_error("message head is not an atom"))?;

    match head {
        "see" => see(rest),
        "hear" => hear(rest),
        "init" => init(rest),
        "sense_body" => sense_body(rest),
        "error" => Ok(ServerMessage::Error(
            rest.iter().filter_map(Sexp::as_atom).collect::<Vec<_>>().join(" "),
        )),
        other => Ok(ServerMessage::Other(other.to_owned())),
    }
}
