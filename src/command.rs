use crate::math::Vec2;
use std::fmt;

/// One outbound motor or utility command. At most one is sent per think cycle.
///
/// Angles are in the agent's counter-clockwise frame; the transport converts
/// them to the server's convention.
#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    Catch { direction: f32 },
    ChangeView { width: ViewWidth, quality: ViewQuality },
    Dash { power: f32 },
    Kick { power: f32, direction: f32 },
    /// Only legal before kick-off.
    Move { x: f32, y: f32 },
    Say { message: String },
    SenseBody,
    Turn { moment: f32 },
    TurnNeck { angle: f32 },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViewWidth {
    Narrow,
    Normal,
    Wide,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViewQuality {
    Low,
    High,
}

impl Command {
    pub fn move_to(point: Vec2) -> Command {
        Command::Move {
            x: point.x,
            y: point.y,
        }
    }

    /// The command with every angle and y coordinate mirrored, which maps the
    /// agent frame onto the server frame and back.
    pub fn mirrored(&self) -> Command {
        match self.clone() {
            Command::Catch { direction } => Command::Catch { direction: flip(direction) },
            Command::Kick { power, direction } => Command::Kick {
                power,
                direction: flip(direction),
            },
            Command::Move { x, y } => Command::Move { x, y: flip(y) },
            Command::Turn { moment } => Command::Turn { moment: flip(moment) },
            Command::TurnNeck { angle } => Command::TurnNeck { angle: flip(angle) },
            other => other,
        }
    }
}

// keeps zero positive so it never prints as -0.00
fn flip(value: f32) -> f32 {
    if value == 0.0 {
        0.0
    } else {
        -value
    }
}

impl fmt::Display for ViewWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewWidth::Narrow => "narrow",
            ViewWidth::Normal => "normal",
            ViewWidth::Wide => "wide",
        })
    }
}

impl fmt::Display for ViewQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewQuality::Low => "low",
            ViewQuality::High => "high",
        })
    }
}

/// Wire form understood by rcssserver.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Catch { direction } => write!(f, "(catch {:.2})", direction),
            Command::ChangeView { width, quality } => write!(f, "(change_view {} {})", width, quality),
            Command::Dash { power } => write!(f, "(dash {:.2})", power),
            Command::Kick { power, direction } => write!(f, "(kick {:.2} {:.2})", power, direction),
            Command::Move { x, y } => write!(f, "(move {:.2} {:.2})", x, y),
            Command::Say { message } => write!(f, "(say \"{}\")", message.replace('"', "")),
            Command::SenseBody => write!(f, "(sense_body)"),
            Command::Turn { moment } => write!(f, "(turn {:.2})", moment),
            Command::TurnNeck { angle } => write!(f, "(turn_neck {:.2})", angle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_to_server_syntax() {
        assert_eq!(Command::Dash { power: 65.0 }.to_string(), "(dash 65.00)");
        assert_eq!(
            Command::Kick {
                power: 100.0,
                direction: -12.5
            }
            .to_string(),
            "(kick 100.00 -12.50)"
        );
        assert_eq!(Command::move_to(Vec2::new(-10.0, 20.0)).to_string(), "(move -10.00 20.00)");
        assert_eq!(Command::SenseBody.to_string(), "(sense_body)");
        assert_eq!(
            Command::ChangeView {
                width: ViewWidth::Wide,
                quality: ViewQuality::High
            }
            .to_string(),
            "(change_view wide high)"
        );
        assert_eq!(
            Command::Say {
                message: "go \"left\"".to_owned()
            }
            .to_string(),
            "(say \"go left\")"
        );
    }

    #[test]
    fn mirroring_flips_angles_but_not_power() {
        let kick = Command::Kick {
            power: 80.0,
            direction: 30.0,
        };
        assert_eq!(
            kick.mirrored(),
            Command::Kick {
                power: 80.0,
                direction: -30.0
            }
        );
        assert_eq!(kick.mirrored().mirrored(), kick);
        assert_eq!(Command::Dash { power: 50.0 }.mirrored(), Command::Dash { power: 50.0 });
        assert_eq!(Command::Move { x: -10.0, y: 0.0 }.mirrored().to_string(), "(move -10.00 0.00)");
    }
}
