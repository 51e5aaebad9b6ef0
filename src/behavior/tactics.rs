//! Guards and actions of the play-on behavior table, plus the kick-off
//! routines. Everything here is a pure function of one snapshot.

use crate::command::Command;
use crate::error::DecisionError;
use crate::math::{abs, angle_between_points, euclidean_distance, normalize_relative, Vec2};
use crate::world::{Polar, Snapshot};

pub const SHOOT_RANGE: f32 = 25.0;
pub const PASS_DISTANCE_SCALE: f32 = 55.0;
pub const CHASE_RANGE: f32 = 30.0;
pub const DEFEND_RANGE: f32 = 55.0;
pub const DASH_POWER: f32 = 80.0;
pub const KICK_OFF_DASH_POWER: f32 = 50.0;
pub const SHOT_EXTRA_POWER: f32 = 1.0;
pub const FACING_TOLERANCE: f32 = 7.0;
pub const CLEAR_PATH_ANGLE: f32 = 20.0;
pub const LOOK_AROUND_MOMENT: f32 = 30.0;

const CENTER_SPOT: Vec2 = Vec2 { x: 0.0, y: 0.0 };

fn position(snapshot: &Snapshot) -> Result<Vec2, DecisionError> {
    snapshot.position().ok_or(DecisionError::MissingBelief("position"))
}

fn enemy_goal(snapshot: &Snapshot) -> Result<Vec2, DecisionError> {
    snapshot.enemy_goal().ok_or(DecisionError::MissingBelief("side"))
}

fn own_goal(snapshot: &Snapshot) -> Result<Vec2, DecisionError> {
    snapshot.own_goal().ok_or(DecisionError::MissingBelief("side"))
}

fn no_kick(behavior: &'static str) -> DecisionError {
    DecisionError::Behavior {
        behavior,
        reason: "no kick solution for the current pose".to_owned(),
    }
}

/// Bearing of a seen object relative to the body rather than the neck.
fn body_bearing(snapshot: &Snapshot, polar: &Polar) -> Option<f32> {
    let neck = snapshot.body.neck_direction.unwrap_or(0.0);
    Some(normalize_relative(polar.direction? + neck))
}

pub fn look_around() -> Command {
    Command::Turn {
        moment: LOOK_AROUND_MOMENT,
    }
}

/// Only the nearest enemy is considered. The path is clear when the target
/// is closer to us than to that enemy, or the enemy is well off the line to it.
pub fn path_clear(snapshot: &Snapshot, target: Vec2) -> Result<bool, DecisionError> {
    let me = position(snapshot)?;
    let enemy = match snapshot.nearest_enemy() {
        Some(enemy) => enemy.position,
        None => return Ok(true),
    };

    if euclidean_distance(me, target) < euclidean_distance(enemy, target) {
        return Ok(true);
    }

    let separation = normalize_relative(angle_between_points(me, enemy) - angle_between_points(me, target));
    Ok(abs(separation) > CLEAR_PATH_ANGLE)
}

/// One teammate ahead of us (closer to the enemy goal) with a clear line.
pub fn pass_target(snapshot: &Snapshot) -> Result<Option<Vec2>, DecisionError> {
    let me = position(snapshot)?;
    let goal = enemy_goal(snapshot)?;

    let mate = match snapshot.nearest_teammate_to_point(goal) {
        Some(mate) => mate.position,
        None => return Ok(None),
    };
    if euclidean_distance(mate, goal) >= euclidean_distance(me, goal) {
        return Ok(None);
    }

    Ok(if path_clear(snapshot, mate)? { Some(mate) } else { None })
}

pub fn can_shoot(snapshot: &Snapshot) -> Result<bool, DecisionError> {
    if !snapshot.is_ball_kickable() {
        return Ok(false);
    }

    let goal = enemy_goal(snapshot)?;
    if euclidean_distance(position(snapshot)?, goal) > SHOOT_RANGE {
        return Ok(false);
    }
    path_clear(snapshot, goal)
}

pub fn can_pass(snapshot: &Snapshot) -> Result<bool, DecisionError> {
    if !snapshot.is_ball_kickable() {
        return Ok(false);
    }
    Ok(pass_target(snapshot)?.is_some())
}

pub fn can_dribble(snapshot: &Snapshot) -> Result<bool, DecisionError> {
    Ok(snapshot.is_ball_kickable())
}

pub fn should_chase(snapshot: &Snapshot) -> Result<bool, DecisionError> {
    if !snapshot.is_ball_owned_by_enemy() {
        return Ok(false);
    }
    let distance = snapshot.ball().and_then(|ball| ball.distance);
    Ok(matches!(distance, Some(d) if d <= CHASE_RANGE))
}

pub fn should_defend(snapshot: &Snapshot) -> Result<bool, DecisionError> {
    if !snapshot.is_ball_owned_by_enemy() {
        return Ok(false);
    }
    let ball = snapshot.ball_absolute_coords().ok_or(DecisionError::BallNotVisible)?;
    Ok(euclidean_distance(ball, own_goal(snapshot)?) <= DEFEND_RANGE)
}

pub fn should_advance(snapshot: &Snapshot) -> Result<bool, DecisionError> {
    if !snapshot.is_ball_owned_by_us() {
        return Ok(false);
    }
    Ok(euclidean_distance(position(snapshot)?, enemy_goal(snapshot)?) > SHOOT_RANGE)
}

/// Turn towards `point` if we are more than a few degrees off, else run.
pub fn face_and_dash(snapshot: &Snapshot, point: Vec2, power: f32) -> Result<Command, DecisionError> {
    let angle = snapshot
        .angle_to_point(point)
        .ok_or(DecisionError::MissingBelief("body direction"))?;

    Ok(if abs(angle) > FACING_TOLERANCE {
        Command::Turn { moment: angle }
    } else {
        Command::Dash { power }
    })
}

pub fn shoot(snapshot: &Snapshot) -> Result<Command, DecisionError> {
    snapshot
        .kick_to(enemy_goal(snapshot)?, SHOT_EXTRA_POWER)
        .ok_or_else(|| no_kick("shoot"))
}

/// Longer passes get proportionally more extra power.
pub fn pass(snapshot: &Snapshot) -> Result<Command, DecisionError> {
    let target = pass_target(snapshot)?.ok_or_else(|| DecisionError::Behavior {
        behavior: "pass",
        reason: "no open teammate".to_owned(),
    })?;
    let distance = snapshot
        .distance_to_point(target)
        .ok_or(DecisionError::MissingBelief("position"))?;

    snapshot
        .kick_to(target, 2.0 * distance / PASS_DISTANCE_SCALE)
        .ok_or_else(|| no_kick("pass"))
}

pub fn dribble(snapshot: &Snapshot) -> Result<Command, DecisionError> {
    let goal = enemy_goal(snapshot)?;
    Ok(snapshot
        .kick_to(goal, SHOT_EXTRA_POWER)
        .unwrap_or(Command::Dash { power: DASH_POWER }))
}

pub fn chase_ball(snapshot: &Snapshot) -> Result<Command, DecisionError> {
    let ball = snapshot.ball().ok_or(DecisionError::BallNotVisible)?;
    let bearing = body_bearing(snapshot, ball).ok_or(DecisionError::BallNotVisible)?;

    Ok(if abs(bearing) > FACING_TOLERANCE {
        Command::Turn { moment: bearing }
    } else {
        Command::Dash { power: DASH_POWER }
    })
}

/// Mark the nearest enemy if it is in our half of the pitch, otherwise fall
/// back to our own goal.
pub fn defend(snapshot: &Snapshot) -> Result<Command, DecisionError> {
    let goal = own_goal(snapshot)?;
    let target = match snapshot.nearest_enemy() {
        Some(enemy) if euclidean_distance(enemy.position, goal) <= DEFEND_RANGE => enemy.position,
        _ => goal,
    };
    face_and_dash(snapshot, target, DASH_POWER)
}

pub fn advance(snapshot: &Snapshot) -> Result<Command, DecisionError> {
    if snapshot.is_ball_kickable() {
        return shoot(snapshot);
    }
    face_and_dash(snapshot, enemy_goal(snapshot)?, DASH_POWER)
}

pub fn teleport_home(snapshot: &Snapshot) -> Result<Command, DecisionError> {
    let home = snapshot
        .home_point
        .ok_or(DecisionError::MissingBelief("home point"))?;
    Ok(snapshot.teleport_to_point(home))
}

/// The kicker walks up to the ball and plays it towards the enemy goal.
pub fn take_kick_off(snapshot: &Snapshot) -> Result<Command, DecisionError> {
    if snapshot.is_ball_kickable() {
        return shoot(snapshot);
    }

    match snapshot.ball().and_then(|ball| body_bearing(snapshot, ball)) {
        Some(bearing) if abs(bearing) <= FACING_TOLERANCE => Ok(Command::Dash {
            power: KICK_OFF_DASH_POWER,
        }),
        Some(bearing) => Ok(Command::Turn { moment: bearing }),
        None => snapshot
            .turn_body_to_point(CENTER_SPOT)
            .ok_or(DecisionError::MissingBelief("position")),
    }
}

pub fn watch_ball(snapshot: &Snapshot) -> Result<Command, DecisionError> {
    Ok(snapshot
        .ball()
        .and_then(|ball| snapshot.turn_neck_to_object(ball))
        .unwrap_or_else(look_around))
}
