use crate::behavior::bt::*;
use crate::behavior::tactics;
use crate::command::Command;
use crate::error::DecisionError;
use crate::world::{ServerParameters, Snapshot};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Per-agent decision memory shared by all nodes of the tree.
pub struct Blackboard {
    pub snapshot: Arc<Snapshot>,
    pub command: Option<Command>,
    pub behavior: &'static str,
    pub kicker: u8,
    pub teleported: bool,
}

type Tactic = fn(&Snapshot) -> Result<Command, DecisionError>;
type Condition = fn(&Snapshot) -> Result<bool, DecisionError>;

fn commit(blackboard: &mut Blackboard, behavior: &'static str, tactic: Tactic) -> TickResult {
    blackboard.command = Some(tactic(&blackboard.snapshot)?);
    blackboard.behavior = behavior;
    Ok(BTResult::Success)
}

fn on(condition: Condition) -> impl Fn(&Blackboard) -> Result<bool, DecisionError> + Send + Sync + 'static {
    move |blackboard: &Blackboard| condition(&blackboard.snapshot)
}

fn shoot(bb: &mut Blackboard) -> TickResult {
    commit(bb, "shoot", tactics::shoot)
}

fn pass(bb: &mut Blackboard) -> TickResult {
    commit(bb, "pass", tactics::pass)
}

fn dribble(bb: &mut Blackboard) -> TickResult {
    commit(bb, "dribble", tactics::dribble)
}

fn chase(bb: &mut Blackboard) -> TickResult {
    commit(bb, "chase", tactics::chase_ball)
}

fn defend(bb: &mut Blackboard) -> TickResult {
    commit(bb, "defend", tactics::defend)
}

fn advance(bb: &mut Blackboard) -> TickResult {
    commit(bb, "advance", tactics::advance)
}

fn look_around(bb: &mut Blackboard) -> TickResult {
    bb.command = Some(tactics::look_around());
    bb.behavior = "look_around";
    Ok(BTResult::Success)
}

fn teleport(bb: &mut Blackboard) -> TickResult {
    commit(bb, "teleport", tactics::teleport_home)?;
    bb.teleported = true;
    Ok(BTResult::Success)
}

fn take_kick_off(bb: &mut Blackboard) -> TickResult {
    commit(bb, "take_kick_off", tactics::take_kick_off)
}

fn watch_ball(bb: &mut Blackboard) -> TickResult {
    commit(bb, "watch_ball", tactics::watch_ball)
}

fn before_kick_off(snapshot: &Snapshot) -> Result<bool, DecisionError> {
    Ok(snapshot.is_before_kick_off())
}

fn build_tree() -> BoxedNode<Blackboard> {
    let kick_off = BTSelector::new(
        "kick_off",
        vec![
            BTAction::new("teleport", teleport)
                .guarded(|bb: &Blackboard| Ok(!bb.teleported))
                .boxed(),
            BTAction::new("take_kick_off", take_kick_off)
                .guarded(|bb: &Blackboard| Ok(bb.snapshot.uniform_number == Some(bb.kicker)))
                .boxed(),
            BTAction::new("watch_ball", watch_ball).boxed(),
        ],
    )
    .guarded(on(before_kick_off));

    BTSelector::new(
        "root",
        vec![
            kick_off.boxed(),
            BTAction::new("shoot", shoot).guarded(on(tactics::can_shoot)).boxed(),
            BTAction::new("pass", pass).guarded(on(tactics::can_pass)).boxed(),
            BTAction::new("dribble", dribble).guarded(on(tactics::can_dribble)).boxed(),
            BTAction::new("chase", chase).guarded(on(tactics::should_chase)).boxed(),
            BTAction::new("defend", defend).guarded(on(tactics::should_defend)).boxed(),
            BTAction::new("advance", advance).guarded(on(tactics::should_advance)).boxed(),
            BTAction::new("look_around", look_around).boxed(),
        ],
    )
    .boxed()
}

/// Picks exactly one command per think cycle.
///
/// Any error raised by a guard or an action ends the evaluation; the agent
/// then looks around, which is also what it does when nothing applies.
pub struct DecisionEngine {
    tree: BehaviorTree<Blackboard>,
}

impl DecisionEngine {
    pub fn new(params: Arc<ServerParameters>, kicker: u8) -> DecisionEngine {
        let blackboard = Blackboard {
            snapshot: Arc::new(Snapshot::empty(params)),
            command: None,
            behavior: "none",
            kicker,
            teleported: false,
        };

        DecisionEngine {
            tree: BehaviorTree::new(build_tree(), blackboard),
        }
    }

    pub fn has_teleported(&self) -> bool {
        self.tree.blackboard().teleported
    }

    pub fn decide(&mut self, snapshot: Arc<Snapshot>) -> Command {
        let time = snapshot.time;
        {
            let blackboard = self.tree.blackboard_mut();
            blackboard.snapshot = snapshot;
            blackboard.command = None;
            blackboard.behavior = "none";
        }

        let outcome = self.tree.tick();
        let blackboard = self.tree.blackboard_mut();

        match (outcome, blackboard.command.take()) {
            (Ok(BTResult::Failure), _) | (Ok(_), None) => {
                debug!(time, "no behavior settled, looking around");
                tactics::look_around()
            }
            (Ok(_), Some(command)) => {
                trace!(time, behavior = blackboard.behavior, %command, "decided");
                command
            }
            (Err(err), _) => {
                warn!(time, error = %err, "decision failed, looking around");
                tactics::look_around()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{angle_between_points, Vec2};
    use crate::world::snapshot::tests::{localized, with_ball_at, with_player_at};
    use crate::world::{PlayMode, Side};

    fn engine() -> DecisionEngine {
        DecisionEngine::new(Arc::new(ServerParameters::default()), 9)
    }

    fn kick_direction(command: Command) -> f32 {
        match command {
            Command::Kick { direction, .. } => direction,
            other => panic!("expected kick, got {:?}", other),
        }
    }

    #[test]
    fn nothing_to_do_means_looking_around() {
        let command = engine().decide(Arc::new(localized(Vec2::new(0.0, 0.0), 0.0)));
        assert_eq!(command, Command::Turn { moment: 30.0 });
    }

    #[test]
    fn looks_around_until_the_ball_shows_up() {
        let mut engine = engine();
        for time in 1..=5 {
            let mut snapshot = localized(Vec2::new(0.0, 0.0), 0.0);
            snapshot.time = time;
            assert_eq!(engine.decide(Arc::new(snapshot)), Command::Turn { moment: 30.0 });
        }

        let mut snapshot = with_ball_at(localized(Vec2::new(0.0, 0.0), 0.0), Vec2::new(0.3, 0.0));
        snapshot.time = 6;
        let command = engine.decide(Arc::new(snapshot));
        assert_ne!(command, tactics::look_around());
        assert!(matches!(command, Command::Kick { .. }), "got {:?}", command);
    }

    #[test]
    fn missing_self_position_falls_back_to_look_around() {
        let mut snapshot = with_ball_at(localized(Vec2::new(40.0, 0.0), 0.0), Vec2::new(40.3, 0.0));
        snapshot.belief.position = None;
        assert!(snapshot.is_ball_kickable());

        let command = engine().decide(Arc::new(snapshot));
        assert_eq!(command, tactics::look_around());
    }

    #[test]
    fn shooting_beats_passing() {
        let snapshot = with_ball_at(localized(Vec2::new(40.0, 0.0), 0.0), Vec2::new(40.3, 0.0));
        let snapshot = with_player_at(snapshot, Side::Left, Vec2::new(50.0, 5.0));

        let direction = kick_direction(engine().decide(Arc::new(snapshot)));
        assert!(direction.abs() < 1e-2, "aimed at {}", direction);
    }

    #[test]
    fn out_of_range_passes_forward() {
        let snapshot = with_ball_at(localized(Vec2::new(0.0, 0.0), 0.0), Vec2::new(0.3, 0.0));
        let snapshot = with_player_at(snapshot, Side::Left, Vec2::new(20.0, 15.0));

        let direction = kick_direction(engine().decide(Arc::new(snapshot)));
        let expected = angle_between_points(Vec2::new(0.0, 0.0), Vec2::new(20.0, 15.0));
        assert!((direction - expected).abs() < 1e-2, "aimed at {}", direction);
    }

    #[test]
    fn blocked_pass_turns_into_dribble() {
        let snapshot = with_ball_at(localized(Vec2::new(0.0, 0.0), 0.0), Vec2::new(0.3, 0.0));
        let snapshot = with_player_at(snapshot, Side::Left, Vec2::new(20.0, 15.0));
        let snapshot = with_player_at(snapshot, Side::Right, Vec2::new(8.0, 6.5));

        let direction = kick_direction(engine().decide(Arc::new(snapshot)));
        assert!(direction.abs() < 1e-2, "aimed at {}", direction);
    }

    #[test]
    fn enemy_with_ball_nearby_is_chased() {
        let snapshot = with_ball_at(localized(Vec2::new(0.0, 0.0), 0.0), Vec2::new(0.0, 10.0));
        let snapshot = with_player_at(snapshot, Side::Right, Vec2::new(0.0, 10.3));

        match engine().decide(Arc::new(snapshot)) {
            Command::Turn { moment } => assert!((moment - 90.0).abs() < 1e-3),
            other => panic!("expected turn towards ball, got {:?}", other),
        }
    }

    #[test]
    fn kick_off_teleports_once_then_plays_the_ball() {
        let mut engine = engine();
        let mut snapshot = localized(Vec2::new(-30.0, 10.0), 0.0);
        snapshot.play_mode = PlayMode::BeforeKickOff;
        snapshot.home_point = Some(Vec2::new(-10.0, 0.0));

        assert_eq!(engine.decide(Arc::new(snapshot.clone())), Command::Move { x: -10.0, y: 0.0 });
        assert!(engine.has_teleported());

        let mut snapshot = with_ball_at(localized(Vec2::new(-1.0, 0.0), 0.0), Vec2::new(0.0, 0.0));
        snapshot.play_mode = PlayMode::BeforeKickOff;
        snapshot.home_point = Some(Vec2::new(-10.0, 0.0));
        assert_eq!(engine.decide(Arc::new(snapshot.clone())), Command::Dash { power: 50.0 });

        let mut snapshot = with_ball_at(localized(Vec2::new(-0.5, 0.0), 0.0), Vec2::new(0.0, 0.0));
        snapshot.play_mode = PlayMode::BeforeKickOff;
        let direction = kick_direction(engine.decide(Arc::new(snapshot)));
        assert!(direction.abs() < 1e-2);
    }

    #[test]
    fn non_kickers_track_the_ball_before_kick_off() {
        let mut engine = engine();
        let mut snapshot = with_ball_at(localized(Vec2::new(-20.0, 0.0), 0.0), Vec2::new(0.0, 20.0));
        snapshot.play_mode = PlayMode::BeforeKickOff;
        snapshot.uniform_number = Some(7);
        snapshot.home_point = Some(Vec2::new(-20.0, 0.0));

        engine.decide(Arc::new(snapshot.clone()));
        match engine.decide(Arc::new(snapshot)) {
            Command::TurnNeck { angle } => assert!((angle - 45.0).abs() < 1e-3),
            other => panic!("expected neck turn, got {:?}", other),
        }
    }

    #[test]
    fn missing_home_point_is_recovered_from() {
        let mut engine = engine();
        let mut snapshot = localized(Vec2::new(-30.0, 10.0), 0.0);
        snapshot.play_mode = PlayMode::BeforeKickOff;

        assert_eq!(engine.decide(Arc::new(snapshot)), tactics::look_around());
        assert!(!engine.has_teleported());
    }
}
