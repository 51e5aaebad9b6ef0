use crate::command::Command;
use crate::math::{angle_between_points, euclidean_distance, normalize_relative, Vec2};
use crate::world::kick;
use crate::world::params::ServerParameters;
use crate::world::percept::{Player, Polar, Side, Sighting};
use crate::world::playmode::PlayMode;
use std::sync::Arc;

/// Goal mouth x coordinate used as the aiming point.
pub const GOAL_X: f32 = 55.0;

/// Our estimated absolute pose, recomputed from scratch every tick.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct SelfBelief {
    pub position: Option<Vec2>,
    pub neck_direction: Option<f32>,
    pub body_direction: Option<f32>,
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct ActionCounts {
    pub kick: u32,
    pub dash: u32,
    pub turn: u32,
    pub say: u32,
    pub turn_neck: u32,
    pub catch: u32,
    pub move_: u32,
    pub change_view: u32,
}

/// Body state as last reported by `sense_body`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct BodyState {
    pub view_quality: Option<String>,
    pub view_width: Option<String>,
    pub stamina: Option<f32>,
    pub effort: Option<f32>,
    pub speed_amount: Option<f32>,
    pub speed_direction: Option<f32>,
    /// Neck angle relative to the body.
    pub neck_direction: Option<f32>,
    pub counts: ActionCounts,
}

/// A visible player together with its resolved field position.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub player: &'a Player,
    pub position: Vec2,
}

/// Immutable view of the world published by the perception loop.
///
/// The think loop only ever sees whole snapshots, so every field here is
/// consistent with every other.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: u32,
    pub sighting: Sighting,
    pub belief: SelfBelief,
    pub play_mode: PlayMode,
    pub side: Option<Side>,
    pub uniform_number: Option<u8>,
    pub team_name: Option<String>,
    pub body: BodyState,
    pub home_point: Option<Vec2>,
    pub score_l: u32,
    pub score_r: u32,
    pub last_message: Option<String>,
    pub params: Arc<ServerParameters>,
}

impl Snapshot {
    /// Snapshot of a freshly connected agent that has seen nothing yet.
    pub fn empty(params: Arc<ServerParameters>) -> Snapshot {
        Snapshot {
            time: 0,
            sighting: Sighting::default(),
            belief: SelfBelief::default(),
            play_mode: PlayMode::BeforeKickOff,
            side: None,
            uniform_number: None,
            team_name: None,
            body: BodyState::default(),
            home_point: None,
            score_l: 0,
            score_r: 0,
            last_message: None,
            params,
        }
    }

    pub fn position(&self) -> Option<Vec2> {
        self.belief.position
    }

    pub fn ball(&self) -> Option<&Polar> {
        self.sighting.ball.as_ref().map(|ball| &ball.polar)
    }

    pub fn distance_to_point(&self, point: Vec2) -> Option<f32> {
        Some(euclidean_distance(self.position()?, point))
    }

    /// Bearing of `point` relative to our body, in (-180, 180].
    pub fn angle_to_point(&self, point: Vec2) -> Option<f32> {
        let absolute = angle_between_points(self.position()?, point);
        Some(normalize_relative(absolute - self.belief.body_direction?))
    }

    /// Field position of something seen at `polar`.
    pub fn object_absolute_coords(&self, polar: &Polar) -> Option<Vec2> {
        let distance = polar.distance?;
        let absolute = self.belief.neck_direction? + polar.direction?;
        Some(self.position()?.project(distance, absolute))
    }

    pub fn ball_absolute_coords(&self) -> Option<Vec2> {
        self.object_absolute_coords(self.ball()?)
    }

    pub fn is_ball_kickable(&self) -> bool {
        self.ball()
            .and_then(|ball| ball.distance)
            .map(|distance| distance <= self.params.kickable_margin)
            .unwrap_or(false)
    }

    /// Kick that sends the ball to `point`; `extra_power` of 0 aims to stop
    /// it there, 1.0 kicks twice as hard.
    pub fn kick_to(&self, point: Vec2, extra_power: f32) -> Option<Command> {
        let distance = self.distance_to_point(point)?;
        let direction = self.angle_to_point(point)?;
        let power = kick::required_kick_power(&self.params, self.ball()?, distance, extra_power)?;
        Some(Command::Kick { power, direction })
    }

    pub fn turn_body_to_point(&self, point: Vec2) -> Option<Command> {
        Some(Command::Turn {
            moment: self.angle_to_point(point)?,
        })
    }

    /// Turn that faces the body towards something seen relative to the neck.
    pub fn turn_body_to_object(&self, polar: &Polar) -> Option<Command> {
        let neck = self.body.neck_direction.unwrap_or(0.0);
        Some(Command::Turn {
            moment: normalize_relative(polar.direction? + neck),
        })
    }

    pub fn turn_neck_to_object(&self, polar: &Polar) -> Option<Command> {
        Some(Command::TurnNeck {
            angle: polar.direction?,
        })
    }

    pub fn align_neck_with_body(&self) -> Option<Command> {
        Some(Command::TurnNeck {
            angle: -self.body.neck_direction?,
        })
    }

    pub fn teleport_to_point(&self, point: Vec2) -> Command {
        Command::move_to(point)
    }

    pub fn enemy_goal(&self) -> Option<Vec2> {
        Some(Vec2::new(GOAL_X * self.side?.x_sign(), 0.0))
    }

    pub fn own_goal(&self) -> Option<Vec2> {
        Some(Vec2::new(-GOAL_X * self.side?.x_sign(), 0.0))
    }

    /// Visible players on `side` whose position can be resolved, in scan order.
    fn located(&self, side: Side) -> impl Iterator<Item = Located<'_>> {
        self.sighting
            .players
            .iter()
            .filter(move |player| player.side == Some(side))
            .filter_map(move |player| {
                Some(Located {
                    player,
                    position: self.object_absolute_coords(&player.polar)?,
                })
            })
    }

    fn nearest_to(&self, side: Side, point: Vec2) -> Option<Located<'_>> {
        let mut best: Option<(f32, Located<'_>)> = None;
        for candidate in self.located(side) {
            let distance = euclidean_distance(candidate.position, point);
            let closer = match &best {
                Some((best_distance, _)) => distance < *best_distance,
                None => true,
            };
            if closer {
                best = Some((distance, candidate));
            }
        }
        best.map(|(_, located)| located)
    }

    pub fn nearest_teammate_to_point(&self, point: Vec2) -> Option<Located<'_>> {
        self.nearest_to(self.side?, point)
    }

    pub fn nearest_enemy_to_point(&self, point: Vec2) -> Option<Located<'_>> {
        self.nearest_to(self.side?.opponent(), point)
    }

    pub fn nearest_teammate(&self) -> Option<Located<'_>> {
        self.nearest_teammate_to_point(self.position()?)
    }

    pub fn nearest_enemy(&self) -> Option<Located<'_>> {
        self.nearest_enemy_to_point(self.position()?)
    }

    fn is_ball_owned_by(&self, side: Side) -> bool {
        let ball = match self.ball_absolute_coords() {
            Some(ball) => ball,
            None => return false,
        };

        self.located(side)
            .any(|p| euclidean_distance(p.position, ball) < self.params.kickable_margin)
    }

    /// Any teammate within kicking reach of the ball. May be true together
    /// with `is_ball_owned_by_enemy` when the ball is contested.
    pub fn is_ball_owned_by_us(&self) -> bool {
        self.side.map(|side| self.is_ball_owned_by(side)).unwrap_or(false)
    }

    pub fn is_ball_owned_by_enemy(&self) -> bool {
        self.side
            .map(|side| self.is_ball_owned_by(side.opponent()))
            .unwrap_or(false)
    }

    pub fn is_before_kick_off(&self) -> bool {
        self.play_mode == PlayMode::BeforeKickOff
    }

    pub fn is_playon(&self) -> bool {
        !matches!(self.play_mode, PlayMode::BeforeKickOff | PlayMode::TimeOver)
    }

    pub fn is_kick_off_us(&self) -> bool {
        match (self.play_mode, self.side) {
            (PlayMode::KickOff(kicking), Some(side)) => kicking == side,
            _ => false,
        }
    }

    pub fn is_dead_ball_them(&self) -> bool {
        let side = match self.side {
            Some(side) => side,
            None => return false,
        };

        match self.play_mode {
            PlayMode::KickIn(free) | PlayMode::FreeKick(free) | PlayMode::CornerKick(free) => free != side,
            _ => false,
        }
    }

    pub fn stamina(&self) -> Option<f32> {
        self.body.stamina
    }

    pub fn stamina_max(&self) -> f32 {
        self.params.stamina_max
    }

    pub fn ball_speed_max(&self) -> f32 {
        self.params.ball_speed_max
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::world::percept::{Ball, Motion};

    /// A localized left-side agent at `position` facing `heading` with its neck
    /// straight.
    pub(crate) fn localized(position: Vec2, heading: f32) -> Snapshot {
        let mut snapshot = Snapshot::empty(Arc::new(ServerParameters::default()));
        snapshot.side = Some(Side::Left);
        snapshot.uniform_number = Some(9);
        snapshot.play_mode = PlayMode::PlayOn;
        snapshot.belief = SelfBelief {
            position: Some(position),
            neck_direction: Some(heading),
            body_direction: Some(heading),
        };
        snapshot.body.neck_direction = Some(0.0);
        snapshot
    }

    /// The polar sighting of `target` from the snapshot's own pose.
    pub(crate) fn polar_of(snapshot: &Snapshot, target: Vec2) -> Polar {
        let position = snapshot.position().unwrap();
        Polar::new(
            position.distance(&target),
            normalize_relative(angle_between_points(position, target) - snapshot.belief.neck_direction.unwrap()),
        )
    }

    pub(crate) fn with_ball_at(mut snapshot: Snapshot, target: Vec2) -> Snapshot {
        snapshot.sighting.ball = Some(Ball {
            polar: polar_of(&snapshot, target),
            motion: Motion::default(),
        });
        snapshot
    }

    pub(crate) fn with_player_at(mut snapshot: Snapshot, side: Side, target: Vec2) -> Snapshot {
        let polar = polar_of(&snapshot, target);
        snapshot.sighting.players.push(Player {
            polar,
            side: Some(side),
            ..Player::default()
        });
        snapshot
    }

    #[test]
    fn absolute_coords_follow_neck_direction() {
        let snapshot = localized(Vec2::new(10.0, 0.0), 90.0);
        let coords = snapshot.object_absolute_coords(&Polar::new(5.0, 0.0)).unwrap();
        assert!(coords.distance(&Vec2::new(10.0, 5.0)) < 1e-3);
    }

    #[test]
    fn queries_degrade_to_none_without_localization() {
        let snapshot = with_ball_at(localized(Vec2::new(0.0, 0.0), 0.0), Vec2::new(5.0, 0.0));
        let mut snapshot = with_player_at(snapshot, Side::Right, Vec2::new(5.2, 0.0));
        assert!(snapshot.nearest_enemy().is_some());
        assert!(snapshot.is_ball_owned_by_enemy());

        snapshot.belief = SelfBelief::default();

        assert_eq!(snapshot.distance_to_point(Vec2::new(1.0, 1.0)), None);
        assert_eq!(snapshot.angle_to_point(Vec2::new(1.0, 1.0)), None);
        assert_eq!(snapshot.kick_to(Vec2::new(55.0, 0.0), 1.0), None);
        assert!(snapshot.nearest_enemy().is_none());
        assert!(!snapshot.is_ball_owned_by_enemy());
    }

    #[test]
    fn nearest_enemy_skips_teammates_and_prefers_first_on_ties() {
        let snapshot = localized(Vec2::new(0.0, 0.0), 0.0);
        let snapshot = with_player_at(snapshot, Side::Left, Vec2::new(1.0, 0.0));
        let snapshot = with_player_at(snapshot, Side::Right, Vec2::new(0.0, 5.0));
        let snapshot = with_player_at(snapshot, Side::Right, Vec2::new(0.0, -5.0));

        let enemy = snapshot.nearest_enemy().unwrap();
        assert!(enemy.position.distance(&Vec2::new(0.0, 5.0)) < 1e-3);
        let mate = snapshot.nearest_teammate().unwrap();
        assert!(mate.position.distance(&Vec2::new(1.0, 0.0)) < 1e-3);
    }

    #[test]
    fn contested_ball_is_owned_by_both_teams() {
        let snapshot = localized(Vec2::new(0.0, 0.0), 0.0);
        let snapshot = with_ball_at(snapshot, Vec2::new(10.0, 0.0));
        let snapshot = with_player_at(snapshot, Side::Left, Vec2::new(10.0, 0.4));
        let snapshot = with_player_at(snapshot, Side::Right, Vec2::new(10.0, -0.4));

        assert!(snapshot.is_ball_owned_by_us());
        assert!(snapshot.is_ball_owned_by_enemy());
    }

    #[test]
    fn unresolvable_players_are_skipped_for_possession() {
        let snapshot = localized(Vec2::new(0.0, 0.0), 0.0);
        let mut snapshot = with_ball_at(snapshot, Vec2::new(10.0, 0.0));
        snapshot.sighting.players.push(Player {
            polar: Polar::direction_only(0.0),
            side: Some(Side::Right),
            ..Player::default()
        });
        let snapshot = with_player_at(snapshot, Side::Right, Vec2::new(10.3, 0.0));
        assert!(snapshot.is_ball_owned_by_enemy());
        assert!(!snapshot.is_ball_owned_by_us());
    }

    #[test]
    fn play_mode_predicates_respect_side() {
        let mut snapshot = localized(Vec2::new(0.0, 0.0), 0.0);
        snapshot.play_mode = PlayMode::KickOff(Side::Left);
        assert!(snapshot.is_kick_off_us());
        assert!(snapshot.is_playon());

        snapshot.play_mode = PlayMode::CornerKick(Side::Right);
        assert!(snapshot.is_dead_ball_them());
        snapshot.play_mode = PlayMode::GoalKick(Side::Right);
        assert!(!snapshot.is_dead_ball_them());

        snapshot.play_mode = PlayMode::BeforeKickOff;
        assert!(snapshot.is_before_kick_off());
        assert!(!snapshot.is_playon());
    }

    #[test]
    fn kick_to_aims_relative_to_body() {
        let snapshot = localized(Vec2::new(0.0, 0.0), 90.0);
        let snapshot = with_ball_at(snapshot, Vec2::new(0.0, 0.3));
        match snapshot.kick_to(Vec2::new(20.0, 0.0), 0.0) {
            Some(Command::Kick { power, direction }) => {
                assert!((direction + 90.0).abs() < 1e-3, "direction was {}", direction);
                assert!(power > 0.0 && power <= 100.0);
            }
            other => panic!("expected kick, got {:?}", other),
        }
    }

    #[test]
    fn motor_helpers_account_for_the_neck() {
        let mut snapshot = localized(Vec2::new(0.0, 0.0), 0.0);
        snapshot.body.neck_direction = Some(40.0);

        assert_eq!(
            snapshot.turn_body_to_object(&Polar::new(10.0, 150.0)),
            Some(Command::Turn { moment: -170.0 })
        );
        assert_eq!(snapshot.turn_body_to_object(&Polar::new(10.0, -20.0)), Some(Command::Turn { moment: 20.0 }));
        assert_eq!(snapshot.align_neck_with_body(), Some(Command::TurnNeck { angle: -40.0 }));
        assert_eq!(snapshot.teleport_to_point(Vec2::new(-10.0, 5.0)), Command::Move { x: -10.0, y: 5.0 });

        snapshot.body.neck_direction = None;
        assert_eq!(snapshot.align_neck_with_body(), None);
    }

    #[test]
    fn body_and_parameter_accessors() {
        let mut snapshot = localized(Vec2::new(0.0, 0.0), 0.0);
        assert_eq!(snapshot.stamina(), None);
        snapshot.body.stamina = Some(3500.0);
        assert_eq!(snapshot.stamina(), Some(3500.0));
        assert_eq!(snapshot.stamina_max(), snapshot.params.stamina_max);
        assert_eq!(snapshot.ball_speed_max(), snapshot.params.ball_speed_max);
        assert!(snapshot.stamina().unwrap() <= snapshot.stamina_max());
    }

    #[test]
    fn goals_mirror_with_side() {
        let mut snapshot = localized(Vec2::new(0.0, 0.0), 0.0);
        assert_eq!(snapshot.enemy_goal(), Some(Vec2::new(55.0, 0.0)));
        snapshot.side = Some(Side::Right);
        assert_eq!(snapshot.enemy_goal(), Some(Vec2::new(-55.0, 0.0)));
        assert_eq!(snapshot.own_goal(), Some(Vec2::new(55.0, 0.0)));
    }
}
