use crate::math::Vec2;
use crate::world::localization;
use crate::world::params::ServerParameters;
use crate::world::percept::{Ball, Flag, Goal, Line, Player, Side, Sighting};
use crate::world::playmode::{PlayMode, RefereeEvent, RefereeMessage};
use crate::world::snapshot::{BodyState, SelfBelief, Snapshot};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// The perception loop's private, mutable belief state.
///
/// Only the perception loop holds a `WorldModel`; everyone else reads the
/// `Snapshot`s it publishes.
pub struct WorldModel {
    angle_step: u32,
    rng: Box<dyn RngCore + Send + Sync>,
    current: Snapshot,
}

impl WorldModel {
    pub fn new(params: Arc<ServerParameters>, angle_step: u32, seed: Option<u64>) -> WorldModel {
        let rng: StdRng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        WorldModel::with_rng(params, angle_step, Box::new(rng))
    }

    pub fn with_rng(params: Arc<ServerParameters>, angle_step: u32, rng: Box<dyn RngCore + Send + Sync>) -> WorldModel {
        WorldModel {
            angle_step,
            rng,
            current: Snapshot::empty(params),
        }
    }

    pub fn set_team_name(&mut self, team: &str) {
        self.current.team_name = Some(team.to_owned());
    }

    pub fn set_home_point(&mut self, point: Vec2) {
        self.current.home_point = Some(point);
    }

    pub fn set_time(&mut self, time: u32) {
        self.current.time = time;
    }

    /// Side, uniform number and play mode assigned by the server at connect.
    pub fn on_init(&mut self, side: Side, uniform_number: u8, play_mode: PlayMode) {
        info!(%side, uniform_number, %play_mode, "registered with server");
        self.current.side = Some(side);
        self.current.uniform_number = Some(uniform_number);
        self.current.play_mode = play_mode;
    }

    pub fn on_referee(&mut self, event: RefereeEvent) {
        match event {
            RefereeEvent::Mode(mode) => {
                if mode != self.current.play_mode {
                    info!(from = %self.current.play_mode, to = %mode, "play mode changed");
                }
                self.current.play_mode = mode;
            }
            RefereeEvent::Message(RefereeMessage::Goal(Side::Left, score)) => {
                info!(score, "goal for left side");
                self.current.score_l = score;
            }
            RefereeEvent::Message(RefereeMessage::Goal(Side::Right, score)) => {
                info!(score, "goal for right side");
                self.current.score_r = score;
            }
            RefereeEvent::Message(message) => {
                debug!(?message, "referee message");
            }
        }
    }

    /// A non-referee message heard this cycle.
    pub fn on_message(&mut self, message: &str) {
        self.current.last_message = Some(message.to_owned());
    }

    pub fn on_sense_body(&mut self, body: BodyState) {
        self.current.body = body;
        self.recompute_body_direction();
    }

    /// Replaces the percept snapshot and recomputes our pose from the flags
    /// seen this tick. Nothing from the previous tick is carried over.
    pub fn process_new_info(
        &mut self,
        ball: Option<Ball>,
        flags: Vec<Flag>,
        goals: Vec<Goal>,
        mut players: Vec<Player>,
        lines: Vec<Line>,
    ) {
        self.resolve_sides(&mut players);
        let position = localization::triangulate_position(&flags, self.angle_step, &mut *self.rng);
        let neck_direction = position.and_then(|p| localization::triangulate_direction(&flags, p));

        self.current.sighting = Sighting {
            ball,
            flags,
            goals,
            players,
            lines,
        };
        self.current.belief = SelfBelief {
            position,
            neck_direction,
            body_direction: None,
        };
        self.recompute_body_direction();

        trace!(
            time = self.current.time,
            ?position,
            ?neck_direction,
            flags = self.current.sighting.flags.len(),
            "self-belief updated"
        );
    }

    pub fn process_sighting(&mut self, time: u32, sighting: Sighting) {
        self.set_time(time);
        let Sighting {
            ball,
            flags,
            goals,
            players,
            lines,
        } = sighting;
        self.process_new_info(ball, flags, goals, players, lines);
    }

    /// The server names teams, not sides; map names onto sides once ours is known.
    fn resolve_sides(&self, players: &mut [Player]) {
        let (side, team_name) = match (self.current.side, &self.current.team_name) {
            (Some(side), Some(team_name)) => (side, team_name),
            _ => return,
        };

        for player in players.iter_mut().filter(|p| p.side.is_none()) {
            player.side = player.team.as_ref().map(|team| {
                if team == team_name {
                    side
                } else {
                    side.opponent()
                }
            });
        }
    }

    fn recompute_body_direction(&mut self) {
        let belief = &mut self.current.belief;
        belief.body_direction = match (belief.neck_direction, self.current.body.neck_direction) {
            (Some(neck), Some(offset)) => Some(crate::math::normalize_absolute(neck - offset)),
            _ => None,
        };
    }

    /// Publishable copy of the current belief.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::new(self.current.clone())
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{angle_between_points, normalize_relative};
    use crate::world::landmarks;
    use crate::world::percept::Polar;

    fn model() -> WorldModel {
        WorldModel::new(Arc::new(ServerParameters::default()), 36, Some(7))
    }

    fn sight(flag_id: &str, position: Vec2, neck: f32) -> Flag {
        let coords = landmarks::flag_coords(flag_id).unwrap();
        Flag {
            polar: Polar::new(
                position.distance(&coords),
                normalize_relative(angle_between_points(position, coords) - neck),
            ),
            flag_id: flag_id.to_owned(),
        }
    }

    #[test]
    fn no_flags_means_unknown_pose() {
        let mut wm = model();
        wm.on_sense_body(BodyState {
            neck_direction: Some(10.0),
            ..BodyState::default()
        });
        wm.process_new_info(None, vec![], vec![], vec![], vec![]);

        let snapshot = wm.snapshot();
        assert_eq!(snapshot.belief, SelfBelief::default());
        assert_eq!(snapshot.distance_to_point(Vec2::new(0.0, 0.0)), None);
        assert!(!snapshot.is_ball_kickable());
        assert!(snapshot.nearest_teammate().is_none());
    }

    #[test]
    fn losing_landmarks_drops_previous_estimate() {
        let mut wm = model();
        wm.on_sense_body(BodyState {
            neck_direction: Some(0.0),
            ..BodyState::default()
        });
        let here = Vec2::new(0.0, 0.0);
        let flags = ["c", "plc", "prc"].iter().map(|id| sight(id, here, 0.0)).collect();
        wm.process_new_info(None, flags, vec![], vec![], vec![]);
        assert!(wm.current().belief.position.is_some());
        assert!(wm.current().belief.body_direction.is_some());

        wm.process_new_info(None, vec![], vec![], vec![], vec![]);
        assert_eq!(wm.current().belief, SelfBelief::default());
    }

    #[test]
    fn body_direction_subtracts_neck_offset() {
        let mut wm = model();
        wm.on_sense_body(BodyState {
            neck_direction: Some(30.0),
            ..BodyState::default()
        });
        let here = Vec2::new(0.0, 0.0);
        let flags = ["c", "plc", "prc"].iter().map(|id| sight(id, here, 60.0)).collect();
        wm.process_new_info(None, flags, vec![], vec![], vec![]);

        let belief = wm.current().belief;
        assert!((belief.neck_direction.unwrap() - 60.0).abs() < 0.01);
        assert!((belief.body_direction.unwrap() - 30.0).abs() < 0.01);
    }

    #[test]
    fn body_direction_is_unknown_without_neck_offset() {
        let mut wm = model();
        let here = Vec2::new(0.0, 0.0);
        let flags = ["c", "plc", "prc"].iter().map(|id| sight(id, here, 0.0)).collect();
        wm.process_new_info(None, flags, vec![], vec![], vec![]);
        assert!(wm.current().belief.neck_direction.is_some());
        assert_eq!(wm.current().belief.body_direction, None);
    }

    #[test]
    fn referee_events_drive_mode_and_score() {
        let mut wm = model();
        wm.on_init(Side::Right, 4, PlayMode::BeforeKickOff);
        wm.on_referee("kick_off_r".parse().unwrap());
        assert!(wm.current().is_kick_off_us());

        wm.on_referee("goal_l_1".parse().unwrap());
        assert_eq!(wm.current().score_l, 1);
        assert_eq!(wm.current().score_r, 0);
        assert_eq!(wm.current().play_mode, PlayMode::KickOff(Side::Right));
    }

    #[test]
    fn players_are_sided_by_team_name() {
        let mut wm = model();
        wm.set_team_name("robots");
        wm.on_init(Side::Right, 7, PlayMode::BeforeKickOff);
        let players = vec![
            Player {
                team: Some("robots".to_owned()),
                ..Player::default()
            },
            Player {
                team: Some("others".to_owned()),
                ..Player::default()
            },
            Player::default(),
        ];
        wm.process_new_info(None, vec![], vec![], players, vec![]);

        let sides: Vec<_> = wm.current().sighting.players.iter().map(|p| p.side).collect();
        assert_eq!(sides, vec![Some(Side::Right), Some(Side::Left), None]);
    }

    #[test]
    fn published_snapshots_are_independent() {
        let mut wm = model();
        let before = wm.snapshot();
        wm.on_init(Side::Left, 2, PlayMode::PlayOn);
        let after = wm.snapshot();
        assert_eq!(before.side, None);
        assert_eq!(after.side, Some(Side::Left));
    }
}
