pub mod kick;
pub mod landmarks;
pub mod localization;
pub mod model;
pub mod params;
pub mod percept;
pub mod playmode;
pub mod snapshot;

pub use model::WorldModel;
pub use params::ServerParameters;
pub use percept::{Ball, Flag, Goal, Line, Motion, Percept, Player, Polar, Side, Sighting};
pub use playmode::{PlayMode, RefereeEvent, RefereeMessage};
pub use snapshot::{ActionCounts, BodyState, Located, SelfBelief, Snapshot};
