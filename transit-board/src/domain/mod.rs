//! Domain types for the arrival board.
//!
//! Validated identifiers, directions, countdown arithmetic and the
//! rider-facing board entries produced each poll cycle.

mod board;
mod direction;
mod stop_id;
mod time;

pub use board::{Arrival, CheckpointEta, InboundTrain, WindowBucket};
pub use direction::{Direction, InvalidDirection, direction_label};
pub use stop_id::{InvalidStopId, StopId};
pub use time::{instant_from_unix, leave_by, minutes_until};
