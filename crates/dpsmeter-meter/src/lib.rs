//! Poll-tick orchestration: parse the watched log, track combat and publish
//! display snapshots

mod clock;
mod meter;
mod render;
mod snapshot;

pub use clock::{Clock, SystemClock};
pub use meter::Meter;
pub use render::{status_line, JsonLinesRenderer, Renderer, TerminalRenderer};
pub use snapshot::{DisplaySnapshot, ViewData, ViewKind, LAST_COMBAT_VIEW, OVERALL_VIEW};
