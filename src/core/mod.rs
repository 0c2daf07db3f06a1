pub mod clock;
pub mod resolver;
pub mod roster_manager;
pub mod services;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use resolver::{Resolution, Resolvable};
pub use roster_manager::{LoadMetadata, RosterManager};
