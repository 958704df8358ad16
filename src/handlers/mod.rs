//! Example consumers.
//!
//! Each of these only implements [`RecordHandler`](crate::RecordHandler);
//! no decoding logic lives here. They double as usage documentation for
//! the callback surface.

mod print;
mod roots;
mod stats;

pub use print::PrintHandler;
pub use roots::RootCounter;
pub use stats::TypeStats;
