mod formatting;
pub mod os;
pub mod progress_bars;
pub mod prompts;
pub mod random;

pub use formatting::*;
pub use os::*;
pub use progress_bars::*;
pub use prompts::*;
pub use random::*;
