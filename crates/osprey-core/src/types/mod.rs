mod findings;
mod network;
mod outcome;
mod report;
mod target;

pub use findings::*;
pub use network::*;
pub use outcome::*;
pub use report::*;
pub use target::*;
