pub mod directory;
pub mod schedule;
pub mod time;


pub use directory::*;
pub use schedule::*;
pub use time::*;
