mod game_mode;
mod map;
mod record;
mod series;

pub use game_mode::*;
pub use map::*;
pub use record::*;
pub use series::*;
