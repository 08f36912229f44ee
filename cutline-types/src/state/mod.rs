pub mod clip;
pub mod frame_rate;
pub mod project;
pub mod track;

pub use clip::*;
pub use frame_rate::*;
pub use project::*;
pub use track::*;
