pub mod duration;
pub mod input;
pub mod offset;
pub mod scale;
pub mod scaling;

pub use duration::*;
pub use input::*;
pub use offset::*;
pub use scale::*;
pub use scaling::*;
