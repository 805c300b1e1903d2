pub mod deps;
pub mod functions;
pub mod normalize;
pub mod recipes;
pub mod slice;

pub use deps::*;
pub use functions::*;
pub use normalize::*;
pub use recipes::*;
pub use slice::*;
