pub mod keys;
pub mod mt19937;
pub mod partition;
pub mod transform;

pub use keys::*;
pub use mt19937::*;
pub use partition::*;
pub use transform::*;
