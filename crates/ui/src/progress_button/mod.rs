mod element;
mod model;
mod state;
mod tap;

pub use element::*;
pub use model::*;
pub use state::*;
pub use tap::*;
