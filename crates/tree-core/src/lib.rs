pub mod constants;
pub mod driver;
pub mod error;
pub mod gesture;
pub mod layout;
pub mod particle;
pub mod snow;
pub mod state;
pub mod system;

pub use constants::*;
pub use driver::*;
pub use error::*;
pub use gesture::*;
pub use particle::*;
pub use snow::*;
pub use state::*;
pub use system::*;
