pub mod balance;
pub mod forecast;
pub mod irrigation;
pub mod recommendation;
pub mod soil;
pub mod weather;

pub use balance::*;
pub use forecast::*;
pub use irrigation::*;
pub use recommendation::*;
pub use soil::*;
pub use weather::*;
