pub mod astro;
pub mod ensemble;
pub mod gann;
pub mod price;
pub mod signal;

pub use astro::*;
pub use ensemble::*;
pub use gann::*;
pub use price::*;
pub use signal::*;
