pub mod config;
pub mod routing;
pub mod tour;
pub mod util;
