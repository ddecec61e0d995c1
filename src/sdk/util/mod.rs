pub mod cancel;
pub mod log;
pub mod rate_limit;
