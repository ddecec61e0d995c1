pub mod remote;
pub mod types;

pub use remote::RemoteOsrmProvider;
pub use types::DirectionsResponse;
