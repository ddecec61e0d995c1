pub mod sdk;

pub use sdk::config::RouterConfig;
pub use sdk::routing::{
    InputPoint, OrderedPoints, RemoteOsrmProvider, ResolvedRoute, RouteCache, RouteResolver,
    RouteState, RouteWatcher, RoutingError, RoutingProvider,
};
pub use sdk::tour::{load_keypoints, Keypoint, Tour};
pub use sdk::util::cancel::CancelToken;
