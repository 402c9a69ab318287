mod coordinates;
mod destination;
mod map;
mod origin;
mod resolved;
mod route;

pub use coordinates::Coordinates;
pub use destination::Destination;
pub use map::GeneratedMap;
pub use origin::{normalize, normalize_addresses, Origin, OriginSource, RawOrigin};
pub use resolved::{BatchError, ResolvedOrigin};
pub use route::RouteInfo;
