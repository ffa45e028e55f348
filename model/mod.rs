pub mod coordinate;
pub mod error;
pub mod post;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM};
pub use error::ValidationError;
pub use post::{unix_now, validate_radius, Post, PostId, PostRequest, MAX_LIFETIME_SECS};
