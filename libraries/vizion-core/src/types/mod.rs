mod color;
mod ids;
mod playlist;
mod resource;
mod track;

pub use color::{ColorTriple, Rgb};
pub use ids::{PlaylistId, TrackId, UserId};
pub use playlist::ArmedPlaylist;
pub use resource::ResolvedResource;
pub use track::Track;
