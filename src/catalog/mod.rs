//! Entity Services: the uniform Create/View/Update/Delete/Search pattern and the request
//! payloads it accepts for every entity kind.

mod list_request;
mod music_track;
mod playlist;
mod service;

pub use list_request::{parse_search_filter, ListRequest, MAX_LIST_LIMIT};
pub use music_track::{CreateMusicTrack, MusicTrackService, UpdateMusicTrack};
pub use playlist::{CreatePlaylist, DeleteMusicTrack, PlaylistService, UpdatePlaylist};
pub use service::EntityService;

/// Request-level checks run on a payload before it reaches a service.
pub trait Validate {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
