pub mod audio_payload;
mod music_track;
mod playlist;

pub use music_track::MusicTrack;
pub use playlist::{Playlist, PLAYLIST_TRACKS_FIELD};
