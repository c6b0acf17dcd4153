//! HTTP client for end-to-end tests
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

const MUSIC_TRACKS: &str = "/v1/customer/music-tracks";
const PLAYLISTS: &str = "/v1/customer/playlists";

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn list(&self, collection: &str, query: &str, page: usize, limit: usize) -> Response {
        let filter = json!({ "query": query }).to_string();
        self.list_with_filter(collection, &filter, page, limit).await
    }

    /// GET <collection>?f=<filter>&p=<page>&l=<limit>
    pub async fn list_with_filter(
        &self,
        collection: &str,
        filter: &str,
        page: usize,
        limit: usize,
    ) -> Response {
        let page = page.to_string();
        let limit = limit.to_string();
        self.client
            .get(self.url(collection))
            .query(&[("f", filter), ("p", page.as_str()), ("l", limit.as_str())])
            .send()
            .await
            .expect("List request failed")
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// GET /
    pub async fn get_health(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Health request failed")
    }

    // ========================================================================
    // Music Track Endpoints
    // ========================================================================

    /// POST /v1/customer/music-tracks
    pub async fn create_music_track(&self, body: &Value) -> Response {
        self.client
            .post(self.url(MUSIC_TRACKS))
            .json(body)
            .send()
            .await
            .expect("Create music track request failed")
    }

    /// Creates a track and returns its JSON, panicking unless the server accepted it
    pub async fn create_music_track_ok(&self, body: &Value) -> Value {
        let response = self.create_music_track(body).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Invalid music track JSON")
    }

    /// GET /v1/customer/music-tracks/{id}
    pub async fn get_music_track(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("{}/{}", MUSIC_TRACKS, id)))
            .send()
            .await
            .expect("Get music track request failed")
    }

    /// PATCH /v1/customer/music-tracks/{id}
    pub async fn update_music_track(&self, id: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(&format!("{}/{}", MUSIC_TRACKS, id)))
            .json(body)
            .send()
            .await
            .expect("Update music track request failed")
    }

    /// DELETE /v1/customer/music-tracks/{id}
    pub async fn delete_music_track(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("{}/{}", MUSIC_TRACKS, id)))
            .send()
            .await
            .expect("Delete music track request failed")
    }

    /// GET /v1/customer/music-tracks with a `{"query": ...}` filter
    pub async fn search_music_tracks(&self, query: &str, page: usize, limit: usize) -> Response {
        self.list(MUSIC_TRACKS, query, page, limit).await
    }

    /// GET /v1/customer/music-tracks with a raw filter string
    pub async fn search_music_tracks_raw(&self, filter: &str) -> Response {
        self.list_with_filter(MUSIC_TRACKS, filter, 0, 0).await
    }

    /// GET /v1/customer/music-tracks/index-search?query=
    pub async fn index_search(&self, query: &str) -> Response {
        self.client
            .get(self.url(&format!("{}/index-search", MUSIC_TRACKS)))
            .query(&[("query", query)])
            .send()
            .await
            .expect("Index search request failed")
    }

    // ========================================================================
    // Playlist Endpoints
    // ========================================================================

    /// POST /v1/customer/playlists
    pub async fn create_playlist(&self, body: &Value) -> Response {
        self.client
            .post(self.url(PLAYLISTS))
            .json(body)
            .send()
            .await
            .expect("Create playlist request failed")
    }

    /// GET /v1/customer/playlists/{id}
    pub async fn get_playlist(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("{}/{}", PLAYLISTS, id)))
            .send()
            .await
            .expect("Get playlist request failed")
    }

    /// PATCH /v1/customer/playlists/{id}
    pub async fn update_playlist(&self, id: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(&format!("{}/{}", PLAYLISTS, id)))
            .json(body)
            .send()
            .await
            .expect("Update playlist request failed")
    }

    /// DELETE /v1/customer/playlists/{id}
    pub async fn delete_playlist(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("{}/{}", PLAYLISTS, id)))
            .send()
            .await
            .expect("Delete playlist request failed")
    }

    /// DELETE /v1/customer/playlists/music-tracks/{id}
    pub async fn remove_playlist_music_track(&self, playlist_id: &str, track_id: &str) -> Response {
        self.client
            .delete(self.url(&format!("{}/music-tracks/{}", PLAYLISTS, playlist_id)))
            .json(&json!({ "music_track_id": track_id }))
            .send()
            .await
            .expect("Remove playlist music track request failed")
    }

    /// GET /v1/customer/playlists with a `{"query": ...}` filter
    pub async fn search_playlists(&self, query: &str, page: usize, limit: usize) -> Response {
        self.list(PLAYLISTS, query, page, limit).await
    }
}
