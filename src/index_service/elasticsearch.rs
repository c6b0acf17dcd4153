use super::IndexSearch;
use crate::document_store::ObjectId;
use crate::model::MusicTrack;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const INDEX_NAME: &str = "music_tracks";
const SEARCH_FIELDS: &[&str] = &["title^9", "artist^8", "album^6", "genre^3"];
const SOURCE_FIELDS: &[&str] = &[
    "album",
    "title",
    "artist",
    "genre",
    "release_year",
    "duration",
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "_source")]
    source: Option<MusicTrack>,
}

/// Client of an Elasticsearch compatible `_search` endpoint holding the track index.
pub struct ElasticsearchClient {
    client: reqwest::Client,
    base_url: String,
}

impl ElasticsearchClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create index service HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn query(terms: &str) -> serde_json::Value {
        json!({
            "query": {
                "multi_match": {
                    "query": terms,
                    "fields": SEARCH_FIELDS,
                }
            },
            "_source": SOURCE_FIELDS,
        })
    }
}

/// Tracks carried by the hits, with the id taken from the hit. Hits without a source are
/// skipped.
fn decode_hits(response: SearchResponse) -> Vec<MusicTrack> {
    response
        .hits
        .hits
        .into_iter()
        .filter_map(|hit| {
            let mut track = hit.source?;
            track.id = match hit.id.as_deref().map(ObjectId::parse_str) {
                Some(Ok(id)) => Some(id),
                Some(Err(err)) => {
                    warn!("Index hit with unusable id: {}", err);
                    None
                }
                None => None,
            };
            Some(track)
        })
        .collect()
}

#[async_trait]
impl IndexSearch for ElasticsearchClient {
    async fn search(&self, terms: &str) -> Result<Vec<MusicTrack>> {
        let url = format!("{}/{}/_search", self.base_url, INDEX_NAME);
        let response = self
            .client
            .post(&url)
            .json(&Self::query(terms))
            .send()
            .await
            .context("Failed to reach index service")?;

        if !response.status().is_success() {
            anyhow::bail!("Index search failed with status: {}", response.status());
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse index search response")?;
        let tracks = decode_hits(body);
        debug!("Index search {:?} returned {} tracks", terms, tracks.len());
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    fn response_fixture(id: &str) -> serde_json::Value {
        json!({
            "took": 3,
            "hits": {
                "total": { "value": 2 },
                "hits": [
                    {
                        "_id": id,
                        "_score": 2.5,
                        "_source": { "title": "Quasar", "album": "Qua", "duration": 240 }
                    },
                    { "_id": "missing-source", "_score": 1.0 }
                ]
            }
        })
    }

    #[test]
    fn decodes_sources_and_ids() {
        let id = ObjectId::new();
        let response: SearchResponse =
            serde_json::from_value(response_fixture(&id.to_hex())).unwrap();

        let tracks = decode_hits(response);
        assert_eq!(
            tracks,
            vec![MusicTrack {
                id: Some(id),
                title: Some("Quasar".to_string()),
                album: Some("Qua".to_string()),
                duration: Some(240),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn unusable_hit_id_leaves_track_without_id() {
        let response: SearchResponse = serde_json::from_value(response_fixture("abc")).unwrap();

        let tracks = decode_hits(response);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, None);
    }

    #[test]
    fn query_weights_fields_and_projects_source() {
        let query = ElasticsearchClient::query("qua");
        assert_eq!(query["query"]["multi_match"]["query"], "qua");
        assert_eq!(query["query"]["multi_match"]["fields"][0], "title^9");
        assert_eq!(query["_source"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn posts_query_to_index_endpoint() {
        let id = ObjectId::new();
        let received = Arc::new(Mutex::new(None));
        let received_clone = received.clone();
        let fixture = response_fixture(&id.to_hex());
        let app = Router::new().route(
            "/music_tracks/_search",
            post(move |Json(body): Json<serde_json::Value>| {
                let received = received_clone.clone();
                let fixture = fixture.clone();
                async move {
                    *received.lock().unwrap() = Some(body);
                    Json(fixture)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client =
            ElasticsearchClient::new(&format!("http://{}/", addr), Duration::from_secs(5))
                .unwrap();
        let tracks = client.search("quasar").await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, Some(id));
        let body = received.lock().unwrap().clone().unwrap();
        assert_eq!(body["query"]["multi_match"]["query"], "quasar");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let app = Router::new().route(
            "/music_tracks/_search",
            post(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client =
            ElasticsearchClient::new(&format!("http://{}", addr), Duration::from_secs(5))
                .unwrap();
        assert!(client.search("x").await.is_err());
    }
}
