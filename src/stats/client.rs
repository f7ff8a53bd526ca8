//! Client for the player statistics API.
//!
//! `GET {base}/player/{name}` with an `x-api-key` header. A 200 body carries a
//! `heroes_ranked` array; anything else is reported as "no stats available".

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Deserializer};
use std::cmp::Reverse;
use std::time::Duration;

use super::playtime::{format_playtime, parse_playtime};
use crate::config::AppConfig;

/// Ranked statistics for one hero, as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroStat {
    #[serde(default = "unknown_hero", deserialize_with = "lenient_string")]
    pub hero_name: String,
    #[serde(deserialize_with = "lenient_count")]
    pub matches: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub wins: u64,
    #[serde(default = "zero_playtime", deserialize_with = "lenient_string")]
    pub play_time: String,
    #[serde(deserialize_with = "lenient_count")]
    pub kills: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub deaths: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub assists: u64,
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    #[serde(default)]
    heroes_ranked: Option<Vec<HeroStat>>,
}

fn unknown_hero() -> String {
    "Unknown".to_string()
}

fn zero_playtime() -> String {
    "0".to_string()
}

/// Accepts integers, floats, numeric strings and null; anything unusable becomes 0.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Sorts heroes by descending playtime and keeps the first `limit`.
pub fn top_heroes_by_playtime(mut heroes: Vec<HeroStat>, limit: usize) -> Vec<HeroStat> {
    heroes.sort_by_key(|hero| Reverse(parse_playtime(&hero.play_time)));
    heroes.truncate(limit);
    heroes
}

/// Parses a 200 response body. Returns None when `heroes_ranked` is missing or empty.
pub fn parse_player_response(body: &str, limit: usize) -> Result<Option<Vec<HeroStat>>> {
    let response: PlayerResponse =
        serde_json::from_str(body).context("Failed to parse player stats JSON")?;

    match response.heroes_ranked {
        Some(heroes) if !heroes.is_empty() => Ok(Some(top_heroes_by_playtime(heroes, limit))),
        _ => Ok(None),
    }
}

/// Blocking client for player lookups.
#[derive(Debug, Clone)]
pub struct StatsClient {
    http: Client,
    base_url: String,
    api_key: String,
    top_heroes: usize,
}

impl StatsClient {
    pub fn new(http: Client, base_url: &str, api_key: &str, top_heroes: usize) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            top_heroes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(Self::new(
            http,
            &config.api_base_url,
            &config.api_key,
            config.top_heroes,
        ))
    }

    /// Builds `{base}/player/{name}` with the name percent-encoded as one path segment.
    pub fn player_url(&self, player_name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .push("player")
            .push(player_name);
        Ok(url)
    }

    /// Fetches a player's top heroes by playtime.
    ///
    /// Returns `Ok(None)` for any non-200 status or a response without ranked
    /// heroes; callers show that as a private profile. Transport errors and
    /// malformed JSON are returned as errors.
    pub fn fetch_player_stats(&self, player_name: &str) -> Result<Option<Vec<HeroStat>>> {
        let url = self.player_url(player_name)?;

        let response = self
            .http
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .with_context(|| format!("Request for player '{}' failed", player_name))?;

        let status = response.status();
        crate::log(&format!("Stats lookup '{}': HTTP {}", player_name, status));

        if status != StatusCode::OK {
            return Ok(None);
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read stats for '{}'", player_name))?;
        let heroes = parse_player_response(&body, self.top_heroes)?;
        if let Some(top) = heroes.as_ref().and_then(|h| h.first()) {
            crate::log(&format!(
                "Stats for '{}': most played {} ({})",
                player_name,
                top.hero_name,
                format_playtime(parse_playtime(&top.play_time))
            ));
        }
        Ok(heroes)
    }
}

/// One-shot HTTP responder for exercising the client without network access.
#[cfg(test)]
pub(crate) mod mock {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use reqwest::blocking::Client;

    /// Serves `count` requests with the given status and body.
    /// The handle yields the raw request heads that were received.
    pub fn serve(count: usize, status: u16, body: &str) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/api/v1", listener.local_addr().unwrap());
        let body = body.to_string();

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for _ in 0..count {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut head = String::new();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                    head.push_str(&line);
                }
                let response = format!(
                    "HTTP/1.1 {} MOCK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
                requests.push(head);
            }
            requests
        });

        (base_url, handle)
    }

    pub fn http_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }
}
