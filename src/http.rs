use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{
    ETAG, HeaderMap, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED, USER_AGENT,
};
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "scout_terminal";
const CACHE_FILE: &str = "http_cache.json";
const MAX_CACHE_ENTRIES: usize = 512;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

/// Conditional-GET cache for JSON bodies, persisted as one file.
///
/// Owned by whichever provider uses it; a missing or unwritable path just
/// means nothing survives the session.
#[derive(Debug, Default)]
pub struct HttpCache {
    path: Option<PathBuf>,
    file: CacheFile,
}

impl HttpCache {
    pub fn open_default() -> Self {
        Self::open(default_cache_path())
    }

    pub fn open(path: Option<PathBuf>) -> Self {
        let file = path.as_deref().map(load_cache_file).unwrap_or_default();
        Self { path, file }
    }

    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    pub fn cached_body(&self, url: &str) -> Option<&str> {
        self.file.entries.get(url).map(|entry| entry.body.as_str())
    }

    pub fn fetch_json(
        &mut self,
        client: &Client,
        url: &str,
        extra_headers: &[(&str, &str)],
    ) -> Result<String> {
        let cached = self.file.entries.get(url).cloned();

        let mut req = client.get(url).header(USER_AGENT, "Mozilla/5.0");
        for (name, value) in extra_headers {
            req = req.header(*name, *value);
        }
        if let Some(entry) = cached.as_ref() {
            if let Some(etag) = entry.etag.as_ref() {
                req = req.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = entry.last_modified.as_ref() {
                req = req.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        let resp = req.send().context("request failed")?;
        let status = resp.status();
        let headers = resp.headers().clone();
        if status == StatusCode::NOT_MODIFIED {
            let Some(entry) = cached else {
                return Err(anyhow::anyhow!("received 304 without cache body"));
            };
            let body = entry.body.clone();
            self.store(url, entry);
            return Ok(body);
        }

        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {}", status));
        }

        self.store(
            url,
            CacheEntry {
                body: body.clone(),
                etag: header_string(&headers, ETAG),
                last_modified: header_string(&headers, LAST_MODIFIED),
                fetched_at: now_secs(),
            },
        );
        Ok(body)
    }

    fn store(&mut self, url: &str, mut entry: CacheEntry) {
        entry.fetched_at = now_secs();
        self.file.version = CACHE_VERSION;
        self.file.entries.insert(url.to_string(), entry);
        prune_oldest(&mut self.file.entries, MAX_CACHE_ENTRIES);
        if let Some(path) = self.path.as_deref() {
            let _ = save_cache_file(path, &self.file);
        }
    }
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn prune_oldest(entries: &mut HashMap<String, CacheEntry>, max: usize) {
    if entries.len() <= max {
        return;
    }
    let mut by_age: Vec<(String, u64)> = entries
        .iter()
        .map(|(url, entry)| (url.clone(), entry.fetched_at))
        .collect();
    by_age.sort_by_key(|(_, fetched_at)| *fetched_at);
    let excess = entries.len() - max;
    for (url, _) in by_age.into_iter().take(excess) {
        entries.remove(&url);
    }
}

fn load_cache_file(path: &Path) -> CacheFile {
    let Ok(raw) = fs::read_to_string(path) else {
        return CacheFile::default();
    };
    let cache = serde_json::from_str::<CacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return CacheFile::default();
    }
    cache
}

fn save_cache_file(path: &Path, cache: &CacheFile) -> Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(dir).ok();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, path).context("swap http cache")?;
    Ok(())
}

fn default_cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR).join(CACHE_FILE))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
