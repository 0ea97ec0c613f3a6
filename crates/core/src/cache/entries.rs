//! Cached response snapshots and the SQLite [`CacheStore`] implementation.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::hash::RequestKey;
use super::store::CacheStore;
use crate::{Error, Response, ResponseType};

/// An immutable snapshot of a response, captured at put-time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    pub key: RequestKey,
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub response_type: ResponseType,
    pub body: Bytes,
    pub stored_at: String,
}

/// Entry metadata without the body, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct EntrySummary {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub size: usize,
    pub stored_at: String,
}

impl CachedEntry {
    /// Capture `response` under `key`. Takes ownership: duplicate first if the
    /// caller still needs to hand the response on.
    pub fn capture(key: RequestKey, response: Response) -> Self {
        let url = response.url.to_string();
        let status = response.status;
        let status_text = response.status_text.clone();
        let headers = response.headers.clone();
        let response_type = response.response_type;
        Self {
            key,
            url,
            status,
            status_text,
            headers,
            response_type,
            body: response.into_body(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuild a response from the snapshot.
    pub fn to_response(&self) -> Result<Response, Error> {
        let url = url::Url::parse(&self.url).map_err(|e| Error::CorruptEntry(format!("{}: {e}", self.url)))?;
        Ok(Response::new(
            url,
            self.status,
            self.status_text.clone(),
            self.headers.clone(),
            self.response_type,
            self.body.clone(),
        ))
    }

    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            method: self.key.method.clone(),
            url: self.key.url.clone(),
            status: self.status,
            content_type: self
                .headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                .map(|(_, v)| v.clone()),
            size: self.body.len(),
            stored_at: self.stored_at.clone(),
        }
    }
}

#[async_trait]
impl CacheStore for CacheDb {
    async fn open(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
                    params![name, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM generations ORDER BY created_at, name")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, rusqlite::Error>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM generations WHERE name = ?1", params![name])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn match_entry(&self, name: &str, key: &RequestKey) -> Result<Option<CachedEntry>, Error> {
        let name = name.to_string();
        let key = key.clone();
        self.conn
            .call(move |conn| -> Result<Option<CachedEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT url, status, status_text, headers_json, response_type, body, stored_at
                FROM entries WHERE generation = ?1 AND key_hash = ?2",
                )?;

                let result = stmt.query_row(params![name, key.hash], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u16>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Vec<u8>>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                });

                let (url, status, status_text, headers_json, response_type, body, stored_at) = match result {
                    Ok(row) => row,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(e.into()),
                };

                Ok(Some(CachedEntry {
                    key,
                    url,
                    status,
                    status_text,
                    headers: serde_json::from_str(&headers_json)?,
                    response_type: response_type.parse().map_err(Error::CorruptEntry)?,
                    body: Bytes::from(body),
                    stored_at,
                }))
            })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, name: &str, entry: &CachedEntry) -> Result<(), Error> {
        let name = name.to_string();
        let entry = entry.clone();
        let headers_json = serde_json::to_string(&entry.headers)?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
                    params![name, &entry.stored_at],
                )?;
                tx.execute(
                    "INSERT INTO entries (
                    generation, key_hash, method, url, status, status_text,
                    headers_json, response_type, body, stored_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ON CONFLICT(generation, key_hash) DO UPDATE SET
                    method = excluded.method,
                    url = excluded.url,
                    status = excluded.status,
                    status_text = excluded.status_text,
                    headers_json = excluded.headers_json,
                    response_type = excluded.response_type,
                    body = excluded.body,
                    stored_at = excluded.stored_at",
                    params![
                        name,
                        &entry.key.hash,
                        &entry.key.method,
                        &entry.url,
                        entry.status,
                        &entry.status_text,
                        headers_json,
                        entry.response_type.as_str(),
                        entry.body.as_ref(),
                        &entry.stored_at,
                    ],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn remove(&self, name: &str, key: &RequestKey) -> Result<bool, Error> {
        let name = name.to_string();
        let hash = key.hash.clone();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count =
                    conn.execute("DELETE FROM entries WHERE generation = ?1 AND key_hash = ?2", params![name, hash])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn count(&self, name: &str) -> Result<u64, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM entries WHERE generation = ?1", params![name], |row| {
                        row.get(0)
                    })?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Request;
    use url::Url;

    fn make_entry(url: &str, body: &'static [u8]) -> CachedEntry {
        let url = Url::parse(url).unwrap();
        let key = RequestKey::for_request(&Request::get(url.clone()), &[]);
        let response = Response::new(
            url,
            200,
            "OK",
            vec![("content-type".into(), "text/html".into())],
            ResponseType::Basic,
            Bytes::from_static(body),
        );
        CachedEntry::capture(key, response)
    }

    #[tokio::test]
    async fn test_put_and_match() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let entry = make_entry("https://app.test/index.html", b"<html>shell</html>");

        db.put("v1", &entry).await.unwrap();

        let found = db.match_entry("v1", &entry.key).await.unwrap().unwrap();
        assert_eq!(found, entry);
    }

    #[tokio::test]
    async fn test_match_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let entry = make_entry("https://app.test/missing.png", b"");
        assert!(db.match_entry("v1", &entry.key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generations_are_isolated() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let entry = make_entry("https://app.test/index.html", b"one");
        db.put("v1", &entry).await.unwrap();
        assert!(db.match_entry("v2", &entry.key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_wholesale() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put("v1", &make_entry("https://app.test/a.js", b"first")).await.unwrap();
        let second = make_entry("https://app.test/a.js", b"second");
        db.put("v1", &second).await.unwrap();

        assert_eq!(db.count("v1").await.unwrap(), 1);
        let found = db.match_entry("v1", &second.key).await.unwrap().unwrap();
        assert_eq!(found.body, Bytes::from_static(b"second"));
    }

    #[tokio::test]
    async fn test_delete_generation_cascades() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let entry = make_entry("https://app.test/index.html", b"x");
        db.put("v1", &entry).await.unwrap();

        assert!(db.delete("v1").await.unwrap());
        assert!(!db.delete("v1").await.unwrap());
        assert!(db.keys().await.unwrap().is_empty());
        assert_eq!(db.count("v1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open("v1").await.unwrap();
        db.open("v1").await.unwrap();
        db.open("v2").await.unwrap();
        let mut names = db.keys().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["v1".to_string(), "v2".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_entry() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let entry = make_entry("https://app.test/index.html", b"x");
        db.put("v1", &entry).await.unwrap();

        assert!(db.remove("v1", &entry.key).await.unwrap());
        assert!(!db.remove("v1", &entry.key).await.unwrap());
        assert_eq!(db.keys().await.unwrap(), vec!["v1".to_string()]);
    }

    #[test]
    fn test_summary() {
        let entry = make_entry("https://app.test/index.html", b"12345");
        let summary = entry.summary();
        assert_eq!(summary.size, 5);
        assert_eq!(summary.content_type.as_deref(), Some("text/html"));
        assert_eq!(summary.method, "GET");
    }
}
