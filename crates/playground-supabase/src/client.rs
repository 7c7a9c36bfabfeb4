use std::time::Duration;

use bytes::Bytes;
use reqwest::{
    Client as HttpClient, RequestBuilder, Response, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    api::{AuthUser, RemoveObjects, SignObject, SignedObject},
    error::SupabaseError,
};

pub const DEFAULT_BUCKET: &str = "media";

/// Thin REST client for one Supabase project.
///
/// Requests always carry the project's anon key (`apikey`) and the end
/// user's session token (`Authorization: Bearer`).
#[derive(Clone)]
pub struct SupabaseClient {
    base: String,
    anon_key: String,
    bucket: String,
    http: HttpClient,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, SupabaseError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self::with_http(base_url, anon_key, http))
    }

    pub fn with_http(base_url: impl Into<String>, anon_key: impl Into<String>, http: HttpClient) -> Self {
        let base: String = base_url.into();
        Self {
            base: base.trim_end_matches('/').to_owned(),
            anon_key: anon_key.into(),
            bucket: DEFAULT_BUCKET.to_owned(),
            http,
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn headers(&self, access_token: &str) -> Result<HeaderMap, SupabaseError> {
        let invalid = |what: &str| SupabaseError::Format(format!("{what} is not a valid header value"));

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key).map_err(|_| invalid("anon key"))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|_| invalid("access token"))?,
        );
        Ok(headers)
    }

    async fn checked(request: RequestBuilder) -> Result<Response, SupabaseError> {
        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::Api { status, body });
        }
        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, SupabaseError> {
        let bytes = Self::checked(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Resolve a session token. Rejected tokens yield `Ok(None)`.
    pub async fn user(&self, access_token: &str) -> Result<Option<AuthUser>, SupabaseError> {
        let url = format!("{}/auth/v1/user", self.base);
        match Self::json(self.http.get(url).headers(self.headers(access_token)?)).await {
            Ok(user) => Ok(Some(user)),
            Err(SupabaseError::Api {
                status: StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN,
                ..
            }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// `GET /rest/v1/{table}` with PostgREST query parameters
    /// (`("id", "eq.42")`, `("select", "*")`, …).
    pub async fn select<T: DeserializeOwned>(
        &self,
        access_token: &str,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SupabaseError> {
        let url = format!("{}/rest/v1/{table}", self.base);
        Self::json(self.http.get(url).headers(self.headers(access_token)?).query(query)).await
    }

    /// Insert one row and return the stored representation.
    pub async fn insert<B, T>(&self, access_token: &str, table: &str, row: &B) -> Result<T, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/rest/v1/{table}", self.base);
        let request = self
            .http
            .post(url)
            .headers(self.headers(access_token)?)
            .header("Prefer", "return=representation")
            .json(row);

        let mut rows: Vec<T> = Self::json(request).await?;
        if rows.is_empty() {
            return Err(SupabaseError::Format(format!("insert into `{table}` returned no row")));
        }
        Ok(rows.swap_remove(0))
    }

    pub async fn delete(&self, access_token: &str, table: &str, query: &[(&str, String)]) -> Result<(), SupabaseError> {
        let url = format!("{}/rest/v1/{table}", self.base);
        Self::checked(self.http.delete(url).headers(self.headers(access_token)?).query(query)).await?;
        Ok(())
    }

    /// Upload (or overwrite) an object in the configured bucket.
    pub async fn upload(
        &self,
        access_token: &str,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        let url = format!("{}/storage/v1/object/{}/{path}", self.base, self.bucket);
        let request = self
            .http
            .post(url)
            .headers(self.headers(access_token)?)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(data);

        Self::checked(request).await?;
        Ok(())
    }

    pub async fn remove(&self, access_token: &str, paths: &[&str]) -> Result<(), SupabaseError> {
        let url = format!("{}/storage/v1/object/{}", self.base, self.bucket);
        let body = RemoveObjects {
            prefixes: paths.to_vec(),
        };
        Self::checked(self.http.delete(url).headers(self.headers(access_token)?).json(&body)).await?;
        Ok(())
    }

    /// Absolute, time-limited download URL for `path`.
    pub async fn sign(&self, access_token: &str, path: &str, ttl: Duration) -> Result<String, SupabaseError> {
        let url = format!("{}/storage/v1/object/sign/{}/{path}", self.base, self.bucket);
        let body = SignObject {
            expires_in: ttl.as_secs().max(1),
        };

        let signed: SignedObject =
            Self::json(self.http.post(url).headers(self.headers(access_token)?).json(&body)).await?;

        if signed.signed_url.starts_with("http") {
            return Ok(signed.signed_url);
        }
        Ok(format!("{}/storage/v1{}", self.base, signed.signed_url))
    }
}
