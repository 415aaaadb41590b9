use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    entities::SavedRoute,
    error::{invalid_input_error, upstream_error, Error},
    storage::DynStore,
};

pub const TOKEN_KEY: &str = "auth_token";

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct FavoriteResponse {
    is_favorite: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<Value>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Thin client for the route backend. It only forwards the stored token;
/// the server decides what it is allowed to see.
///
/// Library-only: the `roteiro` binary serves its own HTTP API and never
/// constructs one. Build it from `Config::backend_url` and the same store
/// the favorites use.
pub struct RouteApiClient {
    client: reqwest::Client,
    base_url: String,
    store: DynStore,
    token: Option<String>,
}

impl RouteApiClient {
    #[tracing::instrument(name = "RouteApiClient::new", skip(store))]
    pub async fn new(base_url: &str, store: DynStore) -> Result<Self, Error> {
        let token = store.get(TOKEN_KEY).await?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            token,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn set_token(&mut self, token: String) -> Result<(), Error> {
        self.store.set(TOKEN_KEY, token.clone()).await?;
        self.token = Some(token);

        Ok(())
    }

    pub async fn clear_token(&mut self) -> Result<(), Error> {
        self.store.remove(TOKEN_KEY).await?;
        self.token = None;

        Ok(())
    }

    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Token {}", token))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));

        match self.authorization() {
            Some(authorization) => builder.header(reqwest::header::AUTHORIZATION, authorization),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, Error> {
        let res = builder.send().await?;
        let status = res.status();

        if status.is_client_error() {
            tracing::warn!("backend rejected request with {}", status);
            return Err(invalid_input_error());
        } else if !status.is_success() {
            tracing::warn!("backend failed with {}", status);
            return Err(upstream_error());
        }

        Ok(res)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, Error> {
        Ok(self.send(builder).await?.json().await?)
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<String, Error> {
        let builder = self
            .client
            .post(self.url("auth/login/"))
            .json(&Credentials { username, password });

        let data: LoginResponse = self.send_json(builder).await?;
        self.set_token(data.token.clone()).await?;

        Ok(data.token)
    }

    #[tracing::instrument(skip(self, route), fields(name = %route.name))]
    pub async fn save_route(&self, route: &SavedRoute) -> Result<Value, Error> {
        let builder = self.request(Method::POST, "routes/").json(route);

        self.send_json(builder).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_routes(&self, params: &[(&str, &str)]) -> Result<Value, Error> {
        let builder = self.request(Method::GET, "routes/").query(params);

        self.send_json(builder).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_route(&self, id: i64) -> Result<Value, Error> {
        let builder = self.request(Method::GET, &format!("routes/{}/", id));

        self.send_json(builder).await
    }

    #[tracing::instrument(skip(self, route))]
    pub async fn update_route(&self, id: i64, route: &SavedRoute) -> Result<Value, Error> {
        let builder = self
            .request(Method::PUT, &format!("routes/{}/", id))
            .json(route);

        self.send_json(builder).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_route(&self, id: i64) -> Result<(), Error> {
        let builder = self.request(Method::DELETE, &format!("routes/{}/", id));
        self.send(builder).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn toggle_favorite(&self, id: i64) -> Result<bool, Error> {
        let builder = self.request(Method::POST, &format!("routes/{}/toggle_favorite/", id));
        let data: FavoriteResponse = self.send_json(builder).await?;

        Ok(data.is_favorite)
    }

    #[tracing::instrument(skip(self))]
    pub async fn share_route(&self, id: i64, platform: &str) -> Result<Value, Error> {
        let builder = self
            .request(Method::POST, &format!("routes/{}/share/", id))
            .json(&json!({ "platform": platform }));
        let data: Value = self.send_json(builder).await?;

        Ok(data.get("share").cloned().unwrap_or(Value::Null))
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_routes(&self, query: &str, sort_by: &str) -> Result<Vec<Value>, Error> {
        let builder = self
            .request(Method::GET, "routes/search/")
            .query(&[("q", query), ("sort_by", sort_by)]);
        let data: SearchResponse = self.send_json(builder).await?;

        Ok(data.results)
    }

    #[tracing::instrument(skip(self))]
    pub async fn statistics(&self) -> Result<Value, Error> {
        let builder = self.request(Method::GET, "routes/statistics/");

        self.send_json(builder).await
    }
}
