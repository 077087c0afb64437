// Test doubles shared by unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use url::Url;

use scaledeck_api::ApiTransport;

use crate::accessor::Accessor;
use crate::convert::{map_api_key, map_user};
use crate::model::{ApiKey, User};
use crate::store::DataStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Records every request and answers from canned payloads keyed by
/// `path` or `path?key=value`. Unknown keys answer 404.
pub(crate) struct FakeTransport {
    base_url: Url,
    responses: HashMap<String, Value>,
    pub unauthorized: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse("https://hs.example.com/").unwrap(),
            responses: HashMap::new(),
            unauthorized: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(mut self, key: &str, payload: Value) -> Self {
        self.responses.insert(key.to_owned(), payload);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, scaledeck_api::Error> {
        let query: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect();
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_owned(),
            query: query.clone(),
            body: body.cloned(),
        });
        if self.unauthorized {
            return Err(scaledeck_api::Error::Unauthorized);
        }
        let key = match query.first() {
            Some((k, v)) => format!("{path}?{k}={v}"),
            None => path.to_owned(),
        };
        self.responses
            .get(&key)
            .cloned()
            .ok_or(scaledeck_api::Error::Http {
                status: 404,
                message: format!("no fixture for {key}"),
            })
    }
}

impl ApiTransport for FakeTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, scaledeck_api::Error> {
        self.record("GET", path, query, None)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, scaledeck_api::Error> {
        self.record("POST", path, &[], Some(body))
    }

    async fn delete(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(), scaledeck_api::Error> {
        self.record("DELETE", path, query, None).map(|_| ())
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

pub(crate) fn accessor(transport: FakeTransport) -> Accessor<FakeTransport> {
    Accessor::new(transport, Arc::new(DataStore::new()))
}

pub(crate) fn user(id: &str, name: &str) -> User {
    map_user(&json!({ "id": id, "name": name })).unwrap()
}

pub(crate) fn api_key(id: &str, prefix: &str) -> ApiKey {
    map_api_key(&json!({ "id": id, "prefix": prefix })).unwrap()
}
