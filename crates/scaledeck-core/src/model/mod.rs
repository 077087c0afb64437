// ── Domain model ──
//
// Canonical, immutable value types produced by the response mapper.
// Mutation happens by replacement in the `DataStore`, never in place.

pub mod api_key;
pub mod node;
pub mod pre_auth_key;
pub mod user;

pub use api_key::ApiKey;
pub use node::Node;
pub use pre_auth_key::PreAuthKey;
pub use user::User;

/// Entities stored in the cache expose the key they are deduplicated by.
pub trait Identified {
    fn cache_key(&self) -> &str;
}

impl Identified for User {
    fn cache_key(&self) -> &str {
        &self.id
    }
}

impl Identified for Node {
    fn cache_key(&self) -> &str {
        &self.id
    }
}

impl Identified for PreAuthKey {
    fn cache_key(&self) -> &str {
        &self.id
    }
}

/// API keys are keyed by `id` when the server sent one, else by `prefix`.
impl Identified for ApiKey {
    fn cache_key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.prefix)
    }
}
