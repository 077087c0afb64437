// Headscale REST endpoint paths, relative to the server root.

pub const USER: &str = "/api/v1/user";
pub const NODE: &str = "/api/v1/node";
pub const PRE_AUTH_KEY: &str = "/api/v1/preauthkey";
pub const API_KEY: &str = "/api/v1/apikey";
pub const API_KEY_EXPIRE: &str = "/api/v1/apikey/expire";
pub const POLICY: &str = "/api/v1/policy";
pub const HEALTH: &str = "/api/v1/health";
