// ── Error classification and localization ──
//
// Decides which failures deserve a user-facing reaction and turns known
// server messages into friendlier catalog entries.

use std::fmt::Display;

use tracing::debug;

use crate::error::CoreError;

/// Catalog id for the "tags cannot all be removed" server refusal.
pub const CANNOT_REMOVE_ALL_TAGS: &str = "cards.cannotRemoveAllTags";
/// Catalog id for the "moving a tagged node to a user needs re-auth" refusal.
pub const TAGGED_TO_USER_REAUTH_REQUIRED: &str = "cards.taggedToUserReauthRequired";
/// Catalog id for the session-expired notice.
pub const SESSION_UNAUTHORIZED: &str = "auth.unauthorized";

/// Resolves message ids to display text.
pub trait MessageCatalog {
    fn translate(&self, message_id: &str) -> String;
}

/// Built-in English messages. Unknown ids translate to themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl MessageCatalog for EnglishCatalog {
    fn translate(&self, message_id: &str) -> String {
        match message_id {
            CANNOT_REMOVE_ALL_TAGS => {
                "A tagged node must keep at least one tag. Assign it to a user instead.".into()
            }
            TAGGED_TO_USER_REAUTH_REQUIRED => {
                "Moving a tagged node to a user requires the node to re-authenticate.".into()
            }
            SESSION_UNAUTHORIZED => {
                "Your API key was rejected. It may have expired or been revoked.".into()
            }
            other => other.to_owned(),
        }
    }
}

/// Map a known server error message to its catalog entry; anything else
/// is returned verbatim.
pub fn localize_error(err: &dyn Display, catalog: &dyn MessageCatalog) -> String {
    let message = err.to_string();
    if message.contains("cannot remove all tags from a node") {
        return catalog.translate(CANNOT_REMOVE_ALL_TAGS);
    }
    if message.contains("re-authenticating with") || message.contains("force-reauth") {
        return catalog.translate(TAGGED_TO_USER_REAUTH_REQUIRED);
    }
    message
}

/// Routes failures to the session-expired callback.
///
/// Only an unauthorized error triggers `notify`; every error is logged.
pub struct ErrorHandler {
    notify: Box<dyn Fn() + Send + Sync>,
}

impl ErrorHandler {
    pub fn new(notify: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            notify: Box::new(notify),
        }
    }

    pub fn handle(&self, err: &CoreError) {
        if err.is_unauthorized() {
            (self.notify)();
        }
        debug!(error = %err, "error handler");
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHandler").finish_non_exhaustive()
    }
}
