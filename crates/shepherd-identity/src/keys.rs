//! Document paths in the identity store.

use shepherd_core::EndUserId;

/// Top-level collection holding per-user subscription records.
pub const SUBSCRIPTIONS_ROOT: &str = "user-subscriptions";

/// Field holding the Fermata customer ID inside a subscription record.
pub const CUSTOMER_ID_FIELD: &str = "fermataCustomerId";

/// Path segments of the customer ID field for a user.
///
/// Format: `user-subscriptions / {user_id} / fermataCustomerId`
#[must_use]
pub fn customer_id_segments(user_id: &EndUserId) -> [&str; 3] {
    [SUBSCRIPTIONS_ROOT, user_id.as_str(), CUSTOMER_ID_FIELD]
}

/// The customer ID path as a single slash-joined string, for logging.
#[must_use]
pub fn customer_id_path(user_id: &EndUserId) -> String {
    customer_id_segments(user_id).join("/")
}
