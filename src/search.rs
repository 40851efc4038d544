use crate::api::User;
use crate::app::AppState;

/// Case-insensitive match on name, email or id.
pub fn matches(user: &User, query_lower: &str) -> bool {
    query_lower.is_empty()
        || user.name_or_empty().to_lowercase().contains(query_lower)
        || user.email_or_empty().to_lowercase().contains(query_lower)
        || user.id.is_some_and(|id| id.to_string().contains(query_lower))
}

/// Rebuild `app.users` from `app.users_all` using the current query. Order
/// is preserved; the cursor is clamped to the new length.
pub fn apply_search(app: &mut AppState) {
    let q = app.search_query.to_lowercase();
    app.users = app
        .users_all
        .iter()
        .filter(|u| matches(u, &q))
        .cloned()
        .collect();
    app.clamp_cursor();
}
