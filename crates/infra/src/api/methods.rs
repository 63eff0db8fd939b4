//! Method catalogue
//!
//! Knows which method names exist, which of them can be called without an
//! access token, and which permission a method's namespace requires.

use vkclient_domain::{Permission, Scope};

/// Bare method that takes no namespace.
pub const EXECUTE: &str = "execute";

const NAMESPACES: &[&str] = &[
    "account",
    "ads",
    "apps",
    "audio",
    "auth",
    "board",
    "database",
    "docs",
    "fave",
    "friends",
    "gifts",
    "groups",
    "leads",
    "likes",
    "market",
    "messages",
    "newsfeed",
    "notes",
    "notifications",
    "orders",
    "pages",
    "photos",
    "places",
    "polls",
    "search",
    "secure",
    "stats",
    "status",
    "storage",
    "users",
    "utils",
    "video",
    "wall",
    "widgets",
];

/// Namespaces whose every method is callable without a token.
const OPEN_NAMESPACES: &[&str] = &["database", "utils"];

const OPEN_METHODS: &[&str] = &[
    "auth.checkPhone",
    "auth.confirm",
    "auth.restore",
    "auth.signup",
    "board.getComments",
    "board.getTopics",
    "friends.get",
    "groups.getById",
    "groups.getMembers",
    "likes.getList",
    "newsfeed.search",
    "pages.get",
    "photos.get",
    "photos.getAlbums",
    "photos.getById",
    "status.get",
    "users.get",
    "users.getFollowers",
    "users.getSubscriptions",
    "users.isAppUser",
    "users.search",
    "video.getComments",
    "wall.get",
    "wall.getById",
    "wall.getComments",
    "wall.getReposts",
    "wall.search",
    "widgets.getComments",
    "widgets.getPages",
];

/// Check that `name` is a known `namespace.method` (or `execute`).
pub fn is_method(name: &str) -> bool {
    if name == EXECUTE {
        return true;
    }
    let Some((namespace, method)) = name.split_once('.') else {
        return false;
    };
    NAMESPACES.contains(&namespace) && is_identifier(method)
}

/// Check whether `name` may be called without an access token.
pub fn is_open_method(name: &str) -> bool {
    if OPEN_METHODS.contains(&name) {
        return true;
    }
    name.split_once('.').is_some_and(|(namespace, _)| OPEN_NAMESPACES.contains(&namespace))
}

/// Permission a method's namespace is gated behind, if any.
pub fn required_permission(name: &str) -> Option<Permission> {
    let (namespace, _) = name.split_once('.')?;
    let permission = match namespace {
        "ads" => Permission::Ads,
        "audio" => Permission::Audio,
        "docs" => Permission::Docs,
        "friends" => Permission::Friends,
        "groups" => Permission::Groups,
        "market" => Permission::Market,
        "messages" => Permission::Messages,
        "notes" => Permission::Notes,
        "notifications" => Permission::Notifications,
        "pages" => Permission::Pages,
        "photos" => Permission::Photos,
        "stats" => Permission::Stats,
        "status" => Permission::Status,
        "video" => Permission::Video,
        "wall" => Permission::Wall,
        _ => return None,
    };
    Some(permission)
}

/// Open methods and ungated namespaces are always in scope; every other
/// method needs its namespace's permission bit.
pub fn is_in_scope(name: &str, scope: Scope) -> bool {
    if is_open_method(name) {
        return true;
    }
    required_permission(name).map_or(true, |permission| scope.contains(permission))
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
