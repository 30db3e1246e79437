//! Collection naming and document key helpers.
//!
//! A document key has the form `"<collection>/<id>"`; for documents in
//! sub-collections the collection part is itself a path
//! (`"user/abc/post/xyz"`).

use regex::Regex;
use std::sync::OnceLock;

/// Derives the default collection name from a model type name.
///
/// An underscore is inserted before every run of uppercase letters that does
/// not begin at the very start of the name, then the result is lowercased.
///
/// # Examples
///
/// ```
/// use fireo_core::utils::text::collection_name;
///
/// assert_eq!(collection_name("User"), "user");
/// assert_eq!(collection_name("UserProfile"), "user_profile");
/// assert_eq!(collection_name("CompanyIssue87"), "company_issue87");
/// ```
pub fn collection_name(model: &str) -> String {
    static UPPER_RUN: OnceLock<Regex> = OnceLock::new();
    let upper_run = UPPER_RUN.get_or_init(|| Regex::new(r"[A-Z]+").expect("static regex"));

    let Some(first) = model.chars().next() else {
        return String::new();
    };
    let (head, tail) = model.split_at(first.len_utf8());
    let tail = upper_run.replace_all(tail, "_$0");
    format!("{head}{tail}").to_lowercase()
}

/// Splits a document key into its path segments.
///
/// # Examples
///
/// ```
/// use fireo_core::utils::text::ref_path;
///
/// assert_eq!(ref_path("user/abc"), vec!["user", "abc"]);
/// ```
pub fn ref_path(key: &str) -> Vec<&str> {
    key.split('/').collect()
}

/// Builds the key of document `id` in `collection`.
pub fn document_key(collection: &str, id: &str) -> String {
    format!("{collection}/{id}")
}

/// Splits a key into `(collection_path, id)`.
///
/// Returns `None` unless the key has an even, non-zero number of non-empty
/// segments.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    let segments = ref_path(key);
    if segments.is_empty() || segments.len() % 2 != 0 || segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    key.rsplit_once('/')
}

/// Returns `true` if `id` may be used as a document id.
///
/// Ids must be non-empty, must not contain `/`, and must not be `.` or `..`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/') && id != "." && id != ".."
}
