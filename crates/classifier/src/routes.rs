//! Route paths derived from file-system conventions of file-routed
//! frameworks.

use regex::Regex;
use std::sync::LazyLock;

pub(crate) const HTTP_VERBS: &[&str] = &["get", "post", "put", "delete", "patch", "options", "head"];

/// Route of a file-routed handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DerivedRoute {
    /// Upper-case verb taken from a `name.get.ts` style suffix
    pub method: Option<String>,
    pub path: String,
}

static CATCH_ALL_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\[?\.\.\.([^\]]+)\]\]?$").expect("valid catch-all pattern"));

static DYNAMIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\].]+)\]$").expect("valid dynamic segment pattern"));

/// Route of a handler file under `server/api`, `server/routes`, `routes` or
/// `api`. `server/routes` and `routes` do not appear in the path; `api`
/// does.
pub(crate) fn handler_route(file_path: &str) -> Option<DerivedRoute> {
    let segments: Vec<&str> = file_path.split('/').collect();
    let dirs = &segments[..segments.len().saturating_sub(1)];

    let start = dirs
        .windows(2)
        .position(|pair| pair[0] == "server" && matches!(pair[1], "api" | "routes"))
        .map(|i| if dirs[i + 1] == "api" { i + 1 } else { i + 2 })
        .or_else(|| dirs.iter().position(|seg| *seg == "routes").map(|i| i + 1))
        .or_else(|| dirs.iter().position(|seg| *seg == "api"))?;

    let (stem, method) = split_method_suffix(file_stem(segments.last()?));
    let mut parts: Vec<&str> = segments[start..segments.len() - 1].to_vec();
    parts.push(stem);

    Some(DerivedRoute {
        method,
        path: join_route(&parts, &["index"]),
    })
}

/// Route of a module that may export HTTP verb handlers: `app/**/route.*`,
/// `pages/api/**` or any file below an `api` directory.
pub(crate) fn api_route(file_path: &str) -> Option<String> {
    let segments: Vec<&str> = file_path.split('/').collect();
    let dirs = &segments[..segments.len().saturating_sub(1)];
    let stem = file_stem(segments.last()?);

    if stem == "route" {
        if let Some(app) = dirs.iter().position(|seg| *seg == "app") {
            let mut parts = dirs[app + 1..].to_vec();
            parts.push(stem);
            return Some(join_route(&parts, &["route"]));
        }
    }

    let start = dirs
        .windows(2)
        .position(|pair| pair[0] == "pages" && pair[1] == "api")
        .map(|i| i + 1)
        .or_else(|| dirs.iter().position(|seg| *seg == "api"))?;

    let mut parts = dirs[start..].to_vec();
    parts.push(stem);
    Some(join_route(&parts, &["index", "route"]))
}

fn file_stem(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem)
}

/// `users.get` -> (`users`, `GET`)
fn split_method_suffix(stem: &str) -> (&str, Option<String>) {
    if let Some((name, suffix)) = stem.rsplit_once('.') {
        let suffix = suffix.to_ascii_lowercase();
        if HTTP_VERBS.contains(&suffix.as_str()) {
            return (name, Some(suffix.to_ascii_uppercase()));
        }
    }
    (stem, None)
}

/// Join converted segments; a trailing segment in `implicit` names the
/// directory itself and is dropped.
fn join_route(parts: &[&str], implicit: &[&str]) -> String {
    let mut parts = parts.to_vec();
    if parts.last().is_some_and(|last| implicit.contains(last)) {
        parts.pop();
    }
    let converted: Vec<String> = parts.into_iter().filter_map(convert_segment).collect();
    format!("/{}", converted.join("/"))
}

fn convert_segment(segment: &str) -> Option<String> {
    if segment.is_empty() || (segment.starts_with('(') && segment.ends_with(')')) {
        return None;
    }
    if let Some(caps) = CATCH_ALL_SEGMENT.captures(segment) {
        return Some(format!("*{}", &caps[1]));
    }
    if let Some(caps) = DYNAMIC_SEGMENT.captures(segment) {
        return Some(format!(":{}", &caps[1]));
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn server_api_keeps_api_prefix_and_method_suffix() {
        assert_eq!(
            handler_route("server/api/users/[id].get.ts"),
            Some(DerivedRoute {
                method: Some("GET".into()),
                path: "/api/users/:id".into()
            })
        );
        assert_eq!(
            handler_route("server/api/health.ts"),
            Some(DerivedRoute {
                method: None,
                path: "/api/health".into()
            })
        );
    }

    #[test]
    fn server_routes_drop_anchor_and_index() {
        assert_eq!(
            handler_route("server/routes/feed/index.ts").map(|r| r.path),
            Some("/feed".to_string())
        );
        assert_eq!(
            handler_route("src/routes/[...slug].post.js"),
            Some(DerivedRoute {
                method: Some("POST".into()),
                path: "/*slug".into()
            })
        );
        assert_eq!(handler_route("src/lib/db.ts"), None);
    }

    #[test]
    fn app_router_paths() {
        assert_eq!(
            api_route("app/api/users/[id]/route.ts").as_deref(),
            Some("/api/users/:id")
        );
        assert_eq!(
            api_route("src/app/(admin)/reports/route.ts").as_deref(),
            Some("/reports")
        );
        assert_eq!(
            api_route("app/docs/[[...slug]]/route.ts").as_deref(),
            Some("/docs/*slug")
        );
    }

    #[test]
    fn pages_api_and_api_directories() {
        assert_eq!(api_route("pages/api/users.ts").as_deref(), Some("/api/users"));
        assert_eq!(api_route("pages/api/index.js").as_deref(), Some("/api"));
        assert_eq!(api_route("src/api/orders/route.ts").as_deref(), Some("/api/orders"));
        assert_eq!(api_route("src/components/Button.tsx"), None);
        assert_eq!(api_route("app/dashboard/page.tsx"), None);
    }
}
