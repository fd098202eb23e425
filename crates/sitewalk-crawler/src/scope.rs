use std::collections::HashSet;

/// Decides whether a candidate URL belongs to the crawl.
///
/// The format check is a string heuristic, not hostname parsing: a URL is
/// on-site when it starts with the root URL, or when it contains the part of
/// the root after its first `www.`. Only the root is stripped, never the
/// candidate.
pub(crate) struct Scope {
    root_url: String,
    bare_host: Option<String>,
    exclusions: Vec<String>,
}

impl Scope {
    pub fn new(root_url: &str, exclusions: Vec<String>) -> Self {
        let bare_host = root_url
            .split_once("www.")
            .map(|(_, rest)| rest.to_string());
        Self {
            root_url: root_url.to_string(),
            bare_host,
            exclusions,
        }
    }

    /// True when `url` is on-site, unseen, and not excluded. An empty
    /// exclusion list excludes nothing.
    pub fn in_scope(
        &self,
        url: &str,
        visited: &HashSet<String>,
        queued: &HashSet<String>,
    ) -> bool {
        let format_ok = url.starts_with(&self.root_url)
            || self
                .bare_host
                .as_deref()
                .is_some_and(|host| url.contains(host));
        let novel = !visited.contains(url) && !queued.contains(url);
        let excluded = self.exclusions.iter().any(|s| url.contains(s.as_str()));
        format_ok && novel && !excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_sets() -> (HashSet<String>, HashSet<String>) {
        (HashSet::new(), HashSet::new())
    }

    #[test]
    fn accepts_urls_prefixed_by_the_root() {
        let scope = Scope::new("https://ex.com", vec![]);
        let (visited, queued) = empty_sets();
        assert!(scope.in_scope("https://ex.com/about", &visited, &queued));
        assert!(!scope.in_scope("https://other.com/x", &visited, &queued));
    }

    #[test]
    fn bare_host_fallback_strips_only_the_root() {
        let scope = Scope::new("https://www.ex.com", vec![]);
        let (visited, queued) = empty_sets();
        // "https://m.ex.com/contact" does not start with the root but
        // contains "ex.com".
        assert!(scope.in_scope("https://m.ex.com/contact", &visited, &queued));
    }

    #[test]
    fn a_root_without_www_has_no_fallback() {
        let scope = Scope::new("https://ex.com", vec![]);
        let (visited, queued) = empty_sets();
        assert!(!scope.in_scope("https://sub.ex.com/", &visited, &queued));
    }

    #[test]
    fn rejects_urls_already_seen() {
        let scope = Scope::new("https://ex.com", vec![]);
        let (mut visited, mut queued) = empty_sets();
        visited.insert("https://ex.com/a".to_string());
        queued.insert("https://ex.com/b".to_string());
        assert!(!scope.in_scope("https://ex.com/a", &visited, &queued));
        assert!(!scope.in_scope("https://ex.com/b", &visited, &queued));
        assert!(scope.in_scope("https://ex.com/c", &visited, &queued));
    }

    #[test]
    fn exclusion_substrings_reject_otherwise_in_scope_urls() {
        let scope = Scope::new("https://ex.com", vec!["/admin".to_string()]);
        let (visited, queued) = empty_sets();
        assert!(!scope.in_scope("https://ex.com/admin/users", &visited, &queued));
        assert!(scope.in_scope("https://ex.com/public", &visited, &queued));
    }

    #[test]
    fn an_empty_exclusion_list_excludes_nothing() {
        let scope = Scope::new("https://ex.com", vec![]);
        let (visited, queued) = empty_sets();
        assert!(scope.in_scope("https://ex.com/anything", &visited, &queued));
    }
}
