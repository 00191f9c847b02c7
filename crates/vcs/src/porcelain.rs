/// Paths named by `git status --porcelain -z`, in git's order. Renames and
/// copies report the new path; the original path that follows is skipped.
pub(crate) fn changed_paths(raw: &str) -> Vec<String> {
    let tokens: Vec<&str> = raw.split('\0').filter(|s| !s.is_empty()).collect();
    let mut paths = Vec::new();
    let mut idx = 0usize;
    while idx < tokens.len() {
        let token = tokens[idx];
        if token.len() < 4 || token.as_bytes().get(2) != Some(&b' ') {
            idx += 1;
            continue;
        }
        let status = token.as_bytes()[0];
        paths.push(token[3..].to_string());

        // `R  new\0old\0`
        if matches!(status, b'R' | b'C') && idx + 1 < tokens.len() {
            idx += 2;
        } else {
            idx += 1;
        }
    }
    paths
}
