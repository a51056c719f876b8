/// Replaces every occurrence of `search` in `s` with `replacement`.
///
/// Behaves like splitting on `search` and joining the pieces with
/// `replacement`. An empty `search` splits between characters, so the
/// replacement lands between each pair of characters but not at either end.
pub fn replace_all(s: &str, search: &str, replacement: &str) -> String {
    if !search.is_empty() {
        return s.split(search).collect::<Vec<_>>().join(replacement);
    }

    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        if i > 0 {
            out.push_str(replacement);
        }
        out.push(c);
    }
    out
}
