use std::collections::BTreeMap;

/// Two-level variable lookup: label bindings shadow global bindings.
#[derive(Clone, Copy, Debug)]
pub struct VariableScope<'a> {
    instance: &'a BTreeMap<String, String>,
    global: &'a BTreeMap<String, String>,
}

impl<'a> VariableScope<'a> {
    /// Combine label-level and global bindings.
    pub fn new(instance: &'a BTreeMap<String, String>, global: &'a BTreeMap<String, String>) -> Self {
        Self { instance, global }
    }

    /// Bound value for `name`, label scope first.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.instance
            .get(name)
            .or_else(|| self.global.get(name))
            .map(String::as_str)
    }
}

/// Substitute `{VAR=..}` and evaluate `{IF=..}` tags, leaving every other tag untouched.
///
/// Unbound names go through `fallback`; `None` from the fallback yields an empty string.
/// Substituted values are inserted verbatim and never rescanned, so running the pass again on
/// the same source with the same bindings gives the same output.
pub fn resolve_variables(
    text: &str,
    scope: &VariableScope<'_>,
    fallback: &dyn Fn(&str) -> Option<String>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tag_end(tail) else {
            out.push('{');
            rest = &tail[1..];
            continue;
        };
        let body = &tail[1..close];
        let (tag, arg) = split_tag(body);
        match (tag.as_str(), arg) {
            ("VAR", Some(name)) => {
                let name = name.trim();
                match scope.get(name) {
                    Some(v) => out.push_str(v),
                    None => {
                        let v = fallback(name);
                        if v.is_none() {
                            tracing::debug!(name, "unbound variable resolved to empty text");
                        }
                        out.push_str(v.as_deref().unwrap_or(""));
                    }
                }
            }
            ("IF", Some(args)) => {
                let branch = select_branch(args, scope, fallback);
                out.push_str(&resolve_variables(branch, scope, fallback));
            }
            _ => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Upper-cased tag name and the raw argument after the first `=`.
pub(crate) fn split_tag(body: &str) -> (String, Option<&str>) {
    match body.split_once('=') {
        Some((name, arg)) => (name.trim().to_ascii_uppercase(), Some(arg)),
        None => (body.trim().to_ascii_uppercase(), None),
    }
}

/// Byte offset of the `}` ending the tag opened at `s[0]`.
///
/// Reaching another `{` first makes the opening brace literal, as the tokenizer reads it. Only
/// `IF` arguments may nest tags.
fn tag_end(s: &str) -> Option<usize> {
    let next = 1 + s[1..].find(['{', '}'])?;
    if s.as_bytes()[next] == b'}' {
        return Some(next);
    }
    match split_tag(&s[1..next]) {
        (tag, Some(_)) if tag == "IF" => matching_brace(s),
        _ => None,
    }
}

/// Byte offset of the `}` closing the `{` at `s[0]`, honoring nesting.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on `;` outside nested braces.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn select_branch<'t>(
    args: &'t str,
    scope: &VariableScope<'_>,
    fallback: &dyn Fn(&str) -> Option<String>,
) -> &'t str {
    let mut parts = split_top_level(args).into_iter();
    let name = parts.next().unwrap_or("").trim();
    let value = scope
        .get(name)
        .map(str::to_owned)
        .or_else(|| fallback(name));

    let mut default = None;
    for part in parts {
        let Some((case, text)) = part.split_once('=') else {
            tracing::debug!(part, "IF branch without '=' ignored");
            continue;
        };
        let case = case.trim();
        if case.is_empty() {
            default.get_or_insert(text);
        } else if value.as_deref().map(str::trim) == Some(case) {
            return text;
        }
    }
    default.unwrap_or("")
}

#[cfg(test)]
#[path = "../../tests/unit/markup/vars.rs"]
mod tests;
