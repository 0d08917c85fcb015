/// Marker line that closes a fully processed work list.
pub const SENTINEL: &str = "done";

/// One entry of the work list: where to fetch from and what to call the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub source_ref: String,
    pub display_name: String,
}

impl WorkItem {
    pub fn new(source_ref: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            source_ref: source_ref.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedWorkList {
    pub items: Vec<WorkItem>,
    /// Lines that could not be split into a reference and a name, verbatim.
    pub malformed: Vec<String>,
}

pub fn is_sentinel(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(SENTINEL)
}

/// True when the last non-blank line is the sentinel.
pub fn is_completed<S: AsRef<str>>(lines: &[S]) -> bool {
    lines
        .iter()
        .map(|line| line.as_ref())
        .rev()
        .find(|line| !line.trim().is_empty())
        .is_some_and(is_sentinel)
}

/// Parse `<reference><whitespace><display name>` lines, stopping at the first sentinel.
///
/// A completed list yields nothing: every entry above its sentinel was already processed.
pub fn parse_work_list<S: AsRef<str>>(lines: &[S]) -> ParsedWorkList {
    let mut parsed = ParsedWorkList::default();
    if is_completed(lines) {
        return parsed;
    }
    for line in lines.iter().map(|line| line.as_ref()) {
        if line.trim().is_empty() {
            continue;
        }
        if is_sentinel(line) {
            break;
        }
        match split_entry(line) {
            Some(item) => parsed.items.push(item),
            None => parsed.malformed.push(line.to_string()),
        }
    }
    parsed
}

fn split_entry(line: &str) -> Option<WorkItem> {
    let line = line.trim_start();
    let (reference, rest) = line.split_once(char::is_whitespace)?;
    let name = rest.trim_start();
    if name.is_empty() {
        return None;
    }
    Some(WorkItem::new(reference, name.trim_end()))
}

#[cfg(test)]
mod tests {
    use super::split_entry;

    #[test]
    fn splits_on_first_whitespace_run_only() {
        let item = split_entry("https://x/y \t  My  Song  ").unwrap();
        assert_eq!(item.source_ref, "https://x/y");
        assert_eq!(item.display_name, "My  Song");
    }

    #[test]
    fn single_field_is_rejected() {
        assert!(split_entry("https://x/y").is_none());
        assert!(split_entry("https://x/y   ").is_none());
    }
}
