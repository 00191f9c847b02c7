use context_protocol::{part_marker, TRUNCATION_MARKER};
use serde::{Deserialize, Serialize};

/// What happens to a document over its size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruncationStrategy {
    /// Cut and append the truncation marker
    #[default]
    Truncate,
    /// Spread over numbered parts
    Split,
}

/// Per-document size limits; `None` leaves that dimension unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeLimits {
    pub max_lines: Option<usize>,
    pub max_chars: Option<usize>,
    pub strategy: TruncationStrategy,
}

/// Outcome of bounding one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bounded {
    Unchanged(String),
    /// Content with the marker appended, and the limit that cut it
    Truncated { content: String, limit: usize },
    /// Part bodies without part markers, at least two
    Split(Vec<String>),
}

impl SizeLimits {
    pub fn exceeded_by(&self, content: &str) -> bool {
        self.max_lines.is_some_and(|max| line_count(content) > max)
            || self.max_chars.is_some_and(|max| content.chars().count() > max)
    }

    pub fn apply(&self, content: String) -> Bounded {
        if !self.exceeded_by(&content) {
            return Bounded::Unchanged(content);
        }
        match self.strategy {
            TruncationStrategy::Truncate => {
                let (content, limit) = truncate(&content, self);
                Bounded::Truncated { content, limit }
            }
            TruncationStrategy::Split => {
                let parts = split(&content, self);
                if parts.len() < 2 {
                    Bounded::Unchanged(content)
                } else {
                    Bounded::Split(parts)
                }
            }
        }
    }
}

fn line_count(content: &str) -> usize {
    content.split_inclusive('\n').count()
}

/// Byte offset after the first `max_chars` characters
fn char_boundary(input: &str, max_chars: usize) -> usize {
    input
        .char_indices()
        .nth(max_chars)
        .map_or(input.len(), |(idx, _)| idx)
}

/// Byte offset after the first `max_lines` lines
fn line_boundary(input: &str, max_lines: usize) -> usize {
    input
        .split_inclusive('\n')
        .take(max_lines)
        .map(str::len)
        .sum()
}

/// Cut at the line limit, then at the char limit minus the marker, and
/// append the marker. Returns the limit that applied last.
pub fn truncate(content: &str, limits: &SizeLimits) -> (String, usize) {
    let marker_chars = TRUNCATION_MARKER.chars().count();
    let mut kept = content;
    let mut limit = 0;

    if let Some(max_lines) = limits.max_lines {
        if line_count(kept) > max_lines {
            kept = &kept[..line_boundary(kept, max_lines)];
            limit = max_lines;
        }
    }
    if let Some(max_chars) = limits.max_chars {
        if kept.chars().count() + marker_chars > max_chars {
            let budget = max_chars.saturating_sub(marker_chars);
            kept = &kept[..char_boundary(kept, budget)];
            limit = max_chars;
        }
    }

    let mut out = String::with_capacity(kept.len() + TRUNCATION_MARKER.len());
    out.push_str(kept);
    out.push_str(TRUNCATION_MARKER);
    (out, limit)
}

/// Split into line groups of `max_lines`, then into char chunks that leave
/// room for the part marker. Concatenated parts equal the input.
pub fn split(content: &str, limits: &SizeLimits) -> Vec<String> {
    let groups: Vec<String> = match limits.max_lines {
        Some(max_lines) if max_lines > 0 => content
            .split_inclusive('\n')
            .collect::<Vec<_>>()
            .chunks(max_lines)
            .map(|chunk| chunk.concat())
            .collect(),
        _ => vec![content.to_string()],
    };

    let Some(max_chars) = limits.max_chars else {
        return non_empty(groups);
    };

    // The marker grows with the part count; widen the reserve until it fits
    let mut reserve = part_marker(1, 1).chars().count();
    loop {
        let window = max_chars.saturating_sub(reserve).max(1);
        let parts: Vec<String> = groups
            .iter()
            .flat_map(|group| split_chars(group, window))
            .collect();
        let needed = part_marker(parts.len(), parts.len()).chars().count();
        if needed <= reserve || window == 1 {
            return non_empty(parts);
        }
        reserve = needed;
    }
}

fn non_empty(parts: Vec<String>) -> Vec<String> {
    if parts.is_empty() {
        vec![String::new()]
    } else {
        parts
    }
}

/// Chunks of at most `window` chars. A chunk ends after the last newline or
/// space in the window when that keeps at least 80% of it, else at the hard
/// limit.
fn split_chars(text: &str, window: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = text;

    while rest.chars().count() > window {
        let hard = char_boundary(rest, window);
        let soft = rest[..hard]
            .rfind(['\n', ' '])
            .map(|idx| idx + 1)
            .filter(|&cut| rest[..cut].chars().count() * 5 >= window * 4);
        let cut = soft.unwrap_or(hard);
        parts.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
    if !rest.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn limits(max_lines: Option<usize>, max_chars: Option<usize>) -> SizeLimits {
        SizeLimits {
            max_lines,
            max_chars,
            strategy: TruncationStrategy::Truncate,
        }
    }

    #[test]
    fn content_within_limits_is_unchanged() {
        let bounded = limits(Some(3), Some(100)).apply("a\nb\nc\n".to_string());
        assert_eq!(bounded, Bounded::Unchanged("a\nb\nc\n".into()));
    }

    #[test]
    fn truncate_cuts_lines_then_reserves_marker() {
        let (out, limit) = truncate("one\ntwo\nthree\nfour\n", &limits(Some(2), None));
        assert_eq!(out, format!("one\ntwo\n{TRUNCATION_MARKER}"));
        assert_eq!(limit, 2);

        let text = "x".repeat(100);
        let (out, limit) = truncate(&text, &limits(None, Some(50)));
        assert_eq!(out.chars().count(), 50);
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert_eq!(limit, 50);
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let text = "é".repeat(80);
        let (out, _) = truncate(&text, &limits(None, Some(40)));
        assert_eq!(out.chars().count(), 40);
    }

    #[test]
    fn split_prefers_whitespace_breaks_near_the_window_end() {
        let words = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let parts = split_chars(words, 20);
        assert_eq!(parts.concat(), words);
        assert_eq!(parts[0], "alpha beta gamma ");
        assert!(parts.iter().all(|p| p.chars().count() <= 20));
    }

    #[test]
    fn split_falls_back_to_hard_limit() {
        let text = format!("ab {}", "c".repeat(30));
        let parts = split_chars(&text, 10);
        assert_eq!(parts[0], "ab ccccccc");
        assert_eq!(parts[0].chars().count(), 10);
    }

    #[test]
    fn split_by_lines_groups_lines() {
        let parts = split(
            "1\n2\n3\n4\n5",
            &SizeLimits {
                max_lines: Some(2),
                max_chars: None,
                strategy: TruncationStrategy::Split,
            },
        );
        assert_eq!(parts, vec!["1\n2\n", "3\n4\n", "5"]);
    }

    #[test]
    fn split_parts_leave_room_for_their_marker() {
        let text = "word ".repeat(400);
        let limits = SizeLimits {
            max_lines: None,
            max_chars: Some(60),
            strategy: TruncationStrategy::Split,
        };
        let parts = split(&text, &limits);
        let total = parts.len();
        for (i, part) in parts.iter().enumerate() {
            let with_marker = format!("{part}{}", part_marker(i + 1, total));
            assert!(with_marker.chars().count() <= 60, "{with_marker:?}");
        }
        assert_eq!(parts.concat(), text);
    }
}
