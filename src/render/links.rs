//! Root-relative link rewriting.
//!
//! Link targets are matched by parenthesis depth, so `/wiki/Foo_(bar)` is
//! captured whole rather than cut at the first `)`.

/// Rewrite root-relative Markdown link targets (`](/path)`) to absolute URLs
/// under `site_url`.
///
/// Protocol-relative (`//host`), absolute (`https://...`) and anchor (`#id`)
/// targets are left untouched, as is everything inside fenced code blocks.
/// A fence closes only on a run of the same character at least as long as
/// the one that opened it.
/// Applying this twice gives the same result as applying it once.
pub fn normalize_links(markdown: &str, site_url: &str) -> String {
    let base = site_url.trim_end_matches('/');
    if base.is_empty() {
        return markdown.to_string();
    }

    let mut output = String::with_capacity(markdown.len());
    let mut open_fence: Option<Fence<'_>> = None;

    for line in markdown.split_inclusive('\n') {
        match open_fence {
            Some(open) => {
                if Fence::parse(line).is_some_and(|fence| fence.closes(open)) {
                    open_fence = None;
                }
                output.push_str(line);
            }
            None => match Fence::parse(line).filter(Fence::can_open) {
                Some(fence) => {
                    open_fence = Some(fence);
                    output.push_str(line);
                }
                None => rewrite_line(line, base, &mut output),
            },
        }
    }

    output
}

/// A run of three or more backticks or tildes starting a line.
#[derive(Debug, Clone, Copy)]
struct Fence<'a> {
    marker: u8,
    len: usize,
    info: &'a str,
}

impl<'a> Fence<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = *trimmed.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let len = trimmed.bytes().take_while(|&b| b == marker).count();
        (len >= 3).then(|| Fence {
            marker,
            len,
            info: trimmed[len..].trim(),
        })
    }

    /// Backtick fences cannot carry backticks in their info string.
    fn can_open(&self) -> bool {
        self.marker == b'~' || !self.info.contains('`')
    }

    fn closes(&self, open: Fence<'_>) -> bool {
        self.marker == open.marker && self.len >= open.len && self.info.is_empty()
    }
}

fn rewrite_line(line: &str, base: &str, output: &mut String) {
    let mut rest = line;

    while let Some(pos) = rest.find("](") {
        let target_start = pos + 2;
        // `\](` is a literal bracket inside a label
        if pos > 0 && rest.as_bytes()[pos - 1] == b'\\' {
            output.push_str(&rest[..target_start]);
            rest = &rest[target_start..];
            continue;
        }
        output.push_str(&rest[..target_start]);
        let tail = &rest[target_start..];

        match target_end(tail) {
            Some(end) if is_root_relative(&tail[..end]) => {
                output.push_str(base);
                output.push_str(&tail[..end]);
                rest = &tail[end..];
            }
            Some(end) => {
                output.push_str(&tail[..end]);
                rest = &tail[end..];
            }
            // Unbalanced: not a link, keep scanning after the "]("
            None => rest = tail,
        }
    }

    output.push_str(rest);
}

/// Byte offset of the `)` closing a link target whose `(` was just consumed.
fn target_end(tail: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, b) in tail.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'\n' => return None,
            _ => {}
        }
    }
    None
}

fn is_root_relative(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//")
}
