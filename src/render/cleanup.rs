//! Post-processing pipeline applied to the assembled Markdown.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Options for output cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Convert `\r\n` and lone `\r` to `\n`
    pub normalize_line_endings: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Strip trailing spaces and tabs from lines, keeping Markdown hard
    /// breaks (exactly two trailing spaces)
    pub trim_trailing_whitespace: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,
}

impl CleanupOptions {
    /// Only the blank-line collapse required for well-formed output.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: false,
            normalize_line_endings: false,
            remove_replacement_char: false,
            trim_trailing_whitespace: false,
            max_consecutive_newlines: 2,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            normalize_line_endings: true,
            remove_replacement_char: true,
            trim_trailing_whitespace: true,
            max_consecutive_newlines: 2,
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Process text through the cleanup pipeline. The result is trimmed.
    pub fn process(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.options.normalize_line_endings && result.contains('\r') {
            result = result.replace("\r\n", "\n").replace('\r', "\n");
        }

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        if self.options.trim_trailing_whitespace {
            result = trim_trailing_whitespace(&result);
        }

        if self.options.max_consecutive_newlines > 0 {
            result = self.limit_newlines(&result);
        }

        result.trim().to_string()
    }

    fn limit_newlines(&self, text: &str) -> String {
        let max = self.options.max_consecutive_newlines as usize;
        if max == 2 {
            return blank_run_regex().replace_all(text, "\n\n").into_owned();
        }
        let pattern = format!(r"\n{{{},}}", max + 1);
        match Regex::new(&pattern) {
            Ok(re) => re.replace_all(text, "\n".repeat(max)).into_owned(),
            Err(_) => text.to_string(),
        }
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

fn blank_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("static pattern"))
}

fn trim_trailing_whitespace(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let trimmed = line.trim_end_matches([' ', '\t']);
            // Exactly two trailing spaces is a Markdown hard break
            if line.len() - trimmed.len() == 2 && line.ends_with("  ") && !trimmed.is_empty() {
                line
            } else {
                trimmed
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
