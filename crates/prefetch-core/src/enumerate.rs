//! Source enumeration.
//!
//! A root that is an existing directory is walked and every file whose name
//! matches the pattern becomes a local source. Anything else (a file path, a
//! URL, a path that does not exist) is passed through as exactly one source
//! without any existence check; the resolver reports the failure later.
//!
//! Walk order is deterministic: within a directory, files come first in
//! lexical order, then subdirectories in lexical order, depth first. That is
//! the order a sorted top-down `os.walk` style traversal produces.
//!
//! Patterns use fnmatch rules:
//! - `*` matches any run of characters (including none)
//! - `?` matches exactly one character
//! - `[seq]` / `[!seq]` match one character in / not in the set; `a-z` ranges
//!   are allowed and a `]` directly after `[` or `[!` is literal
//! - an unterminated `[` is a literal bracket
//!
//! Names are matched case-insensitively on Windows, case-sensitively elsewhere.

use std::cmp::Ordering;
use std::path::Path;

use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::EnumerateOptions;
use crate::errors::{PrefetchError, PrefetchResult};
use crate::resolve::ArtifactSource;

/// Expand `root` into the ordered list of sources to process.
pub fn enumerate_sources(root: &str, opts: &EnumerateOptions) -> PrefetchResult<Vec<ArtifactSource>> {
    let source = ArtifactSource::parse(root);
    let root_path = Path::new(root);
    if source.is_remote() || !root_path.is_dir() {
        return Ok(vec![source]);
    }
    info!("{root} is a directory.");

    let pattern = NamePattern::new(&opts.pattern);
    let mut walker = WalkDir::new(root_path).min_depth(1).sort_by(files_first);
    if !opts.recursive {
        walker = walker.max_depth(1);
    }

    let mut matches = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        // Symlinks to directories are not followed and never yielded.
        if entry.file_type().is_dir() || entry.path().is_dir() {
            continue;
        }
        if pattern.matches(&entry.file_name().to_string_lossy()) {
            matches.push(ArtifactSource::Local(entry.into_path()));
        }
    }

    if matches.is_empty() {
        return Err(PrefetchError::EnumerationEmpty {
            root: root.to_string(),
        });
    }
    info!("{} matching file(s) found.", matches.len());
    Ok(matches)
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Star,
    AnyChar,
    Literal(char),
    Class { negated: bool, ranges: Vec<(char, char)> },
}

impl Token {
    fn matches(&self, c: char) -> bool {
        match self {
            Self::Star => true,
            Self::AnyChar => true,
            Self::Literal(l) => *l == c,
            Self::Class { negated, ranges } => {
                ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c)) != *negated
            }
        }
    }
}

/// Compiled fnmatch-style file name pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    tokens: Vec<Token>,
    fold_case: bool,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Self {
        Self::with_case_folding(pattern, cfg!(windows))
    }

    pub fn with_case_folding(pattern: &str, fold_case: bool) -> Self {
        let pattern = if fold_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        Self {
            tokens: tokenize(&pattern),
            fold_case,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name: Vec<char> = if self.fold_case {
            name.to_lowercase().chars().collect()
        } else {
            name.chars().collect()
        };
        let tokens = &self.tokens;

        let (mut ti, mut ni) = (0usize, 0usize);
        // Position of the last star and the name index it currently absorbs up to.
        let mut star: Option<(usize, usize)> = None;

        while ni < name.len() {
            if let Some(tok) = tokens.get(ti) {
                if *tok == Token::Star {
                    star = Some((ti, ni));
                    ti += 1;
                    continue;
                }
                if tok.matches(name[ni]) {
                    ti += 1;
                    ni += 1;
                    continue;
                }
            }
            match star {
                Some((st, sn)) => {
                    star = Some((st, sn + 1));
                    ti = st + 1;
                    ni = sn + 1;
                }
                None => return false,
            }
        }

        tokens[ti..].iter().all(|t| *t == Token::Star)
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                if tokens.last() != Some(&Token::Star) {
                    tokens.push(Token::Star);
                }
                i += 1;
            }
            '?' => {
                tokens.push(Token::AnyChar);
                i += 1;
            }
            '[' => match parse_class(&chars, i + 1) {
                Some((token, next)) => {
                    tokens.push(token);
                    i = next;
                }
                None => {
                    tokens.push(Token::Literal('['));
                    i += 1;
                }
            },
            c => {
                tokens.push(Token::Literal(c));
                i += 1;
            }
        }
    }
    tokens
}

/// Parse a bracket class starting just after `[`. Returns the token and the
/// index after the closing `]`, or `None` when the class is unterminated.
fn parse_class(chars: &[char], start: usize) -> Option<(Token, usize)> {
    let mut i = start;
    let negated = chars.get(i) == Some(&'!');
    if negated {
        i += 1;
    }

    let body_start = i;
    let mut ranges = Vec::new();
    while i < chars.len() {
        let c = chars[i];
        if c == ']' && i > body_start {
            return Some((Token::Class { negated, ranges }, i + 1));
        }
        if chars.get(i + 1) == Some(&'-') && chars.get(i + 2).is_some_and(|n| *n != ']') {
            let hi = chars[i + 2];
            if c <= hi {
                ranges.push((c, hi));
            }
            i += 3;
        } else {
            ranges.push((c, c));
            i += 1;
        }
    }
    None
}
