//! Regular-expression driven strings.
//!
//! Patterns use whole-value semantics: `[a-z]{3}` accepts `abc` but not
//! `abcd`. Candidate strings are produced by walking the parsed HIR and
//! then checked against the compiled matcher, since look-around
//! assertions are ignored while walking.

use rand::Rng;
use regex::Regex;
use regex_syntax::hir::{Class, Hir, HirKind};

/// Extra repetitions allowed beyond the minimum for open-ended repeats.
const REPEAT_SPAN: u32 = 8;

/// Printable ASCII range preferred when a class allows it.
const PRINTABLE: (u32, u32) = (0x20, 0x7E);

/// Error type for pattern compilation.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// Rejected by the matcher
    #[error(transparent)]
    Regex(#[from] regex::Error),

    /// Rejected by the syntax parser
    #[error(transparent)]
    Syntax(#[from] Box<regex_syntax::Error>),
}

/// A pattern compiled for both matching and generation.
#[derive(Debug)]
pub struct CompiledPattern {
    source: String,
    matcher: Regex,
    hir: Hir,
}

impl CompiledPattern {
    /// Compile a pattern.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let matcher = Regex::new(&format!("^(?:{source})$"))?;
        let hir = regex_syntax::Parser::new()
            .parse(source)
            .map_err(Box::new)?;
        Ok(Self {
            source: source.to_string(),
            matcher,
            hir,
        })
    }

    /// Pattern text as declared.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check if the whole value matches.
    pub fn is_match(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }

    /// Shortest and longest possible match length in characters; `None`
    /// when unbounded.
    pub fn length_bounds(&self) -> (usize, Option<usize>) {
        char_bounds(&self.hir)
    }

    /// Produce one candidate string by walking the pattern.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut out = String::new();
        sample_hir(&self.hir, rng, &mut out);
        out
    }
}

fn sample_hir<R: Rng + ?Sized>(hir: &Hir, rng: &mut R, out: &mut String) {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => {}
        HirKind::Literal(literal) => out.push_str(&String::from_utf8_lossy(&literal.0)),
        HirKind::Class(Class::Unicode(class)) => {
            let ranges: Vec<(u32, u32)> = class
                .ranges()
                .iter()
                .map(|r| (r.start() as u32, r.end() as u32))
                .collect();
            if let Some(c) = pick_from_ranges(&ranges, rng).and_then(char::from_u32) {
                out.push(c);
            }
        }
        HirKind::Class(Class::Bytes(class)) => {
            let ranges: Vec<(u32, u32)> = class
                .ranges()
                .iter()
                .map(|r| (r.start() as u32, r.end().min(0x7F) as u32))
                .filter(|(start, end)| start <= end)
                .collect();
            if let Some(c) = pick_from_ranges(&ranges, rng).and_then(char::from_u32) {
                out.push(c);
            }
        }
        HirKind::Repetition(repetition) => {
            let max = repetition
                .max
                .unwrap_or(repetition.min + REPEAT_SPAN)
                .min(repetition.min + REPEAT_SPAN * 4);
            let count = rng.random_range(repetition.min..=max.max(repetition.min));
            for _ in 0..count {
                sample_hir(&repetition.sub, rng, out);
            }
        }
        HirKind::Capture(capture) => sample_hir(&capture.sub, rng, out),
        HirKind::Concat(parts) => {
            for part in parts {
                sample_hir(part, rng, out);
            }
        }
        HirKind::Alternation(branches) => {
            if !branches.is_empty() {
                let branch = &branches[rng.random_range(0..branches.len())];
                sample_hir(branch, rng, out);
            }
        }
    }
}

/// Match length bounds counted in chars.
///
/// The HIR's own length properties count UTF-8 bytes.
fn char_bounds(hir: &Hir) -> (usize, Option<usize>) {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => (0, Some(0)),
        HirKind::Literal(literal) => {
            let len = std::str::from_utf8(&literal.0).map_or(literal.0.len(), |s| s.chars().count());
            (len, Some(len))
        }
        HirKind::Class(_) => (1, Some(1)),
        HirKind::Repetition(repetition) => {
            let (min, max) = char_bounds(&repetition.sub);
            let min = min.saturating_mul(repetition.min as usize);
            let max = match (max, repetition.max) {
                (Some(0), _) => Some(0),
                (Some(max), Some(times)) => max.checked_mul(times as usize),
                _ => None,
            };
            (min, max)
        }
        HirKind::Capture(capture) => char_bounds(&capture.sub),
        HirKind::Concat(parts) => parts.iter().map(char_bounds).fold(
            (0, Some(0)),
            |(min, max), (part_min, part_max)| {
                (
                    min.saturating_add(part_min),
                    max.zip(part_max).and_then(|(a, b)| a.checked_add(b)),
                )
            },
        ),
        HirKind::Alternation(branches) => {
            let bounds: Vec<_> = branches.iter().map(char_bounds).collect();
            let min = bounds.iter().map(|(min, _)| *min).min().unwrap_or(0);
            let max = bounds
                .iter()
                .try_fold(0, |acc, (_, max)| max.map(|m| acc.max(m)));
            (min, max)
        }
    }
}

/// Pick a code point from inclusive ranges, preferring printable ASCII.
fn pick_from_ranges<R: Rng + ?Sized>(ranges: &[(u32, u32)], rng: &mut R) -> Option<u32> {
    let printable: Vec<(u32, u32)> = ranges
        .iter()
        .filter_map(|&(start, end)| {
            let start = start.max(PRINTABLE.0);
            let end = end.min(PRINTABLE.1);
            (start <= end).then_some((start, end))
        })
        .collect();
    let pool = if printable.is_empty() { ranges } else { &printable };

    let total: u64 = pool.iter().map(|(s, e)| u64::from(e - s) + 1).sum();
    if total == 0 {
        return None;
    }
    let mut offset = rng.random_range(0..total);
    for &(start, end) in pool {
        let width = u64::from(end - start) + 1;
        if offset < width {
            return Some(start + offset as u32);
        }
        offset -= width;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_match_pattern() {
        let mut rng = StdRng::seed_from_u64(42);
        for source in [
            "[a-z]{3}",
            "\\d{3}-\\d{4}",
            "(foo|bar)+_[A-Z0-9]{2,4}",
            "[^@]+@[a-z]+\\.(com|org)",
            "x?y*z",
        ] {
            let pattern = CompiledPattern::compile(source).unwrap();
            for _ in 0..20 {
                let value = pattern.sample(&mut rng);
                assert!(pattern.is_match(&value), "{source} produced {value:?}");
            }
        }
    }

    #[test]
    fn test_whole_value_semantics() {
        let pattern = CompiledPattern::compile("[a-z]{3}").unwrap();
        assert!(pattern.is_match("abc"));
        assert!(!pattern.is_match("abcd"));
        assert!(!pattern.is_match("xabc1"));
    }

    #[test]
    fn test_length_bounds() {
        let fixed = CompiledPattern::compile("[a-z]{3}").unwrap();
        assert_eq!(fixed.length_bounds(), (3, Some(3)));

        let open = CompiledPattern::compile("a{2,}").unwrap();
        assert_eq!(open.length_bounds(), (2, None));

        let choice = CompiledPattern::compile("(ab|cde)x?").unwrap();
        assert_eq!(choice.length_bounds(), (2, Some(4)));
    }

    #[test]
    fn test_length_bounds_count_chars() {
        let accented = CompiledPattern::compile("é{3}").unwrap();
        assert_eq!(accented.length_bounds(), (3, Some(3)));

        let mixed = CompiledPattern::compile("[αβγ]{2}-ñ").unwrap();
        assert_eq!(mixed.length_bounds(), (4, Some(4)));

        let mut rng = StdRng::seed_from_u64(42);
        let value = accented.sample(&mut rng);
        assert_eq!(value.chars().count(), 3);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            CompiledPattern::compile("[a-"),
            Err(PatternError::Regex(_))
        ));
    }

    #[test]
    fn test_negated_class_prefers_printable() {
        let mut rng = StdRng::seed_from_u64(7);
        let pattern = CompiledPattern::compile("[^a]{10}").unwrap();
        let value = pattern.sample(&mut rng);
        assert!(value.chars().all(|c| (' '..='~').contains(&c) && c != 'a'));
    }
}
