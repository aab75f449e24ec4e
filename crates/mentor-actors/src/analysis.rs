//! Static analysis heuristics over code submissions.
//!
//! The evaluation and hint actors share this module. Everything here is a
//! deterministic approximation: no code is executed, the profile is built
//! from lexical evidence alone. The exact formulas are tuning data, not
//! protocol — callers only rely on scores being in 0-100 and on the
//! complexity strings using the usual big-O spellings.

use once_cell::sync::Lazy;
use regex::Regex;

static LOOP_LINE: Lazy<Regex> = Lazy::new(|| {
    // for/while headers across the supported languages
    Regex::new(r"^\s*(for\b|while\b|loop\b)|\.forEach\(").expect("loop pattern")
});

static FUNCTION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:def|fn|function|func)\s+([A-Za-z_][A-Za-z0-9_]*)").expect("function pattern")
});

static MAGIC_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{2,}\b").expect("number pattern"));

static SINGLE_LETTER_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-z]\b").expect("identifier pattern"));

static ASSIGNMENT_IN_CONDITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bif\s+[A-Za-z_][A-Za-z0-9_]*\s*=\s*[^=]").expect("condition pattern"));

/// Lexical evidence extracted from one submission.
#[derive(Debug, Clone, Default)]
pub struct CodeProfile {
    pub line_count: usize,
    pub comment_lines: usize,
    pub long_lines: usize,
    /// Deepest loop nesting observed (0 = no loops)
    pub max_loop_depth: usize,
    pub has_recursion: bool,
    pub has_return: bool,
    pub uses_hash_structure: bool,
    pub uses_sort: bool,
    pub handles_empty_input: bool,
    pub handles_null: bool,
    pub handles_bounds: bool,
    pub magic_numbers: usize,
    pub single_letter_idents: usize,
    pub suspicious_conditions: usize,
}

impl CodeProfile {
    /// Share of lines carrying a comment, 0.0-1.0.
    pub fn comment_ratio(&self) -> f64 {
        if self.line_count == 0 {
            0.0
        } else {
            self.comment_lines as f64 / self.line_count as f64
        }
    }
}

fn comment_marker(language: &str) -> &'static str {
    match language.to_ascii_lowercase().as_str() {
        "python" | "ruby" | "shell" | "bash" => "#",
        _ => "//",
    }
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Builds a [`CodeProfile`] from a submission.
pub fn profile(code: &str, language: &str) -> CodeProfile {
    let marker = comment_marker(language);
    let lower = code.to_ascii_lowercase();
    let mut out = CodeProfile::default();

    // Loop nesting approximated by indentation: a loop indented deeper than
    // an open loop counts as nested inside it. Works for both brace and
    // offside-rule languages in practice.
    let mut loop_stack: Vec<usize> = Vec::new();

    for line in code.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.line_count += 1;
        if trimmed.starts_with(marker) || trimmed.contains(marker) {
            out.comment_lines += 1;
        }
        if line.len() > 100 {
            out.long_lines += 1;
        }

        let indent = indent_width(line);
        loop_stack.retain(|&open_indent| open_indent < indent);
        if LOOP_LINE.is_match(line) {
            loop_stack.push(indent);
            out.max_loop_depth = out.max_loop_depth.max(loop_stack.len());
        }
    }

    // A function calling its own name again after the definition.
    for caps in FUNCTION_NAME.captures_iter(code) {
        if let Some(name) = caps.get(1) {
            let occurrences = code.matches(name.as_str()).count();
            if occurrences >= 2 {
                out.has_recursion = true;
                break;
            }
        }
    }

    out.has_return = lower.contains("return");
    out.uses_hash_structure = contains_any(
        &lower,
        &["hashmap", "hashset", "dict", "defaultdict", "counter(", "new map", "new set", "btreemap"],
    ) || lower.contains("set(");
    out.uses_sort = contains_any(&lower, &[".sort", "sorted(", "sort_by", "sort_unstable"]);
    out.handles_empty_input = contains_any(
        &lower,
        &[".is_empty()", "len(", ".length == 0", ".length === 0", "== \"\"", "not "],
    ) && contains_any(&lower, &["if", "match", "guard", "?"]);
    out.handles_null = contains_any(
        &lower,
        &["none", "null", "nil", "undefined", "option", "is_none", "??", "?."],
    );
    out.handles_bounds = contains_any(
        &lower,
        &["< len", "<= len", ".length - 1", "len() - 1", "out of range", "bounds"],
    );
    out.magic_numbers = MAGIC_NUMBER.find_iter(code).count();
    out.single_letter_idents = SINGLE_LETTER_IDENT.find_iter(&lower).count();
    out.suspicious_conditions = ASSIGNMENT_IN_CONDITION.find_iter(code).count()
        + usize::from(lower.contains("while true") && !lower.contains("break"));

    out
}

/// Estimates the time complexity class of the profiled submission.
pub fn estimate_time_complexity(profile: &CodeProfile) -> String {
    let class = match profile.max_loop_depth {
        0 if profile.has_recursion => "O(n)",
        0 => "O(1)",
        1 if profile.uses_sort => "O(n log n)",
        1 => "O(n)",
        2 => "O(n^2)",
        _ => "O(n^3)",
    };
    class.to_string()
}

/// Estimates the extra space the submission allocates.
pub fn estimate_space_complexity(profile: &CodeProfile) -> String {
    if profile.uses_hash_structure || profile.has_recursion {
        "O(n)".to_string()
    } else {
        "O(1)".to_string()
    }
}

/// Orders big-O spellings from cheapest (0) upward so two classes can be
/// compared. Unknown spellings land in the middle rather than failing.
pub fn complexity_rank(complexity: &str) -> u8 {
    let normalized: String = complexity
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if normalized.contains("n^3") || normalized.contains("2^n") {
        5
    } else if normalized.contains("n^2") || normalized.contains("n*n") {
        4
    } else if normalized.contains("nlogn") {
        3
    } else if normalized.contains("log") {
        1
    } else if normalized.contains('n') || normalized.contains('m') || normalized.contains('v')
        || normalized.contains("capacity")
    {
        2
    } else if normalized.contains('1') {
        0
    } else {
        3
    }
}

/// Scores an estimated complexity against the expected one: full marks for
/// meeting or beating it, a steep penalty per class above it.
pub fn complexity_score(actual: &str, expected: &str) -> f64 {
    let actual_rank = complexity_rank(actual);
    let expected_rank = complexity_rank(expected);
    if actual_rank <= expected_rank {
        100.0
    } else {
        let over = f64::from(actual_rank - expected_rank);
        (100.0 - over * 35.0).max(10.0)
    }
}

/// The edge-case classes the coverage check looks for.
pub fn edge_case_classes(profile: &CodeProfile) -> (Vec<String>, Vec<String>) {
    let checks = [
        ("empty input", profile.handles_empty_input),
        ("null or missing values", profile.handles_null),
        ("index bounds", profile.handles_bounds),
    ];
    let mut covered = Vec::new();
    let mut missed = Vec::new();
    for (name, handled) in checks {
        if handled {
            covered.push(name.to_string());
        } else {
            missed.push(name.to_string());
        }
    }
    (covered, missed)
}

/// Plausibility score that the submission is a real attempt, 0-100.
pub fn correctness_score(profile: &CodeProfile, code: &str) -> f64 {
    if code.trim().is_empty() {
        return 0.0;
    }
    let mut score: f64 = 50.0;
    if profile.has_return {
        score += 15.0;
    }
    if profile.max_loop_depth > 0 || profile.has_recursion {
        score += 10.0;
    }
    if profile.handles_empty_input || profile.handles_null || profile.handles_bounds {
        score += 10.0;
    }
    if code.trim().len() >= 30 {
        score += 15.0;
    }
    score -= f64::from(profile.suspicious_conditions as u32) * 15.0;
    score.clamp(0.0, 100.0)
}

/// Readability facet, 0-100.
pub fn readability_score(profile: &CodeProfile) -> f64 {
    let mut score: f64 = 90.0;
    score -= (profile.long_lines as f64 * 5.0).min(30.0);
    if profile.comment_ratio() >= 0.1 {
        score += 10.0;
    } else if profile.line_count > 15 {
        score -= 10.0;
    }
    score.clamp(0.0, 100.0)
}

/// Maintainability facet, 0-100.
pub fn maintainability_score(profile: &CodeProfile) -> f64 {
    let mut score: f64 = 90.0;
    if profile.line_count > 60 {
        score -= 15.0;
    }
    if profile.max_loop_depth >= 3 {
        score -= 15.0;
    }
    if profile.magic_numbers > 3 {
        score -= 10.0;
    }
    score.clamp(0.0, 100.0)
}

/// Best-practices facet, 0-100.
pub fn best_practices_score(profile: &CodeProfile) -> f64 {
    let mut score: f64 = 85.0;
    if profile.single_letter_idents > 8 {
        score -= 15.0;
    }
    if profile.magic_numbers > 0 {
        score -= (profile.magic_numbers as f64 * 2.0).min(10.0);
    }
    if profile.suspicious_conditions > 0 {
        score -= 15.0;
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_PY: &str = "\
def pairs(xs):
    out = []
    for i in xs:
        for j in xs:
            out.append((i, j))
    return out
";

    #[test]
    fn test_nested_loops_detected() {
        let p = profile(NESTED_PY, "python");
        assert_eq!(p.max_loop_depth, 2);
        assert_eq!(estimate_time_complexity(&p), "O(n^2)");
    }

    #[test]
    fn test_single_loop_is_linear() {
        let code = "def total(xs):\n    s = 0\n    for x in xs:\n        s += x\n    return s\n";
        let p = profile(code, "python");
        assert_eq!(p.max_loop_depth, 1);
        assert_eq!(estimate_time_complexity(&p), "O(n)");
    }

    #[test]
    fn test_sibling_loops_are_not_nested() {
        let code = "\
for x in xs:
    a += x
for y in ys:
    b += y
";
        let p = profile(code, "python");
        assert_eq!(p.max_loop_depth, 1);
    }

    #[test]
    fn test_recursion_detected() {
        let code = "def fib(n):\n    if n < 2:\n        return n\n    return fib(n-1) + fib(n-2)\n";
        let p = profile(code, "python");
        assert!(p.has_recursion);
        assert_eq!(estimate_space_complexity(&p), "O(n)");
    }

    #[test]
    fn test_hash_structure_detected() {
        let p = profile("seen = dict()\nfor x in xs:\n    seen[x] = True\n", "python");
        assert!(p.uses_hash_structure);
    }

    #[test]
    fn test_complexity_ranks_ordered() {
        assert!(complexity_rank("O(1)") < complexity_rank("O(log n)"));
        assert!(complexity_rank("O(log n)") < complexity_rank("O(n)"));
        assert!(complexity_rank("O(n)") < complexity_rank("O(n log n)"));
        assert!(complexity_rank("O(n log n)") < complexity_rank("O(n^2)"));
        assert!(complexity_rank("O(n^2)") < complexity_rank("O(n^3)"));
    }

    #[test]
    fn test_complexity_score_rewards_meeting_expected() {
        assert_eq!(complexity_score("O(n)", "O(n)"), 100.0);
        assert_eq!(complexity_score("O(1)", "O(n)"), 100.0);
        assert!(complexity_score("O(n^2)", "O(n)") < 100.0);
        assert!(complexity_score("O(n^3)", "O(n)") >= 10.0);
    }

    #[test]
    fn test_edge_case_classes_split() {
        let p = profile(
            "def f(xs):\n    if len(xs) == 0:\n        return None\n    return xs[0]\n",
            "python",
        );
        let (covered, missed) = edge_case_classes(&p);
        assert!(covered.contains(&"empty input".to_string()));
        assert!(covered.len() + missed.len() == 3);
    }

    #[test]
    fn test_empty_code_scores_zero_correctness() {
        let p = profile("", "python");
        assert_eq!(correctness_score(&p, ""), 0.0);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let p = profile(NESTED_PY, "python");
        for score in [
            correctness_score(&p, NESTED_PY),
            readability_score(&p),
            maintainability_score(&p),
            best_practices_score(&p),
        ] {
            assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
        }
    }

    #[test]
    fn test_suspicious_condition_detected() {
        let p = profile("if x = 3:\n    pass\n", "python");
        assert!(p.suspicious_conditions > 0);
    }
}
