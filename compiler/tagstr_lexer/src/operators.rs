//! Python operator and delimiter table.

/// Operators ordered longest first so the first hit is the longest match.
const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "!=", "%=", "&=", "**", "*=", "+=", "-=", "->", "//", "/=",
    ":=", "<<", "<=", "==", ">=", ">>", "@=", "^=", "|=", "%", "&", "(", ")", "*", "+", ",", "-",
    ".", "/", ":", ";", "<", "=", ">", "@", "[", "]", "^", "{", "|", "}", "~",
];

/// Length in chars of the longest operator starting at `rest[0]`, or 0.
pub(crate) fn match_operator(rest: &[char]) -> usize {
    OPERATORS
        .iter()
        .find(|op| {
            op.chars().count() <= rest.len() && op.chars().zip(rest).all(|(a, &b)| a == b)
        })
        .map_or(0, |op| op.len())
}

/// True when `text` is exactly one operator.
pub fn is_operator(text: &str) -> bool {
    OPERATORS.contains(&text)
}
