use pathohost::core::io::vina_log::RankMatch;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid coordinate triple '{0}'. Expected 'x,y,z' (e.g., '10.5,-3,22').")]
    InvalidTriple(String),

    #[error("Invalid rank digits '{0}'. Expected one or more digits 1-9 (e.g., '123').")]
    InvalidRankDigits(String),

    #[error("Unknown rank-match rule '{0}'. Expected 'digits' or 'table'.")]
    UnknownRankMatch(String),
}

/// Parses `"x,y,z"` into three finite numbers. Whitespace around components is ignored.
pub fn parse_triple(s: &str) -> Result<[f64; 3], ParseError> {
    let invalid = || ParseError::InvalidTriple(s.to_string());
    let values: Vec<f64> = s
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<_, _>>()?;
    match values.as_slice() {
        [x, y, z] if values.iter().all(|v| v.is_finite()) => Ok([*x, *y, *z]),
        _ => Err(invalid()),
    }
}

/// Parses the set of leading characters accepted as score ranks, e.g. `"123"`.
pub fn parse_rank_digits(s: &str) -> Result<Vec<char>, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| ('1'..='9').contains(&c)) {
        return Err(ParseError::InvalidRankDigits(s.to_string()));
    }
    let mut digits: Vec<char> = trimmed.chars().collect();
    digits.sort_unstable();
    digits.dedup();
    Ok(digits)
}

/// Builds a [`RankMatch`] from a rule name and, for `digits`, its digit set.
pub fn parse_rank_match(rule: &str, digits: &str) -> Result<RankMatch, ParseError> {
    match rule.trim().to_ascii_lowercase().as_str() {
        "digits" => Ok(RankMatch::LeadingDigits {
            digits: parse_rank_digits(digits)?,
        }),
        "table" => Ok(RankMatch::Table),
        _ => Err(ParseError::UnknownRankMatch(rule.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triples_parse_with_whitespace_and_signs() {
        assert_eq!(parse_triple("1.5, -2,0").unwrap(), [1.5, -2.0, 0.0]);
        assert_eq!(parse_triple(" 20,20,20 ").unwrap(), [20.0, 20.0, 20.0]);
    }

    #[test]
    fn malformed_triples_are_rejected() {
        for bad in ["", "1,2", "1,2,3,4", "a,b,c", "1,,3", "nan,0,0", "inf,0,0"] {
            assert_eq!(
                parse_triple(bad),
                Err(ParseError::InvalidTriple(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn rank_digits_are_deduplicated_and_sorted() {
        assert_eq!(parse_rank_digits("321").unwrap(), vec!['1', '2', '3']);
        assert_eq!(parse_rank_digits("1122").unwrap(), vec!['1', '2']);
        assert!(parse_rank_digits("").is_err());
        assert!(parse_rank_digits("0").is_err());
        assert!(parse_rank_digits("1a").is_err());
    }

    #[test]
    fn rank_match_rules() {
        assert_eq!(parse_rank_match("table", "").unwrap(), RankMatch::Table);
        assert_eq!(parse_rank_match("Digits", "123").unwrap(), RankMatch::default());
        assert_eq!(
            parse_rank_match("fuzzy", "123"),
            Err(ParseError::UnknownRankMatch("fuzzy".to_string()))
        );
    }
}
