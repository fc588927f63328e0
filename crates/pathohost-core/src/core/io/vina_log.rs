use crate::core::io::traits::TextRecordFile;
use crate::core::models::pose::ScoreEntry;
use std::io::{self, BufRead};
use tracing::{debug, trace};

const TABLE_SEPARATOR_PREFIX: &str = "-----+";

/// Rule deciding which lines of the engine's standard output are score rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankMatch {
    /// A row starts, after leading whitespace, with one of these characters.
    ///
    /// With the default `1`, `2`, `3` ranks 4 through 9 are not recognised.
    LeadingDigits { digits: Vec<char> },
    /// Any row after the `-----+-----` separator whose first token is a positive rank.
    Table,
}

impl Default for RankMatch {
    fn default() -> Self {
        RankMatch::LeadingDigits {
            digits: vec!['1', '2', '3'],
        }
    }
}

/// A candidate score row that could not be read as `rank affinity`.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedLine {
    pub line_number: usize,
    pub content: String,
}

/// Score rows recovered from one docking run's standard output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreReport {
    pub entries: Vec<ScoreEntry>,
    pub rejected: Vec<RejectedLine>,
}

impl ScoreReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best (most negative) affinity reported, if any.
    pub fn best(&self) -> Option<ScoreEntry> {
        self.entries
            .iter()
            .copied()
            .min_by(|a, b| a.affinity.total_cmp(&b.affinity))
    }

    pub fn affinity_for_rank(&self, rank: usize) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.rank == rank)
            .map(|e| e.affinity)
    }
}

/// Parser for the docking engine's summary table on standard output.
///
/// Rows are kept in emission order. Malformed candidate rows are skipped and
/// recorded in [`ScoreReport::rejected`]; parsing itself never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreParser {
    rank_match: RankMatch,
}

impl ScoreParser {
    pub fn new(rank_match: RankMatch) -> Self {
        Self { rank_match }
    }

    pub fn rank_match(&self) -> &RankMatch {
        &self.rank_match
    }

    /// Parses `text` and returns only the recovered entries.
    pub fn parse(&self, text: &str) -> Vec<ScoreEntry> {
        self.parse_report(text).entries
    }

    /// Parses `text`, keeping track of the candidate rows that were rejected.
    pub fn parse_report(&self, text: &str) -> ScoreReport {
        let mut scanner = ScoreScanner::new(&self.rank_match);
        for (idx, line) in text.lines().enumerate() {
            scanner.push_line(idx + 1, line);
        }
        scanner.finish()
    }
}

impl TextRecordFile for ScoreParser {
    type Output = ScoreReport;
    type Error = io::Error;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut scanner = ScoreScanner::new(&self.rank_match);
        for (idx, line) in reader.lines().enumerate() {
            scanner.push_line(idx + 1, &line?);
        }
        Ok(scanner.finish())
    }
}

/// Shorthand for [`ScoreParser::parse`] with the default rank rule.
pub fn parse_scores(text: &str) -> Vec<ScoreEntry> {
    ScoreParser::default().parse(text)
}

struct ScoreScanner<'a> {
    rank_match: &'a RankMatch,
    in_table: bool,
    report: ScoreReport,
}

impl<'a> ScoreScanner<'a> {
    fn new(rank_match: &'a RankMatch) -> Self {
        Self {
            rank_match,
            in_table: false,
            report: ScoreReport::default(),
        }
    }

    fn push_line(&mut self, line_number: usize, line: &str) {
        let trimmed = line.trim_start();
        if trimmed.starts_with(TABLE_SEPARATOR_PREFIX) {
            self.in_table = true;
            return;
        }
        let first = trimmed.chars().next();

        let candidate = match self.rank_match {
            RankMatch::LeadingDigits { digits } => first.is_some_and(|c| digits.contains(&c)),
            RankMatch::Table => {
                if self.in_table && !first.is_some_and(|c| c.is_ascii_digit()) {
                    self.in_table = false;
                }
                self.in_table
            }
        };
        if !candidate {
            return;
        }

        match parse_score_row(trimmed) {
            Some(entry) => {
                trace!(rank = entry.rank, affinity = entry.affinity, "Parsed score row.");
                self.report.entries.push(entry);
            }
            None => {
                debug!("Skipping malformed score row {}: {:?}", line_number, line);
                self.report.rejected.push(RejectedLine {
                    line_number,
                    content: line.to_string(),
                });
            }
        }
    }

    fn finish(self) -> ScoreReport {
        debug!(
            "Parsed {} score row(s), rejected {}.",
            self.report.entries.len(),
            self.report.rejected.len()
        );
        self.report
    }
}

fn parse_score_row(row: &str) -> Option<ScoreEntry> {
    let mut tokens = row.split_whitespace();
    let rank = tokens.next()?.parse::<usize>().ok().filter(|&r| r > 0)?;
    let affinity = tokens.next()?.parse::<f64>().ok().filter(|a| a.is_finite())?;
    Some(ScoreEntry { rank, affinity })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VINA_STDOUT: &str = "\
AutoDock Vina v1.2.5
Scoring function : vina
Rigid receptor: data/receptor.pdbqt
Ligand: data/ligand.pdbqt
Grid center: X 0 Y 0 Z 0
Grid size  : X 20 Y 20 Z 20
Grid space : 0.375
Exhaustiveness: 8
CPU: 0
Verbosity: 1

Computing Vina grid ... done.
Performing docking (random seed: -1838453937) ...
0%   10   20   30   40   50   60   70   80   90   100%
|----|----|----|----|----|----|----|----|----|----|
***************************************************

mode |   affinity | dist from best mode
     | (kcal/mol) | rmsd l.b.| rmsd u.b.
-----+------------+----------+----------
   1       -7.2          0          0
   2       -6.9      1.912      2.743
   3       -6.9      2.034      6.118
   4       -6.5      1.750      2.230
   5       -6.1      3.001      7.400
";

    #[test]
    fn parses_the_single_row_scenario() {
        let entries = parse_scores("1     -7.2      0.000      0.000");
        assert_eq!(entries, vec![ScoreEntry::new(1, -7.2)]);
    }

    #[test]
    fn default_rule_keeps_leading_digit_rows_in_emission_order() {
        let entries = parse_scores(VINA_STDOUT);
        let ranks: Vec<_> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(entries[1].affinity, -6.9);
        assert_eq!(entries[2].affinity, -6.9);
    }

    #[test]
    fn table_rule_accepts_every_rank_after_separator() {
        let parser = ScoreParser::new(RankMatch::Table);
        let entries = parser.parse(VINA_STDOUT);
        let ranks: Vec<_> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn table_rule_matches_two_digit_ranks() {
        let parser = ScoreParser::new(RankMatch::Table);
        let text = "-----+------------+\n   9   -5.0  1 1\n  10   -4.8  1 1\n\nWriting output ... done.\n";
        let entries = parser.parse(text);
        assert_eq!(entries, vec![ScoreEntry::new(9, -5.0), ScoreEntry::new(10, -4.8)]);
    }

    #[test]
    fn table_rule_ignores_rows_before_separator() {
        let parser = ScoreParser::new(RankMatch::Table);
        assert!(parser.parse("1  -7.2  0 0\n").is_empty());
    }

    #[test]
    fn malformed_candidate_rows_are_skipped_and_reported() {
        let text = "1 -7.2 0 0\n2 abc 0 0\n3\n0 -1.0\n3 -6.0 0 0\n";
        let report = ScoreParser::default().parse_report(text);
        assert_eq!(
            report.entries,
            vec![ScoreEntry::new(1, -7.2), ScoreEntry::new(3, -6.0)]
        );
        let rejected: Vec<_> = report.rejected.iter().map(|r| r.line_number).collect();
        assert_eq!(rejected, vec![2, 3]);
    }

    #[test]
    fn rank_zero_is_never_accepted() {
        let parser = ScoreParser::new(RankMatch::LeadingDigits {
            digits: vec!['0', '1'],
        });
        let report = parser.parse_report("0 -1.0 0 0\n1 -2.0 0 0\n");
        assert_eq!(report.entries, vec![ScoreEntry::new(1, -2.0)]);
        assert_eq!(report.rejected.len(), 1);
    }

    #[test]
    fn non_digit_lines_are_excluded() {
        assert!(parse_scores("mode | affinity\nWriting output ... done.\n").is_empty());
        assert!(parse_scores("").is_empty());
    }

    #[test]
    fn report_helpers_find_best_and_rank_lookup() {
        let report = ScoreParser::new(RankMatch::Table).parse_report(VINA_STDOUT);
        assert_eq!(report.best(), Some(ScoreEntry::new(1, -7.2)));
        assert_eq!(report.affinity_for_rank(4), Some(-6.5));
        assert_eq!(report.affinity_for_rank(42), None);
    }

    #[test]
    fn reader_entry_point_matches_string_parse() {
        let parser = ScoreParser::default();
        let report = parser.read_from_str(VINA_STDOUT).unwrap();
        assert_eq!(report, parser.parse_report(VINA_STDOUT));
    }
}
