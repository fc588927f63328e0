use crate::core::io::traits::TextRecordFile;
use crate::core::models::pose::PoseBlock;
use std::io::{self, BufRead};
use tracing::{debug, trace};

const MODEL_RECORD: &str = "MODEL";
const ENDMDL_RECORD: &str = "ENDMDL";
const VINA_RESULT_REMARK: &str = "REMARK VINA RESULT:";

/// Reader that splits a multi-model PDBQT file into single-model pose blocks.
///
/// Text before the first `MODEL` record is file-level header and is dropped.
/// Every model is re-emitted as `MODEL ... ENDMDL` with any `ENDMDL` records
/// it already carried removed, so each block holds exactly one marker pair.
/// A file without `MODEL` records yields no blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdbqtFile;

impl TextRecordFile for PdbqtFile {
    type Output = Vec<PoseBlock>;
    type Error = io::Error;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut splitter = ModelSplitter::default();
        for line in reader.lines() {
            splitter.push_line(&line?);
        }
        Ok(splitter.finish())
    }
}

/// Splits multi-model text into pose blocks. See [`PdbqtFile`].
pub fn split_models(text: &str) -> Vec<PoseBlock> {
    let mut splitter = ModelSplitter::default();
    for line in text.lines() {
        splitter.push_line(line);
    }
    splitter.finish()
}

#[derive(Default)]
struct ModelSplitter {
    blocks: Vec<PoseBlock>,
    current: Option<OpenBlock>,
    header_lines: usize,
}

struct OpenBlock {
    marker: String,
    serial: Option<usize>,
    body: Vec<String>,
    remark_affinity: Option<f64>,
}

impl ModelSplitter {
    fn push_line(&mut self, line: &str) {
        match record_name(line) {
            Some(MODEL_RECORD) => {
                self.close_current();
                self.current = Some(OpenBlock::new(line));
            }
            Some(ENDMDL_RECORD) => {}
            _ => match self.current.as_mut() {
                Some(block) => block.push(line),
                None => self.header_lines += 1,
            },
        }
    }

    fn close_current(&mut self) {
        if let Some(block) = self.current.take() {
            let position = self.blocks.len() + 1;
            self.blocks.push(block.finish(position));
        }
    }

    fn finish(mut self) -> Vec<PoseBlock> {
        self.close_current();
        if self.blocks.is_empty() {
            debug!("No MODEL records found; no poses extracted.");
        } else {
            debug!(
                "Split {} pose block(s), discarded {} header line(s).",
                self.blocks.len(),
                self.header_lines
            );
        }
        self.blocks
    }
}

impl OpenBlock {
    fn new(marker_line: &str) -> Self {
        let serial = marker_line
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0);
        Self {
            marker: marker_line.trim_end().to_string(),
            serial,
            body: Vec::new(),
            remark_affinity: None,
        }
    }

    fn push(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if self.remark_affinity.is_none() {
            self.remark_affinity = parse_vina_remark(line);
        }
        self.body.push(line.to_string());
    }

    fn finish(self, position: usize) -> PoseBlock {
        let mut text = String::with_capacity(
            self.marker.len() + self.body.iter().map(|l| l.len() + 1).sum::<usize>() + 8,
        );
        text.push_str(&self.marker);
        text.push('\n');
        for line in &self.body {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(ENDMDL_RECORD);
        text.push('\n');

        let rank = self.serial.unwrap_or(position);
        trace!(rank, lines = self.body.len(), "Closed pose block.");
        PoseBlock {
            rank,
            text,
            remark_affinity: self.remark_affinity,
        }
    }
}

fn record_name(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Reads the affinity from a `REMARK VINA RESULT:    -7.2      0.000      0.000` line.
pub fn parse_vina_remark(line: &str) -> Option<f64> {
    line.trim_start()
        .strip_prefix(VINA_RESULT_REMARK)?
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VINA_OUT: &str = "\
MODEL 1
REMARK VINA RESULT:    -7.2      0.000      0.000
REMARK  Name = ligand
ATOM      1  C   UNL     1      10.000  11.000  12.000  0.00  0.00    +0.000 C
ENDMDL
MODEL 2
REMARK VINA RESULT:    -6.8      1.912      3.001
ATOM      1  C   UNL     1      13.000  14.000  15.000  0.00  0.00    +0.000 C
ENDMDL
";

    #[test]
    fn splits_scenario_input_into_two_complete_blocks() {
        let blocks = split_models("MODEL\nATOM  1 ...\nENDMDL\nMODEL\nATOM  2 ...\nENDMDL\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "MODEL\nATOM  1 ...\nENDMDL\n");
        assert_eq!(blocks[1].text, "MODEL\nATOM  2 ...\nENDMDL\n");
        assert_eq!(blocks[0].rank, 1);
        assert_eq!(blocks[1].rank, 2);
    }

    #[test]
    fn input_without_model_records_yields_no_blocks() {
        let text = "REMARK nothing here\nATOM      1  C   UNL     1\nEND\n";
        assert!(split_models(text).is_empty());
        assert!(split_models("").is_empty());
    }

    #[test]
    fn header_before_first_model_is_discarded() {
        let text = format!("REMARK header\nREMARK more header\n{}", VINA_OUT);
        let blocks = split_models(&text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| !b.text.contains("header")));
    }

    #[test]
    fn model_serial_and_vina_remark_are_captured() {
        let blocks = split_models(VINA_OUT);
        assert_eq!(blocks[0].rank, 1);
        assert_eq!(blocks[0].remark_affinity, Some(-7.2));
        assert_eq!(blocks[1].rank, 2);
        assert_eq!(blocks[1].remark_affinity, Some(-6.8));
        assert!(blocks[0].text.starts_with("MODEL 1\n"));
    }

    #[test]
    fn missing_endmdl_still_produces_terminated_block() {
        let blocks = split_models("MODEL 1\nATOM a\nMODEL 2\nATOM b\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "MODEL 1\nATOM a\nENDMDL\n");
        assert_eq!(blocks[1].text, "MODEL 2\nATOM b\nENDMDL\n");
    }

    #[test]
    fn each_block_holds_exactly_one_marker_pair() {
        let blocks = split_models("MODEL 1\nATOM a\nENDMDL\nENDMDL\nMODEL 2\nATOM b\nENDMDL\n");
        for block in blocks {
            let models = block.text.lines().filter(|l| l.starts_with("MODEL")).count();
            let ends = block.text.lines().filter(|l| l.starts_with("ENDMDL")).count();
            assert_eq!((models, ends), (1, 1));
        }
    }

    #[test]
    fn padded_coordinate_lines_survive_split_unchanged() {
        let atom = "ATOM      1  C   UNL     1      10.000  11.000  12.000  0.00  0.00    +0.000 C   ";
        let text = format!("MODEL 1\n{}\nENDMDL\n", atom);
        let blocks = split_models(&text);
        assert_eq!(blocks.len(), 1);
        let recovered: Vec<&str> = blocks[0]
            .text
            .lines()
            .filter(|l| l.starts_with("ATOM"))
            .collect();
        assert_eq!(recovered, vec![atom]);
    }

    #[test]
    fn reader_and_string_entry_points_agree() {
        let from_reader = PdbqtFile.read_from_str(VINA_OUT).unwrap();
        assert_eq!(from_reader, split_models(VINA_OUT));
    }

    #[test]
    fn parse_vina_remark_rejects_other_lines() {
        assert_eq!(
            parse_vina_remark("REMARK VINA RESULT:    -9.1      0.000      0.000"),
            Some(-9.1)
        );
        assert_eq!(parse_vina_remark("REMARK  Name = ligand"), None);
        assert_eq!(parse_vina_remark("REMARK VINA RESULT:   nan"), None);
    }
}
