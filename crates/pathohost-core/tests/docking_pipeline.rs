use once_cell::sync::Lazy;
use pathohost::core::io::pdbqt::split_models;
use pathohost::core::io::vina_log::{RankMatch, parse_scores};
use pathohost::core::models::structure::{StructureDocument, StructureFormat};
use pathohost::engine::babel::{ConversionRequest, FormatConverter};
use pathohost::engine::config::{DockingConfig, DockingConfigBuilder, SearchBox};
use pathohost::engine::error::EngineError;
use pathohost::engine::progress::{Progress, ProgressReporter};
use pathohost::engine::vina::{DockingEngine, DockingRequest, DockingRun};
use pathohost::workflows::dock::{self, CountMismatch, DockingInputs};
use pathohost::workflows::session::Session;
use std::path::Path;
use std::sync::{Arc, Mutex};

const VINA_STDOUT: &str = "\
AutoDock Vina v1.2.5
Performing docking (random seed: 42) ... done.

mode |   affinity | dist from best mode
     | (kcal/mol) | rmsd l.b.| rmsd u.b.
-----+------------+----------+----------
   1       -7.2          0          0
   2       -6.9      1.873      2.514
   3       -6.5      2.104      4.007
   4       -6.1      1.552      3.119
   5       -5.8      3.001      5.212
";

static DOCKED_OUTPUT: Lazy<String> = Lazy::new(|| {
    (1..=5)
        .map(|i| {
            format!(
                "MODEL {i}\n\
                 REMARK VINA RESULT:    -{i}.0      0.000      0.000\n\
                 REMARK  Name = ligand\n\
                 HETATM    1  C1  UNL     1      1{i}.000   2.000   3.000  0.00  0.00    +0.000 C   \n\
                 HETATM    2  O1  UNL     1      1{i}.500   2.500   3.500  0.00  0.00    -0.300 OA\n\
                 ENDMDL\n"
            )
        })
        .collect()
});

/// Writes canned output instead of running the engine.
struct FakeVina;

impl DockingEngine for FakeVina {
    fn dock(&self, request: &DockingRequest<'_>) -> Result<DockingRun, EngineError> {
        assert!(request.receptor.is_file());
        assert!(request.ligand.is_file());
        std::fs::write(request.output, DOCKED_OUTPUT.as_str()).unwrap();
        Ok(DockingRun {
            stdout: VINA_STDOUT.to_string(),
            output_path: request.output.to_path_buf(),
        })
    }
}

/// Copies input to output; optionally fails when converting one pose file.
struct FakeBabel {
    fail_on: Option<&'static str>,
}

impl FormatConverter for FakeBabel {
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<(), EngineError> {
        if let Some(name) = self.fail_on {
            if request.input.to_string_lossy().ends_with(name) {
                return Err(EngineError::ToolFailed {
                    tool: "obabel",
                    status: "exit status: 1".into(),
                    stderr: "0 molecules converted".into(),
                });
            }
        }
        std::fs::copy(request.input, request.output).unwrap();
        Ok(())
    }
}

fn config(scratch: &Path, rank_match: RankMatch) -> DockingConfig {
    DockingConfigBuilder::new()
        .vina_executable("vina".into())
        .obabel_executable("obabel".into())
        .exhaustiveness(8)
        .num_modes(9)
        .search_box(SearchBox::default())
        .rank_match(rank_match)
        .scratch_dir(scratch.to_path_buf())
        .build()
        .unwrap()
}

fn inputs() -> DockingInputs {
    DockingInputs {
        receptor: StructureDocument::new(
            "6VXX",
            StructureFormat::Pdb,
            "ATOM      1  CA  ALA A   1       0.000   0.000   0.000  1.00  0.00           C\n"
                .to_string(),
        ),
        ligand: StructureDocument::new(
            "ligand",
            StructureFormat::Sdf,
            "ligand\n\n\n  0  0  0  0  0  0            999 V2000\nM  END\n$$$$\n".to_string(),
        ),
    }
}

fn recording_reporter() -> (ProgressReporter<'static>, Arc<Mutex<Vec<Progress>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let reporter = ProgressReporter::with_callback(Box::new(move |event| {
        sink.lock().unwrap().push(event);
    }));
    (reporter, events)
}

#[test]
fn split_blocks_reproduce_every_atom_line_exactly_once() {
    let blocks = split_models(&DOCKED_OUTPUT);
    assert_eq!(blocks.len(), 5);

    let original: Vec<&str> = DOCKED_OUTPUT
        .lines()
        .filter(|l| l.starts_with("HETATM"))
        .collect();
    let rejoined: String = blocks.iter().map(|b| b.text.as_str()).collect();
    let recovered: Vec<&str> = rejoined
        .lines()
        .filter(|l| l.starts_with("HETATM"))
        .collect();
    assert_eq!(recovered, original);

    for block in &blocks {
        assert_eq!(block.text.matches("MODEL").count(), 1);
        assert_eq!(block.text.matches("ENDMDL").count(), 1);
    }
}

#[test]
fn default_score_rule_only_sees_the_first_three_ranks() {
    let ranks: Vec<_> = parse_scores(VINA_STDOUT).iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn full_run_stages_files_and_pairs_scores_with_poses() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = dir.path().join("data");
    let (reporter, events) = recording_reporter();

    let result = dock::run(
        &inputs(),
        &config(&scratch, RankMatch::default()),
        &FakeVina,
        &FakeBabel { fail_on: None },
        &reporter,
    )
    .unwrap();

    for name in [
        "receptor.pdb",
        "ligand.sdf",
        "receptor.pdbqt",
        "ligand.pdbqt",
        "docked_output.pdbqt",
        "docking_log.txt",
    ] {
        assert!(scratch.join(name).is_file(), "missing {name}");
    }
    assert!(!scratch.join(".docking.lock").exists());

    assert_eq!(result.scores.entries.len(), 3);
    assert_eq!(result.poses.len(), 5);
    let affinities: Vec<_> = result.poses.iter().map(|p| p.affinity()).collect();
    assert_eq!(
        affinities,
        vec![Some(-7.2), Some(-6.9), Some(-6.5), Some(-4.0), Some(-5.0)]
    );
    assert_eq!(
        result.mismatch,
        Some(CountMismatch {
            scores: 3,
            poses: 5
        })
    );

    let warnings = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, Progress::Warning(_)))
        .count();
    assert_eq!(warnings, 1);
}

#[test]
fn table_rule_matches_every_pose() {
    let dir = tempfile::tempdir().unwrap();
    let result = dock::run(
        &inputs(),
        &config(dir.path(), RankMatch::Table),
        &FakeVina,
        &FakeBabel { fail_on: None },
        &ProgressReporter::new(),
    )
    .unwrap();
    assert_eq!(result.scores.entries.len(), 5);
    assert!(result.mismatch.is_none());
    assert_eq!(result.poses[4].affinity(), Some(-5.8));
}

#[test]
fn one_failed_pose_conversion_drops_all_poses() {
    let dir = tempfile::tempdir().unwrap();
    let result = dock::run(
        &inputs(),
        &config(dir.path(), RankMatch::default()),
        &FakeVina,
        &FakeBabel {
            fail_on: Some("_pose_4.pdbqt"),
        },
        &ProgressReporter::new(),
    )
    .unwrap();
    assert!(result.poses.is_empty());
    let cause = result.conversion_failure.unwrap();
    assert!(cause.contains("pose 4"), "{cause}");
    assert_eq!(result.scores.entries.len(), 3);
}

#[test]
fn receptor_preparation_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = dock::run(
        &inputs(),
        &config(dir.path(), RankMatch::default()),
        &FakeVina,
        &FakeBabel {
            fail_on: Some("receptor.pdb"),
        },
        &ProgressReporter::new(),
    );
    assert!(matches!(result, Err(EngineError::ToolFailed { .. })));
    assert!(!dir.path().join(".docking.lock").exists());
}

#[test]
fn non_pdb_receptor_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut inputs = inputs();
    inputs.receptor.format = StructureFormat::Sdf;
    let result = dock::run(
        &inputs,
        &config(dir.path(), RankMatch::default()),
        &FakeVina,
        &FakeBabel { fail_on: None },
        &ProgressReporter::new(),
    );
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));
}

#[test]
fn run_is_refused_while_scratch_directory_is_claimed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".docking.lock"),
        format!("{}\n", std::process::id()),
    )
    .unwrap();
    let result = dock::run(
        &inputs(),
        &config(dir.path(), RankMatch::default()),
        &FakeVina,
        &FakeBabel { fail_on: None },
        &ProgressReporter::new(),
    );
    assert!(matches!(result, Err(EngineError::RunInProgress { .. })));
}

#[test]
fn session_docks_against_loaded_structure() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(dir.path().join("data"));
    let config = config(Path::new("ignored"), RankMatch::default());

    let missing = session.dock(
        inputs().ligand,
        &config,
        &FakeVina,
        &FakeBabel { fail_on: None },
        &ProgressReporter::new(),
    );
    assert!(matches!(missing, Err(EngineError::InvalidInput(_))));

    session.load_structure(inputs().receptor);
    let poses = session
        .dock(
            inputs().ligand,
            &config,
            &FakeVina,
            &FakeBabel { fail_on: None },
            &ProgressReporter::new(),
        )
        .unwrap()
        .poses
        .len();
    assert_eq!(poses, 5);
    assert!(session.last_run().is_some());
    assert!(dir.path().join("data").join("receptor.pdb").is_file());
}
