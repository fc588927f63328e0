use super::dock::{self, DockingInputs, DockingResult};
use super::scratch::ScratchLayout;
use crate::core::models::structure::StructureDocument;
use crate::engine::babel::FormatConverter;
use crate::engine::config::DockingConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::vina::DockingEngine;
use crate::remote::error::RemoteError;
use crate::remote::rcsb::{EntrySummary, RcsbClient};
use std::path::PathBuf;
use tracing::{debug, info};

/// State carried between the steps of one interactive session: the last
/// search, the selected structure, and the last docking run.
///
/// Docking borrows the session mutably, so a session drives at most one run
/// at a time. Runs from different sessions sharing a scratch directory are
/// serialized by [`ScratchLayout::claim_run`].
#[derive(Debug)]
pub struct Session {
    layout: ScratchLayout,
    search_results: Vec<EntrySummary>,
    current_structure: Option<StructureDocument>,
    last_run: Option<DockingResult>,
}

impl Session {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout: ScratchLayout::new(scratch_dir),
            search_results: Vec::new(),
            current_structure: None,
            last_run: None,
        }
    }

    pub fn layout(&self) -> &ScratchLayout {
        &self.layout
    }

    pub fn search_results(&self) -> &[EntrySummary] {
        &self.search_results
    }

    pub fn current_structure(&self) -> Option<&StructureDocument> {
        self.current_structure.as_ref()
    }

    pub fn last_run(&self) -> Option<&DockingResult> {
        self.last_run.as_ref()
    }

    /// Replaces the stored search results with a fresh organism search.
    pub async fn search(
        &mut self,
        client: &RcsbClient,
        organism: &str,
        max_results: usize,
    ) -> Result<&[EntrySummary], RemoteError> {
        self.search_results = client.search_by_organism(organism, max_results).await?;
        info!("{} entr(ies) found for '{}'.", self.search_results.len(), organism);
        Ok(&self.search_results)
    }

    /// Fetches an entry and makes it the current structure.
    ///
    /// When the entry cannot be downloaded the previous structure is kept and
    /// `None` is returned.
    pub async fn fetch(
        &mut self,
        client: &RcsbClient,
        pdb_id: &str,
    ) -> Result<Option<&StructureDocument>, RemoteError> {
        match client.fetch_structure(pdb_id).await? {
            Some(document) => {
                self.current_structure = Some(document);
                Ok(self.current_structure.as_ref())
            }
            None => Ok(None),
        }
    }

    /// Makes an uploaded document the current structure.
    pub fn load_structure(&mut self, document: StructureDocument) {
        debug!("Loaded structure '{}' ({})", document.name, document.format);
        self.current_structure = Some(document);
    }

    /// Writes the current structure to the scratch directory as `{name}.pdb`.
    pub fn cache_current_structure(&self) -> Result<Option<PathBuf>, EngineError> {
        let Some(document) = &self.current_structure else {
            return Ok(None);
        };
        self.layout.ensure_exists()?;
        let path = self.layout.fetched_structure(&document.name);
        std::fs::write(&path, &document.text).map_err(|e| EngineError::io(&path, e))?;
        Ok(Some(path))
    }

    /// Docks `ligand` against the current structure and keeps the result.
    pub fn dock<E, C>(
        &mut self,
        ligand: StructureDocument,
        config: &DockingConfig,
        engine: &E,
        converter: &C,
        reporter: &ProgressReporter,
    ) -> Result<&DockingResult, EngineError>
    where
        E: DockingEngine + ?Sized,
        C: FormatConverter + ?Sized,
    {
        let receptor = self.current_structure.clone().ok_or_else(|| {
            EngineError::InvalidInput("No receptor structure is loaded".to_string())
        })?;
        let inputs = DockingInputs { receptor, ligand };

        let mut config = config.clone();
        config.scratch_dir = self.layout.root().to_path_buf();

        let result = dock::run(&inputs, &config, engine, converter, reporter)?;
        Ok(self.last_run.insert(result))
    }

    /// Receptor text to draw docked poses on: the staged receptor from the
    /// last run if present, otherwise the current structure.
    pub fn receptor_for_display(&self) -> Option<String> {
        if let Ok(text) = std::fs::read_to_string(self.layout.receptor_pdb()) {
            if !text.trim().is_empty() {
                return Some(text);
            }
        }
        self.current_structure.as_ref().map(|d| d.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::StructureFormat;

    fn pdb(name: &str, text: &str) -> StructureDocument {
        StructureDocument::new(name, StructureFormat::Pdb, text.to_string())
    }

    #[test]
    fn display_receptor_prefers_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path());
        assert_eq!(session.receptor_for_display(), None);

        session.load_structure(pdb("6VXX", "ATOM fetched\n"));
        assert_eq!(session.receptor_for_display().as_deref(), Some("ATOM fetched\n"));

        std::fs::write(session.layout().receptor_pdb(), "ATOM staged\n").unwrap();
        assert_eq!(session.receptor_for_display().as_deref(), Some("ATOM staged\n"));
    }

    #[test]
    fn current_structure_is_cached_under_its_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().join("data"));
        assert_eq!(session.cache_current_structure().unwrap(), None);

        session.load_structure(pdb("6VXX", "HEADER\n"));
        let path = session.cache_current_structure().unwrap().unwrap();
        assert_eq!(path, dir.path().join("data").join("6VXX.pdb"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "HEADER\n");
    }
}
