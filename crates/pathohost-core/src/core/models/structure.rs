use phf::{Map, phf_map};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

static EXTENSION_FORMATS: Map<&'static str, StructureFormat> = phf_map! {
    "pdb" => StructureFormat::Pdb,
    "ent" => StructureFormat::Pdb,
    "pdbqt" => StructureFormat::Pdbqt,
    "sdf" => StructureFormat::Sdf,
    "sd" => StructureFormat::Sdf,
    "mol" => StructureFormat::Mol,
};

/// Coordinate file formats handled by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureFormat {
    /// Plain atomic-coordinate display format.
    Pdb,
    /// Docking format: PDB columns plus partial charges and AutoDock atom types.
    Pdbqt,
    /// Small-molecule structure-data file.
    Sdf,
    /// Single small-molecule MDL molfile.
    Mol,
}

impl StructureFormat {
    /// Format code understood by Open Babel (`-i<code>` / `-o<code>`).
    pub fn babel_code(self) -> &'static str {
        match self {
            StructureFormat::Pdb => "pdb",
            StructureFormat::Pdbqt => "pdbqt",
            StructureFormat::Sdf => "sdf",
            StructureFormat::Mol => "mol",
        }
    }

    pub fn extension(self) -> &'static str {
        self.babel_code()
    }

    /// Whether the format describes a small molecule that may lack 3D geometry.
    pub fn is_small_molecule(self) -> bool {
        matches!(self, StructureFormat::Sdf | StructureFormat::Mol)
    }

    /// Detects the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        EXTENSION_FORMATS.get(ext.as_str()).copied()
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.babel_code())
    }
}

impl FromStr for StructureFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EXTENSION_FORMATS
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| format!("Unknown structure format: '{}'", s))
    }
}

/// A fetched or uploaded coordinate file, kept as opaque text.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDocument {
    /// Identifier the document was fetched by, or the file stem for uploads.
    pub name: String,
    pub format: StructureFormat,
    pub text: String,
}

impl StructureDocument {
    pub fn new(name: impl Into<String>, format: StructureFormat, text: String) -> Self {
        Self {
            name: name.into(),
            format,
            text,
        }
    }

    /// Loads a document from disk, detecting the format from the extension.
    pub fn read_from_path(path: &Path) -> std::io::Result<Self> {
        let format = StructureFormat::from_path(path).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Unrecognized structure file extension: {}", path.display()),
            )
        })?;
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, format, text))
    }

    /// First `max_chars` characters, cut on a char boundary, for previews.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}
