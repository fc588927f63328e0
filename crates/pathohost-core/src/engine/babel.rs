//! Structure format conversion through Open Babel.
//!
//! Open Babel is driven through its `obabel` executable, which reads and
//! writes files; callers stage text on disk before converting.

use super::error::EngineError;
use super::process::run_tool;
use crate::core::models::structure::StructureFormat;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const TOOL: &str = "obabel";

/// One file-to-file conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest<'a> {
    pub input: &'a Path,
    pub input_format: StructureFormat,
    pub output: &'a Path,
    pub output_format: StructureFormat,
    /// Add hydrogens before writing.
    pub add_hydrogens: bool,
    /// Generate 3D coordinates for inputs lacking them.
    pub generate_3d: bool,
    /// Write a rigid PDBQT (no torsion tree), as needed for receptors.
    pub rigid: bool,
}

impl<'a> ConversionRequest<'a> {
    pub fn new(
        input: &'a Path,
        input_format: StructureFormat,
        output: &'a Path,
        output_format: StructureFormat,
    ) -> Self {
        Self {
            input,
            input_format,
            output,
            output_format,
            add_hydrogens: false,
            generate_3d: false,
            rigid: false,
        }
    }
}

/// Converts structure files between formats.
pub trait FormatConverter {
    /// Performs `request`, leaving the converted structure at `request.output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the converter cannot run or produces no output.
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<(), EngineError>;
}

impl<T: FormatConverter + ?Sized> FormatConverter for &T {
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<(), EngineError> {
        (**self).convert(request)
    }
}

/// [`FormatConverter`] backed by the `obabel` command-line tool.
#[derive(Debug, Clone)]
pub struct ObabelConverter {
    executable: PathBuf,
}

impl ObabelConverter {
    pub fn new<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Command-line arguments for `request`, without the executable.
    pub fn command_args(request: &ConversionRequest<'_>) -> Vec<OsString> {
        let mut args = vec![
            OsString::from(format!("-i{}", request.input_format.babel_code())),
            request.input.as_os_str().to_os_string(),
            OsString::from(format!("-o{}", request.output_format.babel_code())),
            OsString::from("-O"),
            request.output.as_os_str().to_os_string(),
        ];
        if request.add_hydrogens {
            args.push(OsString::from("-h"));
        }
        if request.generate_3d {
            args.push(OsString::from("--gen3d"));
        }
        if request.rigid && request.output_format == StructureFormat::Pdbqt {
            args.push(OsString::from("-xr"));
        }
        args
    }
}

impl FormatConverter for ObabelConverter {
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<(), EngineError> {
        let args = Self::command_args(request);
        let output = run_tool(TOOL, &self.executable, &args)?;
        if !output.stderr.is_empty() {
            debug!("obabel: {}", output.stderr.trim());
        }

        // obabel exits successfully even when nothing was converted.
        let written = std::fs::metadata(request.output)
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(EngineError::MissingOutput {
                tool: TOOL,
                path: request.output.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Adds hydrogens to a receptor and writes it as rigid PDBQT.
pub fn prepare_receptor<C: FormatConverter + ?Sized>(
    converter: &C,
    input: &Path,
    output: &Path,
) -> Result<(), EngineError> {
    info!("Preparing receptor {:?} -> {:?}", input, output);
    let mut request = ConversionRequest::new(
        input,
        StructureFormat::Pdb,
        output,
        StructureFormat::Pdbqt,
    );
    request.add_hydrogens = true;
    request.rigid = true;
    converter.convert(&request)
}

/// Adds hydrogens to a small-molecule ligand, embeds it in 3D and writes PDBQT.
///
/// The input format is taken from the file extension (SDF or MOL).
pub fn prepare_ligand<C: FormatConverter + ?Sized>(
    converter: &C,
    input: &Path,
    output: &Path,
) -> Result<(), EngineError> {
    let input_format = StructureFormat::from_path(input)
        .filter(|f| f.is_small_molecule())
        .ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "Ligand must be an SDF or MOL file, got '{}'",
                input.display()
            ))
        })?;
    info!("Preparing ligand {:?} -> {:?}", input, output);
    let mut request = ConversionRequest::new(input, input_format, output, StructureFormat::Pdbqt);
    request.add_hydrogens = true;
    request.generate_3d = true;
    converter.convert(&request)
}
