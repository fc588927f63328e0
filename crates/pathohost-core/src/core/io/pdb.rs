use nalgebra::Point3;
use tracing::trace;

/// Coordinates and naming of one `ATOM`/`HETATM` record.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSite {
    pub name: String,
    pub residue_name: String,
    pub position: Point3<f64>,
}

impl AtomSite {
    /// Label shown next to the atom in the viewer, e.g. `C1 (UNL)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.residue_name)
    }
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn is_atom_record(line: &str) -> bool {
    line.starts_with("ATOM") || line.starts_with("HETATM")
}

/// Reads one fixed-column `ATOM`/`HETATM` record. Returns `None` for other
/// records and for records whose coordinate columns do not parse.
pub fn parse_atom_site(line: &str) -> Option<AtomSite> {
    if !is_atom_record(line) {
        return None;
    }
    let x = slice_and_trim(line, 30, 38).parse::<f64>().ok()?;
    let y = slice_and_trim(line, 38, 46).parse::<f64>().ok()?;
    let z = slice_and_trim(line, 46, 54).parse::<f64>().ok()?;
    Some(AtomSite {
        name: slice_and_trim(line, 12, 16).to_string(),
        residue_name: slice_and_trim(line, 17, 20).to_string(),
        position: Point3::new(x, y, z),
    })
}

/// Scans every coordinate record of a PDB/PDBQT text block.
///
/// Malformed records are skipped.
pub fn scan_atom_sites(text: &str) -> Vec<AtomSite> {
    text.lines()
        .filter(|line| is_atom_record(line))
        .filter_map(|line| {
            let site = parse_atom_site(line);
            if site.is_none() {
                trace!("Skipping unreadable coordinate record: {:?}", line);
            }
            site
        })
        .collect()
}

/// First readable coordinate record, used to anchor a pose label.
pub fn first_atom_site(text: &str) -> Option<AtomSite> {
    text.lines().find_map(parse_atom_site)
}

/// Geometric center of all readable coordinate records.
pub fn centroid(text: &str) -> Option<Point3<f64>> {
    let sites = scan_atom_sites(text);
    if sites.is_empty() {
        return None;
    }
    let sum = sites
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, s| acc + s.position.coords);
    Some(Point3::from(sum / sites.len() as f64))
}
