use crate::core::io::pdb::{first_atom_site, scan_atom_sites};
use crate::core::models::pose::Pose;
use nalgebra::Point3;
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// Whole-structure rendering styles offered for a single structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    #[default]
    Cartoon,
    Stick,
    Surface,
    Sphere,
}

impl RenderStyle {
    pub const ALL: [RenderStyle; 4] = [
        RenderStyle::Cartoon,
        RenderStyle::Stick,
        RenderStyle::Surface,
        RenderStyle::Sphere,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RenderStyle::Cartoon => "cartoon",
            RenderStyle::Stick => "stick",
            RenderStyle::Surface => "surface",
            RenderStyle::Sphere => "sphere",
        }
    }
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RenderStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown rendering style '{}'. Expected one of: cartoon, stick, surface, sphere.",
                    s
                )
            })
    }
}

/// One structure added to the viewer, with the style applied to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelLayer {
    pub data: String,
    pub format: &'static str,
    pub style: Value,
}

impl ModelLayer {
    fn pdb(data: &str, style: Value) -> Self {
        Self {
            data: data.to_string(),
            format: "pdb",
            style,
        }
    }

    fn receptor(data: &str) -> Self {
        Self::pdb(data, json!({ "cartoon": { "color": "spectrum" } }))
    }

    fn ligand(data: &str) -> Self {
        Self::pdb(data, json!({ "stick": { "colorscheme": "greenCarbon" } }))
    }
}

/// A floating text label anchored at a 3D position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub text: String,
    pub position: [f64; 3],
    pub background_color: &'static str,
    pub font_color: &'static str,
    pub font_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_thickness: Option<f64>,
}

/// Everything the viewer needs to draw one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: &'static str,
    pub models: Vec<ModelLayer>,
    pub labels: Vec<Label>,
}

impl Scene {
    fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: "white",
            models: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// A single structure drawn in one style.
    pub fn single(pdb_text: &str, style: RenderStyle) -> Self {
        let mut style_spec = serde_json::Map::new();
        style_spec.insert(style.as_str().to_string(), json!({}));

        let mut scene = Self::empty(800, 600);
        scene
            .models
            .push(ModelLayer::pdb(pdb_text, Value::Object(style_spec)));
        scene
    }

    /// Receptor as a spectrum cartoon with the ligand as green-carbon sticks.
    pub fn complex(receptor_pdb: &str, ligand_pdb: &str) -> Self {
        let mut scene = Self::empty(800, 600);
        scene.models.push(ModelLayer::receptor(receptor_pdb));
        scene.models.push(ModelLayer::ligand(ligand_pdb));
        scene
    }

    /// One docked pose placed on its receptor.
    ///
    /// `label_text` is anchored at the pose's first atom; with
    /// `show_atom_labels` every ligand atom gets a `NAME (RES)` label. An
    /// out-of-range `pose_index` draws the receptor alone.
    pub fn pose_on_receptor(
        receptor_pdb: &str,
        poses: &[Pose],
        pose_index: usize,
        label_text: Option<&str>,
        show_atom_labels: bool,
    ) -> Self {
        let mut scene = Self::empty(1000, 600);
        scene.models.push(ModelLayer::receptor(receptor_pdb));

        let Some(pose) = poses.get(pose_index) else {
            return scene;
        };
        let ligand = pose.structure_text();
        scene.models.push(ModelLayer::ligand(ligand));

        if let Some(text) = label_text {
            if let Some(anchor) = first_atom_site(ligand) {
                scene.labels.push(Label {
                    text: text.to_string(),
                    position: to_array(&anchor.position),
                    background_color: "black",
                    font_color: "white",
                    font_size: 14,
                    border_thickness: None,
                });
            }
        }

        if show_atom_labels {
            scene
                .labels
                .extend(scan_atom_sites(ligand).into_iter().map(|site| Label {
                    text: site.label(),
                    position: to_array(&site.position),
                    background_color: "blue",
                    font_color: "white",
                    font_size: 10,
                    border_thickness: Some(0.5),
                }));
        }
        scene
    }
}

fn to_array(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEPTOR: &str =
        "ATOM      1  CA  ALA A   1       0.000   0.000   0.000  1.00  0.00           C\n";
    const POSE_PDB: &str = "\
HETATM    1  C1  UNL     1      10.000  11.000  12.000  1.00  0.00           C
HETATM    2  O1  UNL     1      12.000  13.000  14.000  1.00  0.00           O
";

    fn poses() -> Vec<Pose> {
        vec![Pose::new(1, POSE_PDB.to_string(), Some(-7.2))]
    }

    #[test]
    fn render_style_parses_case_insensitively() {
        assert_eq!("Stick".parse::<RenderStyle>(), Ok(RenderStyle::Stick));
        assert_eq!("sphere".parse::<RenderStyle>(), Ok(RenderStyle::Sphere));
        assert!("ribbon".parse::<RenderStyle>().is_err());
    }

    #[test]
    fn single_scene_uses_requested_style() {
        let scene = Scene::single(RECEPTOR, RenderStyle::Surface);
        assert_eq!(scene.models.len(), 1);
        assert_eq!(scene.models[0].style, json!({ "surface": {} }));
        assert!(scene.labels.is_empty());
    }

    #[test]
    fn complex_scene_styles_receptor_and_ligand() {
        let scene = Scene::complex(RECEPTOR, POSE_PDB);
        assert_eq!(scene.models[0].style["cartoon"]["color"], "spectrum");
        assert_eq!(scene.models[1].style["stick"]["colorscheme"], "greenCarbon");
    }

    #[test]
    fn pose_label_is_anchored_at_first_atom() {
        let scene = Scene::pose_on_receptor(RECEPTOR, &poses(), 0, Some("Pose 1"), false);
        assert_eq!(scene.models.len(), 2);
        assert_eq!(scene.labels.len(), 1);
        assert_eq!(scene.labels[0].text, "Pose 1");
        assert_eq!(scene.labels[0].position, [10.0, 11.0, 12.0]);
        assert_eq!(scene.labels[0].font_size, 14);
    }

    #[test]
    fn atom_labels_cover_every_ligand_atom() {
        let scene = Scene::pose_on_receptor(RECEPTOR, &poses(), 0, None, true);
        let texts: Vec<_> = scene.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["C1 (UNL)", "O1 (UNL)"]);
        assert_eq!(scene.labels[1].border_thickness, Some(0.5));
    }

    #[test]
    fn out_of_range_pose_draws_receptor_only() {
        let scene = Scene::pose_on_receptor(RECEPTOR, &poses(), 5, Some("Pose 6"), true);
        assert_eq!(scene.models.len(), 1);
        assert!(scene.labels.is_empty());
    }

    #[test]
    fn labels_serialize_with_viewer_field_names() {
        let scene = Scene::pose_on_receptor(RECEPTOR, &poses(), 0, Some("Pose 1"), false);
        let value = serde_json::to_value(&scene.labels[0]).unwrap();
        assert_eq!(value["backgroundColor"], "black");
        assert_eq!(value["fontColor"], "white");
        assert!(value.get("borderThickness").is_none());
    }
}
