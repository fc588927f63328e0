use super::scene::Scene;

pub const VIEWER_SCRIPT_URL: &str = "https://3Dmol.org/build/3Dmol-min.js";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<script src="{{SCRIPT}}"></script>
<style>
  body { margin: 0; font-family: sans-serif; }
  #viewer { width: {{WIDTH}}px; height: {{HEIGHT}}px; position: relative; }
</style>
</head>
<body>
<div id="viewer"></div>
<script>
  const scene = {{SCENE}};
  const viewer = $3Dmol.createViewer(document.getElementById("viewer"), {
    backgroundColor: scene.background
  });
  scene.models.forEach(function (layer) {
    const model = viewer.addModel(layer.data, layer.format);
    model.setStyle({}, layer.style);
  });
  scene.labels.forEach(function (label) {
    const spec = {
      position: { x: label.position[0], y: label.position[1], z: label.position[2] },
      backgroundColor: label.backgroundColor,
      fontColor: label.fontColor,
      fontSize: label.fontSize
    };
    if (label.borderThickness !== undefined) {
      spec.borderThickness = label.borderThickness;
    }
    viewer.addLabel(label.text, spec);
  });
  viewer.zoomTo();
  viewer.render();
</script>
</body>
</html>
"#;

impl Scene {
    /// Serializes the scene for embedding inside an inline `<script>` element.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        Ok(escape_for_script(&serde_json::to_string(self)?))
    }

    /// A self-contained HTML page that draws this scene with 3Dmol.js.
    pub fn to_html(&self, title: &str) -> Result<String, serde_json::Error> {
        let json = self.to_json()?;
        Ok(PAGE_TEMPLATE
            .replace("{{TITLE}}", &escape_html(title))
            .replace("{{SCRIPT}}", VIEWER_SCRIPT_URL)
            .replace("{{WIDTH}}", &self.width.to_string())
            .replace("{{HEIGHT}}", &self.height.to_string())
            .replace("{{SCENE}}", &json))
    }
}

// Structure text may contain "</script>" or HTML comment openers.
fn escape_for_script(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "\\u003c!--")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
