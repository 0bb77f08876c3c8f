use std::path::Path as FsPath;

use clipsweeper::{Path, Paths, PolyPath, Rect};
use svg::node::element::path::Data;
use svg::Document;

pub const COLORS: [&str; 9] = [
    "#005F73", "#0A9396", "#94D2BD", "#E9D8A6", "#EE9B00", "#CA6702", "#BB3E03", "#AE2012", "#9B2226",
];

#[derive(serde::Deserialize)]
struct InputFile {
    #[serde(default)]
    subjects: Vec<Vec<(i64, i64)>>,
    #[serde(default)]
    clips: Vec<Vec<(i64, i64)>>,
}

fn to_paths(raw: Vec<Vec<(i64, i64)>>) -> Paths {
    raw.into_iter()
        .map(|p| p.into_iter().map(Into::into).collect())
        .collect()
}

/// Reads subject and clip paths from a YAML file like
///
/// ```yaml
/// subjects:
///   - [[0, 0], [10, 0], [10, 10]]
/// clips:
///   - [[5, 5], [15, 5], [15, 15]]
/// ```
pub fn load_input(path: &FsPath) -> anyhow::Result<(Paths, Paths)> {
    let input: InputFile = serde_yaml::from_str(&std::fs::read_to_string(path)?)?;
    Ok((to_paths(input.subjects), to_paths(input.clips)))
}

pub fn add_paths(mut data: Data, paths: &[Path], (x_off, y_off): (f64, f64), close: bool) -> Data {
    for p in paths {
        let Some((first, rest)) = p.split_first() else {
            continue;
        };
        data = data.move_to((first.x as f64 + x_off, first.y as f64 + y_off));
        for q in rest {
            data = data.line_to((q.x as f64 + x_off, q.y as f64 + y_off));
        }
        if close {
            data = data.close();
        }
    }
    data
}

pub fn outline(doc: Document, paths: &[Path], off: (f64, f64), stroke_width: f64, close: bool) -> Document {
    let path = svg::node::element::Path::new()
        .set("stroke", "black")
        .set("stroke-width", stroke_width)
        .set("stroke-linecap", "round")
        .set("stroke-linejoin", "round")
        .set("opacity", 0.2)
        .set("fill", "none")
        .set("d", add_paths(Data::new(), paths, off, close));
    doc.add(path)
}

/// Fills each outer polygon of a tree (together with its holes) in its own
/// color.
pub fn fill_tree(mut doc: Document, root: PolyPath<'_>, off: (f64, f64), stroke_width: f64) -> Document {
    let mut color_idx = 0;
    let mut stack: Vec<PolyPath<'_>> = root.children().collect();
    while let Some(outer) = stack.pop() {
        let mut group = vec![outer.polygon().to_vec()];
        for hole in outer.children() {
            group.push(hole.polygon().to_vec());
            stack.extend(hole.children());
        }
        let path = svg::node::element::Path::new()
            .set("d", add_paths(Data::new(), &group, off, true))
            .set("stroke", "black")
            .set("stroke-width", stroke_width)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round")
            .set("fill-rule", "evenodd")
            .set("fill", COLORS[color_idx]);
        doc = doc.add(path);
        color_idx = (color_idx + 1) % COLORS.len();
    }
    doc
}

/// The padded size of one panel, and a stroke width to go with it.
pub fn layout(bounds: Rect) -> (f64, f64, f64) {
    let pad = 1.0 + bounds.width().max(bounds.height()) as f64 / 20.0;
    let width = bounds.width() as f64 + 2.0 * pad;
    let height = bounds.height() as f64 + 2.0 * pad;
    let stroke_width = (bounds.width().max(bounds.height()) as f64 / 512.0).max(0.1);
    (width, height, stroke_width)
}
