use clipsweeper::offset::{ClipperOffset, EndType, JoinType, OffsetOptions};
use clipsweeper::{total_area, BinaryOp, Clipper, ClipperOptions, FillRule, Paths};
use libtest_mimic::{Arguments, Failed, Trial};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

type RawPaths = Vec<Vec<(i64, i64)>>;

#[derive(Serialize, Deserialize, Debug)]
enum Operation {
    Clip {
        op: BinaryOp,
        fill_rule: FillRule,
        #[serde(default)]
        options: ClipperOptions,
    },
    Offset {
        delta: f64,
        join: JoinType,
        end: EndType,
        #[serde(default)]
        options: OffsetOptions,
    },
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Expectation {
    /// The total signed area of the closed output.
    area: Option<f64>,
    /// How far the area may be from `area`.
    #[serde(default)]
    area_tolerance: f64,
    /// The number of closed output paths.
    closed: Option<usize>,
    /// The number of open output paths.
    open: Option<usize>,
    /// The exact output, up to rotation of each path.
    paths: Option<RawPaths>,
}

#[derive(Serialize, Deserialize, Debug)]
struct RegressionCaseDeclaration {
    #[serde(default)]
    subjects: RawPaths,
    #[serde(default)]
    open_subjects: RawPaths,
    #[serde(default)]
    clips: RawPaths,
    operation: Operation,
    #[serde(default)]
    expect: Expectation,
}

fn to_paths(raw: &RawPaths) -> Paths {
    raw.iter()
        .map(|p| p.iter().map(|&pt| pt.into()).collect())
        .collect()
}

/// Rotates each path to start at its smallest point, and sorts the paths.
fn normalize(mut paths: Paths) -> Paths {
    for p in &mut paths {
        if let Some(i) = (0..p.len()).min_by_key(|&i| (p[i].x, p[i].y)) {
            p.rotate_left(i);
        }
    }
    paths.sort_by_key(|p| p.first().map(|pt| (pt.x, pt.y)));
    paths
}

fn main() {
    let args = Arguments::from_args();
    let tests = regression_tests();

    libtest_mimic::run(&args, tests).exit();
}

fn regression_tests() -> Vec<Trial> {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let file_paths = glob::glob(&format!("{ws}/tests/regression/**/*.yml")).unwrap();

    file_paths
        .into_iter()
        .map(|p| {
            let p = p.unwrap();
            let name = input_path_base(&p).display().to_string();
            Trial::test(name, || generate_regression_test(p))
        })
        .collect()
}

fn input_path_base(input_path: &Path) -> &Path {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let base = format!("{ws}/tests/regression");
    input_path.strip_prefix(base).unwrap()
}

fn generate_regression_test(path: PathBuf) -> Result<(), Failed> {
    let input = std::fs::read_to_string(&path)?;
    let case: RegressionCaseDeclaration = serde_yaml::from_str(&input)?;
    let subjects = to_paths(&case.subjects);

    let (closed, open) = match &case.operation {
        Operation::Clip {
            op,
            fill_rule,
            options,
        } => {
            let mut clipper = Clipper::with_options(options.clone());
            clipper.add_subject(&subjects);
            clipper.add_open_subject(&to_paths(&case.open_subjects));
            clipper.add_clip(&to_paths(&case.clips));
            let solution = clipper.execute(*op, *fill_rule)?;

            // The tree output has to agree with the flat output.
            let tree = clipper.execute_tree(*op, *fill_rule)?;
            if tree.tree.total_count() != solution.closed.len() {
                return Err(format!(
                    "tree has {} polygons, flat output has {}",
                    tree.tree.total_count(),
                    solution.closed.len()
                )
                .into());
            }
            (solution.closed, solution.open)
        }
        Operation::Offset {
            delta,
            join,
            end,
            options,
        } => {
            let mut offset = ClipperOffset::with_options(options.clone());
            offset.add_paths(&subjects, *join, *end);
            (offset.execute(*delta)?, Vec::new())
        }
    };

    let expect = &case.expect;
    if let Some(area) = expect.area {
        let actual = total_area(&closed);
        if (actual - area).abs() > expect.area_tolerance {
            return Err(format!("expected area {area}, got {actual}").into());
        }
    }
    if let Some(count) = expect.closed {
        if closed.len() != count {
            return Err(format!("expected {count} closed paths, got {}: {closed:?}", closed.len()).into());
        }
    }
    if let Some(count) = expect.open {
        if open.len() != count {
            return Err(format!("expected {count} open paths, got {}: {open:?}", open.len()).into());
        }
    }
    if let Some(paths) = &expect.paths {
        let expected = normalize(to_paths(paths));
        let actual = normalize(closed);
        if expected != actual {
            return Err(format!("expected {expected:?}, got {actual:?}").into());
        }
    }

    Ok(())
}
