use std::path::PathBuf;

use clap::{Args, Parser};
use tracing_subscriber::EnvFilter;

use clipsweeper::{bounds, generators, BinaryOp, Clipper, FillRule, Paths};

mod svg_util;

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Example {
    Checkerboard,
    SlantedCheckerboard,
    Slanties,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Rule {
    EvenOdd,
    NonZero,
    Positive,
    Negative,
}

impl From<Rule> for FillRule {
    fn from(rule: Rule) -> FillRule {
        match rule {
            Rule::EvenOdd => FillRule::EvenOdd,
            Rule::NonZero => FillRule::NonZero,
            Rule::Positive => FillRule::Positive,
            Rule::Negative => FillRule::Negative,
        }
    }
}

/// Draws the union, intersection, xor and difference of two sets of paths.
#[derive(Parser)]
struct Cli {
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    input: Input,

    #[arg(long, value_enum, default_value = "even-odd")]
    fill_rule: Rule,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// A YAML file with `subjects` and `clips` lists.
    input: Option<PathBuf>,

    #[arg(long)]
    example: Option<Example>,
}

fn get_paths(input: &Input) -> anyhow::Result<(Paths, Paths)> {
    match (&input.input, &input.example) {
        (Some(path), _) => svg_util::load_input(path),
        (None, Some(example)) => Ok(match example {
            Example::Checkerboard => generators::checkerboard(10),
            Example::SlantedCheckerboard => generators::slanted_checkerboard(10),
            Example::Slanties => generators::slanties(10),
        }),
        (None, None) => anyhow::bail!("no input"),
    }
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    let (subjects, clips) = get_paths(&args.input)?;
    let fill_rule = FillRule::from(args.fill_rule);

    let mut all = subjects.clone();
    all.extend(clips.iter().cloned());
    let bbox = bounds(&all);
    let (width, height, stroke_width) = svg_util::layout(bbox);
    let pad = (width - bbox.width() as f64) / 2.0;
    let mut document = svg::Document::new().set(
        "viewBox",
        (bbox.left as f64 - pad, bbox.top as f64 - pad, width * 3.0, height * 2.0),
    );

    // The input goes in the top left, and the outputs fill up the grid.
    document = svg_util::outline(document, &all, (0.0, 0.0), stroke_width, true);

    let mut clipper = Clipper::new();
    clipper.add_subject(&subjects);
    clipper.add_clip(&clips);
    let ops = [
        (BinaryOp::Union, (width, 0.0)),
        (BinaryOp::Intersection, (width * 2.0, 0.0)),
        (BinaryOp::Xor, (0.0, height)),
        (BinaryOp::Difference, (width, height)),
    ];
    for (op, off) in ops {
        let solution = clipper.execute_tree(op, fill_rule)?;
        tracing::info!(?op, polygons = solution.tree.total_count(), "clipped");
        document = svg_util::outline(document, &all, off, stroke_width, true);
        document = svg_util::fill_tree(document, solution.tree.root(), off, stroke_width);
    }

    svg::save(&args.output, &document)?;

    Ok(())
}
