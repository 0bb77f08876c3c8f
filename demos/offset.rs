use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clipsweeper::offset::{ClipperOffset, EndType, JoinType, OffsetOptions};
use clipsweeper::{bounds, Paths};

mod svg_util;

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Join {
    Miter,
    Square,
    Bevel,
    Round,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum End {
    Polygon,
    Joined,
    Butt,
    Square,
    Round,
}

/// Offsets the subject paths of an input file by several distances.
#[derive(Parser)]
struct Cli {
    /// A YAML file with a `subjects` list.
    input: PathBuf,

    #[arg(long)]
    output: PathBuf,

    #[arg(long, default_value_t = 10.0)]
    delta: f64,

    #[arg(long, default_value_t = 3)]
    steps: usize,

    #[arg(long, value_enum, default_value = "round")]
    join: Join,

    #[arg(long, value_enum, default_value = "polygon")]
    end: End,

    #[arg(long, default_value_t = 2.0)]
    miter_limit: f64,
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    let (subjects, _) = svg_util::load_input(&args.input)?;
    let join = match args.join {
        Join::Miter => JoinType::Miter,
        Join::Square => JoinType::Square,
        Join::Bevel => JoinType::Bevel,
        Join::Round => JoinType::Round,
    };
    let end = match args.end {
        End::Polygon => EndType::Polygon,
        End::Joined => EndType::Joined,
        End::Butt => EndType::Butt,
        End::Square => EndType::Square,
        End::Round => EndType::Round,
    };

    let mut offset = ClipperOffset::with_options(OffsetOptions::default().with_miter_limit(args.miter_limit));
    offset.add_paths(&subjects, join, end);

    let mut rings: Vec<Paths> = Vec::new();
    for i in 1..=args.steps {
        let delta = args.delta * i as f64;
        let out = offset.execute(delta)?;
        tracing::info!(delta, paths = out.len(), "offset");
        rings.push(out);
    }

    let mut all = subjects.clone();
    all.extend(rings.iter().flatten().cloned());
    let bbox = bounds(&all);
    let (width, height, stroke_width) = svg_util::layout(bbox);
    let pad = (width - bbox.width() as f64) / 2.0;
    let mut document = svg::Document::new().set(
        "viewBox",
        (bbox.left as f64 - pad, bbox.top as f64 - pad, width, height),
    );

    // Outermost rings first, so that the inner ones are drawn on top.
    for ring in rings.iter().rev() {
        document = svg_util::outline(document, ring, (0.0, 0.0), stroke_width * 2.0, true);
    }
    document = svg_util::outline(document, &subjects, (0.0, 0.0), stroke_width, end == EndType::Polygon);

    svg::save(&args.output, &document)?;

    Ok(())
}
