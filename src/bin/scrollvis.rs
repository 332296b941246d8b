use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrollvis", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load both datasets and print a summary of the entity store as JSON.
    Inspect(InspectArgs),
    /// Scroll to a section, let it settle and write the scene.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct DataArgs {
    /// Graph dataset JSON (`nodes` + `edges`).
    #[arg(long)]
    graph: PathBuf,

    /// Hierarchy dataset JSON (`source` + `links`).
    #[arg(long)]
    tree: PathBuf,

    /// Engine configuration JSON. Defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail on the first dangling reference instead of dropping it.
    #[arg(long)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    data: DataArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Section index to scroll to (0 = title .. 4 = vertical list).
    #[arg(long, default_value_t = 1)]
    section: usize,

    /// Upper bound on force ticks run before writing.
    #[arg(long, default_value_t = 300)]
    ticks: usize,

    /// Hover this item id after settling.
    #[arg(long)]
    hover: Option<String>,

    /// Scene snapshot JSON output.
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// SVG output.
    #[arg(long)]
    out_svg: Option<PathBuf>,

    /// PNG output.
    #[arg(long)]
    out_png: Option<PathBuf>,

    /// Raster scale for PNG output.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn load_engine(args: &DataArgs) -> anyhow::Result<scrollvis::ScrollVis> {
    let mut config = match &args.config {
        Some(path) => scrollvis::EngineConfig::from_json_str(&read_text(path, "config")?)
            .with_context(|| format!("parse config '{}'", path.display()))?,
        None => scrollvis::EngineConfig::default(),
    };
    if args.strict {
        config.integrity = scrollvis::IntegrityPolicy::Strict;
    }
    config.out_of_range = scrollvis::OutOfRangePolicy::Error;

    let graph = scrollvis::GraphDataset::from_json_str(&read_text(&args.graph, "graph dataset")?)
        .with_context(|| format!("parse graph dataset '{}'", args.graph.display()))?;
    let tree = scrollvis::HierarchyDataset::from_json_str(&read_text(&args.tree, "hierarchy dataset")?)
        .with_context(|| format!("parse hierarchy dataset '{}'", args.tree.display()))?;

    Ok(scrollvis::ScrollVis::new(&graph, &tree, config)?)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let vis = load_engine(&args.data)?;
    let store = vis.store();
    let hierarchy = store.hierarchy();

    let summary = serde_json::json!({
        "items": store.len(),
        "relationships": store.relationships().len(),
        "categories": store.categories(),
        "hierarchy": {
            "root": hierarchy.root().item,
            "nodes": hierarchy.len(),
            "depth": hierarchy.max_depth(),
            "preorder": hierarchy.preorder(),
        },
        "dropped": store.integrity_report().dropped,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut vis = load_engine(&args.data)?;

    vis.activate(args.section)
        .with_context(|| format!("activate section {}", args.section))?;
    let ticks = vis.settle(args.ticks);
    vis.finish_transitions();

    if let Some(id) = &args.hover
        && !vis.hover_item(id, scrollvis::Point::ZERO)
    {
        eprintln!("hover on '{id}' ignored in this section");
    }
    vis.finish_transitions();

    eprintln!(
        "section {} ({}), {ticks} force ticks",
        args.section,
        vis.active_section().map_or("?", |s| s.name())
    );

    if let Some(path) = &args.out_json {
        ensure_parent_dir(path)?;
        std::fs::write(path, vis.snapshot_json()?)
            .with_context(|| format!("write scene json '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }

    let svg = vis.render_svg();
    if let Some(path) = &args.out_svg {
        ensure_parent_dir(path)?;
        std::fs::write(path, &svg).with_context(|| format!("write svg '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(path) = &args.out_png {
        ensure_parent_dir(path)?;
        let resources = args.data.graph.parent().filter(|p| !p.as_os_str().is_empty());
        let opts = scrollvis::svg_options(resources, true);
        let image = scrollvis::rasterize_svg(&svg, &opts, args.scale)?;
        image
            .save_png(path)
            .with_context(|| format!("write png '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
