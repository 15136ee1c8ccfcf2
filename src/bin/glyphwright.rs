use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use glyphwright::{Align, BreakKind, Justify, LayoutOptions, MonospaceMetrics, TypingConfig, TypingLabel};

#[derive(Parser, Debug)]
#[command(name = "glyphwright", version)]
struct Cli {
    /// Log parser and layout decisions.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out markup and print its lines.
    Layout(LayoutArgs),
    /// Simulate the typewriter reveal frame by frame.
    Reveal(RevealArgs),
}

#[derive(Parser, Debug)]
struct Source {
    /// Markup text.
    text: Option<String>,

    /// Read the markup from a file instead.
    #[arg(long = "in", conflicts_with = "text")]
    in_path: Option<PathBuf>,

    /// Typing config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    source: Source,

    /// Target width in monospace cells.
    #[arg(long)]
    width: Option<f64>,

    /// Width of one cell.
    #[arg(long, default_value_t = 8.0)]
    cell: f64,

    /// Maximum number of lines.
    #[arg(long)]
    max_lines: Option<usize>,

    /// Ellipsis text (defaults to the config's).
    #[arg(long)]
    ellipsis: Option<String>,

    /// Horizontal alignment.
    #[arg(long, value_enum, default_value_t = AlignArg::Start)]
    align: AlignArg,

    /// Stretch inter-word spaces of wrapped lines.
    #[arg(long, default_value_t = false)]
    justify: bool,
}

#[derive(Parser, Debug)]
struct RevealArgs {
    #[command(flatten)]
    source: Source,

    /// Frames per second of the simulation.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Global speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Stop after this many frames even if the reveal is not done.
    #[arg(long, default_value_t = 10_000)]
    max_frames: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlignArg {
    Start,
    Center,
    End,
}

impl From<AlignArg> for Align {
    fn from(a: AlignArg) -> Self {
        match a {
            AlignArg::Start => Align::Start,
            AlignArg::Center => Align::Center,
            AlignArg::End => Align::End,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Reveal(args) => cmd_reveal(args),
    }
}

fn load(source: &Source) -> anyhow::Result<(String, TypingConfig)> {
    let text = match (&source.text, &source.in_path) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read markup '{}'", path.display()))?,
        (None, None) => anyhow::bail!("pass markup text or --in <file>"),
    };
    let config = match &source.config {
        Some(path) => TypingConfig::from_path(path)?,
        None => TypingConfig::default(),
    };
    Ok((text, config))
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let (text, config) = load(&args.source)?;
    let options = LayoutOptions {
        width: args.width.map(|cells| cells * args.cell),
        max_lines: args.max_lines,
        ellipsis: args
            .ellipsis
            .clone()
            .unwrap_or_else(|| config.default_ellipsis.clone()),
        align_x: args.align.into(),
        justify: if args.justify {
            Justify::Spaces
        } else {
            Justify::None
        },
        ..LayoutOptions::default()
    };
    let label = TypingLabel::builder()
        .config(config)
        .metrics(MonospaceMetrics::with_advance(args.cell))
        .options(options)
        .text(text)
        .build()?;

    let layout = label.layout();
    for (i, line) in layout.lines().iter().enumerate() {
        let kind = match line.break_kind {
            BreakKind::Forced => "forced",
            BreakKind::Wrap => "wrap",
            BreakKind::End => "end",
            BreakKind::Ellipsis => "ellipsis",
        };
        println!(
            "{i:>3} {kind:<8} x={:>6.1} w={:>6.1} |{}|",
            line.x,
            line.width,
            layout.line_text(i)
        );
    }
    let size = layout.size();
    eprintln!(
        "{} lines, {:.1}x{:.1}{}",
        layout.lines().len(),
        size.x,
        size.y,
        if layout.is_truncated() { ", truncated" } else { "" }
    );
    Ok(())
}

fn cmd_reveal(args: RevealArgs) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be > 0");
    }
    let (text, config) = load(&args.source)?;
    let mut label = TypingLabel::builder().config(config).text(text).build()?;
    label.set_speed(args.speed);

    let dt = 1.0 / args.fps;
    for frame in 0..args.max_frames {
        let revealed = label.advance(dt);
        let events = label.drain_events();
        if revealed > 0 || !events.is_empty() {
            println!(
                "frame {frame:>5} t={:>7.3}s |{}|",
                (frame + 1) as f64 * dt,
                label.visible_text().replace('\n', "⏎")
            );
        }
        for name in events {
            println!("            event {name}");
        }
        if label.is_finished() {
            eprintln!("done after {} frames", frame + 1);
            return Ok(());
        }
    }
    eprintln!("stopped after {} frames", args.max_frames);
    Ok(())
}
