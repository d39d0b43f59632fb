use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "postframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a post image and write it as PNG.
    Render(RenderArgs),
    /// List the canvas presets.
    Presets,
    /// Print the default parameter document.
    Params,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Parameter document (JSON). Defaults apply when omitted.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Base photo.
    #[arg(long)]
    base: PathBuf,

    /// Optional logo image.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Extra font directory; repeatable.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Do not load system fonts.
    #[arg(long, default_value_t = false)]
    no_system_fonts: bool,

    /// Also print the PNG as a data URL on stdout.
    #[arg(long, default_value_t = false)]
    data_url: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Presets => {
            for p in postframe::CanvasPreset::ALL {
                let c = p.canvas();
                println!("{:<14} {}x{}", p.name(), c.width, c.height);
            }
            Ok(())
        }
        Command::Params => {
            println!("{}", postframe::CompositionParams::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let params = match &args.params {
        Some(p) => postframe::CompositionParams::from_path(p)?,
        None => postframe::CompositionParams::default(),
    };

    let mut opts = postframe::SessionOpts::default();
    opts.compositor.system_fonts = !args.no_system_fonts;
    opts.compositor.font_dirs = args.font_dirs.clone();
    let mut session = postframe::EditorSession::new(opts);

    // Installing a base resets the transform, so images go in before the parameters.
    session
        .load_base(&postframe::ImageSource::Path(args.base.clone()))
        .with_context(|| format!("load base image '{}'", args.base.display()))?;
    if let Some(logo) = &args.logo {
        let outcome = session.load_logo(&postframe::ImageSource::Path(logo.clone()))?;
        if outcome == postframe::LoadOutcome::Dropped {
            eprintln!("warning: logo '{}' unusable, rendering without it", logo.display());
        }
    }
    session
        .set_params(params)
        .with_context(|| "render composition")?;

    for (layer, reason) in &session.last_report().skipped {
        tracing::info!(layer = ?layer, reason = ?reason, "layer skipped");
    }

    let png = session.export()?;
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    png.write_to(&args.out)?;
    if args.data_url {
        println!("{}", png.to_data_url());
    }

    eprintln!("wrote {} ({}x{})", args.out.display(), png.width, png.height);
    Ok(())
}
