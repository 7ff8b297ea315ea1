use std::{path::PathBuf, time::Duration};

use abc_deck_core::{
    AbcDeckError, AppConfig, AssetConfig, Category, ClipPlayer, DeviceGateway, KeyRenderer,
    RodioPlayer, SceneCatalog, SceneController, SilentPlayer, StreamDeckPanel, Voice,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

fn main() -> abc_deck_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run(cli.run)) {
        Commands::Run(args) => run(args),
        Commands::List => list(),
    }
}

fn run(args: RunArgs) -> abc_deck_core::Result<()> {
    let config = args.resolve_config()?;
    let layout = config.asset_layout();
    tracing::info!(start = %config.start_scene(), muted = args.mute, "starting abc deck");

    let panel =
        StreamDeckPanel::open_first(Duration::from_millis(config.panel.poll_interval_ms))?;
    tracing::info!(panel = %panel.description(), "panel ready");
    let gateway = DeviceGateway::new(panel);

    let (width, height) = gateway.key_size();
    let mut renderer = KeyRenderer::new(width, height);
    if let Some(font) = &config.assets.label_font {
        renderer = renderer.with_font(layout.font(font))?;
    }
    tracing::debug!(?renderer, "rendering key assets");
    let catalog = SceneCatalog::build(&renderer, &layout, &config.palette, gateway.key_count())?;

    let player: Box<dyn ClipPlayer> = if args.mute {
        Box::new(SilentPlayer)
    } else {
        Box::new(RodioPlayer::new())
    };

    let mut controller =
        SceneController::new(catalog, gateway.clone(), player, config.start_scene())?
            .with_brightness(config.panel.brightness);
    controller.start()?;

    let input = gateway.register_callback(move |event| {
        if let Err(err) = controller.handle(event) {
            tracing::error!(%err, key = event.index, pressed = event.pressed, "key event failed");
        }
    })?;

    // Nothing else to do until the panel goes away.
    input
        .join()
        .map_err(|_| AbcDeckError::msg("input thread panicked"))?
}

fn list() -> abc_deck_core::Result<()> {
    let panels = StreamDeckPanel::list()?;
    println!("Found {} Stream Deck(s).", panels.len());
    for (model, serial) in panels {
        println!("{model}\t{serial}");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Alphabet and numeral learning toy for Stream Deck panels", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flags for the default `run` command.
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive the first connected panel until it is unplugged (default).
    Run(RunArgs),
    /// Print every connected panel and exit.
    List,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory holding `images/`, `sounds/` and `fonts/`.
    #[arg(short, long)]
    assets: Option<PathBuf>,
    /// Screen brightness in percent.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    brightness: Option<u8>,
    /// Scene category shown at startup.
    #[arg(long, value_enum)]
    start_category: Option<CategoryArg>,
    /// Narrator used at startup.
    #[arg(long, value_enum)]
    start_voice: Option<VoiceArg>,
    /// Skip clip playback.
    #[arg(long)]
    mute: bool,
}

impl RunArgs {
    /// Loads the configuration file, if any, and applies flag overrides.
    fn resolve_config(&self) -> abc_deck_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(dir) = &self.assets {
            let label_font = config.assets.label_font.take();
            config.assets = AssetConfig {
                label_font,
                ..AssetConfig::rooted_at(dir)
            };
        }
        if let Some(brightness) = self.brightness {
            config.panel.brightness = brightness;
        }
        if let Some(category) = self.start_category {
            config.start.category = category.into();
        }
        if let Some(voice) = self.start_voice {
            config.start.voice = voice.into();
        }
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CategoryArg {
    Alphabet,
    Numerals,
}

impl From<CategoryArg> for Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Alphabet => Category::Alphabet,
            CategoryArg::Numerals => Category::Numerals,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VoiceArg {
    Primary,
    Secondary,
}

impl From<VoiceArg> for Voice {
    fn from(value: VoiceArg) -> Self {
        match value {
            VoiceArg::Primary => Voice::Primary,
            VoiceArg::Secondary => Voice::Secondary,
        }
    }
}
