//! mdpost command line: render post images and manage saved configurations.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use mdpost::{ConfigStore, PostConfig, TemplateName, ThemeName, Viewport};

#[derive(Parser)]
#[command(name = "mdpost", version, about = "Render markdown post images as PNG")]
struct Cli {
    /// Directory holding saved configurations (defaults to the user data dir)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a post to PNG
    Render {
        /// Start from a JSON configuration file
        #[arg(long, conflicts_with = "saved")]
        config_file: Option<PathBuf>,

        /// Start from a saved configuration id
        #[arg(long)]
        saved: Option<String>,

        #[command(flatten)]
        overrides: ConfigOverrides,

        /// Output path
        #[arg(short, long, default_value = "post.png")]
        output: PathBuf,

        /// Print a data:image/png;base64 URL instead of writing a file
        #[arg(long)]
        data_url: bool,

        /// Override the output width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Override the output height in pixels
        #[arg(long)]
        height: Option<u32>,
    },

    /// Save a configuration to the store
    Save {
        /// Display name for the saved configuration
        #[arg(long)]
        name: String,

        /// Start from a JSON configuration file
        #[arg(long)]
        config_file: Option<PathBuf>,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// List saved configurations
    List,

    /// Print one saved configuration as JSON
    Show { id: String },

    /// Delete a saved configuration
    Delete { id: String },

    /// Rename a saved configuration
    Rename { id: String, new_name: String },

    /// Export saved configurations as a JSON bundle
    Export {
        /// Export a single configuration instead of all of them
        #[arg(long)]
        id: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import configurations from an exported JSON bundle
    Import { file: PathBuf },

    /// List the built-in themes
    Themes,

    /// List the built-in templates
    Templates,
}

/// Field-level overrides applied on top of the base configuration.
#[derive(Args)]
struct ConfigOverrides {
    #[arg(long)]
    title: Option<String>,

    /// Markdown body text
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,

    /// Read the markdown body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,

    #[arg(long)]
    footer: Option<String>,

    /// Theme name: dark, light or teal
    #[arg(long)]
    theme: Option<String>,

    /// Template name: modern, minimal or gradient
    #[arg(long)]
    template: Option<String>,

    #[arg(long)]
    title_font_size: Option<f32>,

    #[arg(long)]
    content_font_size: Option<f32>,

    #[arg(long)]
    title_font_weight: Option<String>,

    #[arg(long)]
    content_font_weight: Option<String>,

    #[arg(long)]
    title_y: Option<f32>,

    #[arg(long)]
    content_y: Option<f32>,

    #[arg(long)]
    show_next_arrow: Option<bool>,

    #[arg(long)]
    show_code_section: Option<bool>,

    #[arg(long)]
    code_box_height: Option<f32>,

    /// Verbatim code for the code box
    #[arg(long)]
    code: Option<String>,
}

impl ConfigOverrides {
    fn apply(self, mut config: PostConfig) -> anyhow::Result<PostConfig> {
        if let Some(v) = self.title {
            config.title = v;
        }
        if let Some(v) = self.content {
            config.content = v;
        }
        if let Some(path) = self.content_file {
            config.content = fs::read_to_string(&path)
                .with_context(|| format!("reading content from {}", path.display()))?;
        }
        if let Some(v) = self.footer {
            config.footer = v;
        }
        if let Some(v) = self.theme {
            config.theme = v.parse::<ThemeName>()?;
        }
        if let Some(v) = self.template {
            config.template = v.parse::<TemplateName>()?;
        }
        if let Some(v) = self.title_font_size {
            config.title_font_size = v;
        }
        if let Some(v) = self.content_font_size {
            config.content_font_size = v;
        }
        if let Some(v) = self.title_font_weight {
            config.title_font_weight = v;
        }
        if let Some(v) = self.content_font_weight {
            config.content_font_weight = v;
        }
        if let Some(v) = self.title_y {
            config.title_y = v;
        }
        if let Some(v) = self.content_y {
            config.content_y = v;
        }
        if let Some(v) = self.show_next_arrow {
            config.show_next_arrow = v;
        }
        if let Some(v) = self.show_code_section {
            config.show_code_section = v;
        }
        if let Some(v) = self.code_box_height {
            config.code_box_height = v;
        }
        if let Some(v) = self.code {
            config.code = v;
        }
        Ok(config)
    }
}

fn open_store(dir: &Option<PathBuf>) -> anyhow::Result<ConfigStore> {
    let store = match dir {
        Some(dir) => ConfigStore::open(dir)?,
        None => ConfigStore::open_default()?,
    };
    Ok(store)
}

fn load_config_file(path: &PathBuf) -> anyhow::Result<PostConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("parsing config from {}", path.display()))?;
    Ok(config)
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            config_file,
            saved,
            overrides,
            output,
            data_url,
            width,
            height,
        } => {
            let base = if let Some(path) = &config_file {
                load_config_file(path)?
            } else if let Some(id) = &saved {
                open_store(&cli.store_dir)?.find(id)?
            } else {
                PostConfig::default()
            };
            let config = overrides.apply(base)?;

            let mut viewport = Viewport::default();
            if let Some(w) = width {
                viewport.width = w;
            }
            if let Some(h) = height {
                viewport.height = h;
            }

            let image = mdpost::render_post_with_viewport(&config, viewport)?;
            if data_url {
                println!("{}", image.to_data_url()?);
            } else {
                fs::write(&output, image.to_png()?)
                    .with_context(|| format!("writing {}", output.display()))?;
                println!("wrote {}", output.display());
            }
        }

        Command::Save {
            name,
            config_file,
            overrides,
        } => {
            let base = match &config_file {
                Some(path) => load_config_file(path)?,
                None => PostConfig::default(),
            };
            let mut config = overrides.apply(base)?;
            config.name = name;
            let id = open_store(&cli.store_dir)?.save(config)?;
            println!("saved as {id}");
        }

        Command::List => {
            let configs = open_store(&cli.store_dir)?.load()?;
            if configs.is_empty() {
                println!("no saved configurations");
            }
            for config in configs {
                println!(
                    "{}  {}  [{}/{}]  {}",
                    config.id.as_deref().unwrap_or("-"),
                    config.name,
                    config.template,
                    config.theme,
                    config.created_at.as_deref().unwrap_or(""),
                );
            }
        }

        Command::Show { id } => {
            let config = open_store(&cli.store_dir)?.find(&id)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        Command::Delete { id } => {
            open_store(&cli.store_dir)?.delete(&id)?;
            println!("deleted {id}");
        }

        Command::Rename { id, new_name } => {
            open_store(&cli.store_dir)?.rename(&id, &new_name)?;
            println!("renamed {id}");
        }

        Command::Export { id, output } => {
            let store = open_store(&cli.store_dir)?;
            let bundle = match &id {
                Some(id) => store.export_one(id)?,
                None => store.export_all()?,
            };
            let json = serde_json::to_string_pretty(&bundle)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("exported {} configs to {}", bundle.configs.len(), path.display());
                }
                None => println!("{json}"),
            }
        }

        Command::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let count = open_store(&cli.store_dir)?.import(&raw)?;
            println!("imported {count} configs");
        }

        Command::Themes => {
            for name in ThemeName::ALL {
                println!("{name}");
            }
        }

        Command::Templates => {
            for name in TemplateName::ALL {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
