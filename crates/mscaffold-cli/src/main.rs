//! mscaffold CLI entrypoint
//! Parses command-line arguments and dispatches to the core scaffolders.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mscaffold_core::{
    AuthorInfo, Config, ExtendMode, TemplateRenderer, VhostGenerator, VhostOptions,
    WidgetRequest, WidgetScaffolder,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mscaffold")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Application root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Configuration file (YAML or TOML); defaults to mscaffold.{yaml,yml,toml} in the root
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory overriding the built-in templates
    #[arg(long, global = true)]
    template_dir: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scaffold widgets into an existing module
    Widget {
        #[command(subcommand)]
        command: WidgetCommands,
    },
    /// Webserver virtual host configuration
    Vhost {
        #[command(subcommand)]
        command: VhostCommands,
    },
}

#[derive(Subcommand, Debug)]
enum WidgetCommands {
    /// Create a widget block, its template and its descriptor entry
    Create(WidgetCreateArgs),
}

#[derive(Args, Debug)]
struct WidgetCreateArgs {
    /// Vendor namespace, e.g. Acme
    vendor_namespace: String,
    /// Module name, e.g. Widgets
    module_name: String,
    /// Code pool: local or community
    code_pool: String,
    /// Module identifier used in block aliases, e.g. acme_widgets
    module_id: String,
    /// Widget identifier, e.g. featured_items
    widget_id: String,
    /// Widget display name
    widget_name: String,
    /// Design package
    design_package: String,
    /// Design theme
    design_theme: String,
    /// Widget parameters as field=value pairs separated by commas,
    /// e.g. id=title,label=Title,type=text
    widget_parameters: Vec<String>,
    /// Author name for the block docblock
    #[arg(long)]
    author_name: Option<String>,
    /// Author email for the block docblock
    #[arg(long)]
    author_email: Option<String>,
    /// Widget description
    #[arg(long)]
    description: Option<String>,
    /// How the widget entry is merged into an existing descriptor
    #[arg(long, value_enum)]
    extend_mode: Option<ExtendMode>,
    /// Report existing block/template files as skipped instead of failing
    #[arg(long)]
    skip_existing: bool,
}

#[derive(Subcommand, Debug)]
enum VhostCommands {
    /// Print a virtual host for every configured website
    Generate {
        /// Generate an nginx server block instead of an Apache virtual host
        #[arg(long)]
        nginx: bool,
        /// Enable developer mode in the generated configuration
        #[arg(long)]
        dev_mode: bool,
        /// Server administrator email
        #[arg(long, default_value = mscaffold_core::vhost::DEFAULT_SERVER_ADMIN)]
        server_admin: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli.root, cli.config.as_deref())?;
    let template_dir = cli.template_dir.clone().or_else(|| {
        config
            .template_dir
            .as_ref()
            .map(|dir| cli.root.join(dir))
    });
    let renderer = TemplateRenderer::new(template_dir).context("Failed to load templates")?;
    tracing::debug!("Template source: {:?}", renderer.source());

    match &cli.command {
        Commands::Widget {
            command: WidgetCommands::Create(args),
        } => create_widget(&cli.root, &config, &renderer, args),
        Commands::Vhost {
            command:
                VhostCommands::Generate {
                    nginx,
                    dev_mode,
                    server_admin,
                },
        } => {
            let options = VhostOptions {
                nginx: *nginx,
                dev_mode: *dev_mode,
                server_admin: server_admin.clone(),
            };
            let document_root = cli
                .root
                .canonicalize()
                .with_context(|| format!("Invalid root directory: {}", cli.root.display()))?;
            let output = VhostGenerator::new(&renderer)
                .generate(&config, &document_root, &options)
                .context("Failed to generate vhost configuration")?;
            print!("{output}");
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over the default level unless `--verbose` is given
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Config> {
    match explicit {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Config::discover(root).context("Failed to load configuration"),
    }
}

fn create_widget(
    root: &Path,
    config: &Config,
    renderer: &TemplateRenderer,
    args: &WidgetCreateArgs,
) -> anyhow::Result<()> {
    let author = AuthorInfo {
        author_name: args.author_name.clone().or_else(|| config.author_name.clone()),
        author_email: args
            .author_email
            .clone()
            .or_else(|| config.author_email.clone()),
        description: args.description.clone(),
    };
    let request = WidgetRequest::new(
        &args.vendor_namespace,
        &args.module_name,
        &args.code_pool,
        &args.module_id,
        &args.widget_id,
        &args.widget_name,
        &args.design_package,
        &args.design_theme,
    )
    .with_parameters(&args.widget_parameters)
    .with_author(author)
    .with_extend_mode(args.extend_mode.unwrap_or(config.extend_mode))
    .with_skip_existing(args.skip_existing || config.skip_existing);

    let mut scaffolder = WidgetScaffolder::new(renderer, root);
    let result = scaffolder.scaffold(&request);
    for event in scaffolder.events() {
        println!("{event}");
    }
    result
        .map(|_| ())
        .with_context(|| format!("Failed to create widget '{}'", args.widget_id))
}
