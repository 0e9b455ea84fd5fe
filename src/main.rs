use clap::{Parser, Subcommand};
use sitemenu::builder::ContentPath;
use sitemenu::cache::{COLLECTION_CACHE_KEY, CacheStore};
use sitemenu::config::{self, SiteMenuConfig};
use sitemenu::output;
use sitemenu::render::link_formatter;
use sitemenu::route::{DEFAULT_LANGUAGE, requested_language};
use sitemenu::tree::PageTree;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shared flag for commands that build one language.
#[derive(clap::Args, Clone)]
struct LangArgs {
    /// Language to build; "default" selects files without a language marker
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    lang: String,
}

#[derive(Parser)]
#[command(name = "sitemenu")]
#[command(version)]
#[command(about = "Content index and navigation menus for flat-file sites")]
#[command(long_about = "\
Content index and navigation menus for flat-file sites

Every content file becomes an item with a route. Directories are described
by their index file, numeric prefixes order entries and make them visible
in menus, and language variants sit next to the default file:

  pages/
  ├── 01-index.md              # route \"\" (site root)
  ├── 01-index.en.md           # route \"en\" (English variant)
  ├── 02-about/                # route \"about\", from its index file
  │   ├── 01-index.md
  │   ├── 01-team.md           # route \"about/team\"
  │   └── notes.md             # no prefix = hidden from menus
  └── 03-contact.md            # route \"contact\"

Run 'sitemenu gen-config' to generate a documented config.toml.")]
struct Cli {
    /// Config file; relative paths in it resolve against its directory
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    /// Log cache and scan decisions (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the collection and print it as JSON
    Build {
        #[command(flatten)]
        lang: LangArgs,
        /// Scan without reading or writing the cache
        #[arg(long)]
        no_cache: bool,
        /// Scan these roots instead of the configured ones (never cached)
        #[arg(long = "path", value_name = "ALIAS=DIR")]
        paths: Vec<ContentPath>,
    },
    /// Render the HTML menu
    Menu {
        /// Language to render; resolved from --request when omitted
        #[arg(long)]
        lang: Option<String>,
        /// Request path, e.g. /en/about; marks the current page
        #[arg(long, value_name = "PATH")]
        request: Option<String>,
        /// Include hidden items
        #[arg(long)]
        hidden: bool,
    },
    /// List items and the menu outline
    List(LangArgs),
    /// Remove the stored collection
    ClearCache,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config_file(&cli.config)?;

    match cli.command {
        Command::Build {
            lang,
            no_cache,
            paths,
        } => {
            let mut builder = site_config.collection_builder();
            if no_cache {
                builder.unset_cache();
            }
            let custom = (!paths.is_empty()).then_some(paths.as_slice());
            let collection = builder.build(&lang.lang, custom)?;
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }
        Command::Menu {
            lang,
            request,
            hidden,
        } => {
            let request = request.unwrap_or_default();
            let language = match &lang {
                Some(lang) => lang.as_str(),
                None => requested_language(&request, &site_config.request_languages),
            };
            let collection = site_config.collection_builder().build(language, None)?;
            let tree = PageTree::from_collection(&collection, hidden);

            let current_route = current_route(&request);
            let html = site_config
                .html_tree(link_formatter(&current_route))
                .render(tree.roots());
            println!("{}", html);
        }
        Command::List(lang) => {
            let collection = site_config.collection_builder().build(&lang.lang, None)?;
            output::print_collection(&collection, &lang.lang);
        }
        Command::ClearCache => clear_cache(&site_config)?,
        Command::GenConfig => {}
    }

    Ok(())
}

/// Route of a request path: no query, fragment, or surrounding slashes.
fn current_route(request: &str) -> String {
    request
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_matches('/')
        .to_string()
}

fn clear_cache(site_config: &SiteMenuConfig) -> Result<(), Box<dyn std::error::Error>> {
    match site_config.file_cache() {
        Some(cache) => {
            cache.remove(COLLECTION_CACHE_KEY)?;
            println!("Cleared {}", cache.path_for(COLLECTION_CACHE_KEY).display());
        }
        None => println!("Cache disabled"),
    }
    Ok(())
}
