use banner_mosaic::catalog::SizeKey;
use banner_mosaic::compose::{MosaicComposer, process_image, publish};
use banner_mosaic::imaging::{RustBackend, create_thumbnail, format_asset};
use banner_mosaic::metadata::bannerset_prefix;
use banner_mosaic::store::{FsStore, ObjectStore};
use banner_mosaic::{config, output, placeholder};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "banner-mosaic")]
#[command(about = "Compose an advertising banner set into a preview mosaic")]
#[command(long_about = "\
Compose an advertising banner set into a preview mosaic

A banner set is one creative uploaded once per canonical size. Each member
carries two metadata fields:

  sizes      comma-separated size keys the set is expected to contain
  validsize  the size key of this particular upload

Members live next to each other in a container:

  campaigns/
  ├── spring-halfPage-bannerset              # new upload
  ├── spring-halfPage-bannerset.meta.json    # {\"sizes\": \"halfPage,wideSkyscraper\", \"validsize\": \"halfPage\"}
  └── spring-wideSkyscraper                  # earlier member, already promoted

Members arrive as {prefix}-{sizeKey}-bannerset. Composing an upload places
every size on a 960x884 canvas, fills sizes not in the set with placeholders,
and writes {prefix}-thumbnail (640 wide by default) back into the container.
The upload is then moved to {prefix}-{sizeKey} so later members of the set
find it. Uploads without set metadata are simply downscaled.

Run 'banner-mosaic sizes' to list the canvas layout.
Run 'banner-mosaic gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the thumbnail for an uploaded object and store it
    Compose {
        /// Root directory of the filesystem object store
        #[arg(long)]
        store: PathBuf,
        /// Container (bucket) holding the upload and its siblings
        #[arg(long)]
        container: String,
        /// Key of the uploaded object
        #[arg(long)]
        key: String,
        /// Set prefix; derived from the key when omitted
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Downscale a single image file to the thumbnail width
    Thumbnail { input: PathBuf, output: PathBuf },
    /// Write the canvas layer of a size's placeholder as PNG
    Placeholder { key: SizeKey, output: PathBuf },
    /// Print the canonical sizes and their canvas positions
    Sizes,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Compose {
            store,
            container,
            key,
            prefix,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            init_thread_pool(&config.processing);

            let store = FsStore::new(store);
            let upload = store.get(&container, &key)?;
            let prefix = prefix.unwrap_or_else(|| bannerset_prefix(&key).to_string());

            let backend = RustBackend::new();
            let composer = MosaicComposer::new(&backend, &store, config.sharpening());
            let thumbnail = process_image(
                &composer,
                &config.thumbnail_config(),
                &upload.body,
                &container,
                &prefix,
                &upload.metadata,
            )?;

            let published = publish(&store, &container, &key, &prefix, upload, &thumbnail)?;
            output::print_thumbnail_output(&published, &thumbnail);
        }
        Command::Thumbnail { input, output } => {
            let config = config::load_config(&cli.config_dir)?;
            let data = std::fs::read(&input)?;
            let thumb = create_thumbnail(&RustBackend::new(), &data, &config.thumbnail_config())?;
            std::fs::write(&output, &thumb.png)?;
            println!(
                "{} → {} ({}x{})",
                input.display(),
                output.display(),
                thumb.width,
                thumb.height
            );
        }
        Command::Placeholder { key, output } => {
            let config = config::load_config(&cli.config_dir)?;
            let layer = format_asset(
                &RustBackend::new(),
                placeholder::placeholder(key),
                key,
                config.sharpening(),
            )?;
            std::fs::write(&output, layer.to_png()?)?;
            println!("{} → {}", key, output.display());
        }
        Command::Sizes => {
            output::print_sizes_output();
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
