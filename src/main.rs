//! Command-line surface for batch, non-interactive exports.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;

use iconify_downloader::{
    ExportFormat, ExportOptions, Exporter, IconId, IconifyClient, ProgressEvent, generate_provider,
};

#[derive(Debug, Parser)]
#[command(
    name = "iconify-downloader",
    version,
    about = "Download icons from Iconify in SVG or JSON format."
)]
struct Cli {
    /// Icon identifiers (e.g. "logos:react skill-icons:javascript")
    #[arg(short, long, num_args = 1.., value_name = "ICON")]
    icons: Vec<String>,

    /// Download every icon of one collection (e.g. "mdi")
    #[arg(long, value_name = "PREFIX")]
    collection: Option<String>,

    /// Output directory (defaults: svg -> ./icons, json -> ./collections)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Output format: svg | json
    #[arg(short, long, default_value = "svg", value_name = "FORMAT")]
    format: ExportFormat,

    /// Nest output under this subfolder of the output directory
    #[arg(long, value_name = "NAME")]
    subfolder: Option<String>,

    /// Group SVG files into one folder per prefix
    #[arg(long)]
    organize_by_prefix: bool,

    /// Apply a foreground color to downloaded SVGs (SVG format only)
    #[arg(long, value_name = "CSS_COLOR")]
    color: Option<String>,

    /// With --color, rewrite all fills/strokes to inherit it
    #[arg(long)]
    monochrome: bool,

    /// Bundle the exported files into one zip archive
    #[arg(long)]
    zip: bool,

    /// Base name of the archive (implies --zip)
    #[arg(long, value_name = "NAME")]
    zip_name: Option<String>,

    /// Generate an IconProvider registering the JSON collections found in
    /// the output directory (optional value: where to write the provider,
    /// defaults to the current directory)
    #[arg(short, long, value_name = "DIR", num_args = 0..=1, default_missing_value = ".")]
    generate: Option<PathBuf>,

    /// With --generate, emit a typed IconProvider.tsx instead of .jsx
    #[arg(short = 't', long)]
    use_typescript: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.icons.is_empty() && cli.collection.is_none() && cli.generate.is_none() {
        return Err("--icons, --collection or --generate is required".into());
    }

    let client = IconifyClient::new();

    let mut icons = cli
        .icons
        .iter()
        .map(|raw| IconId::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(prefix) = &cli.collection {
        let listing = client.collection(prefix)?;
        info!("collection {prefix} lists {} icons", listing.total);
        icons.extend(listing.icon_ids());
    }

    if !icons.is_empty() {
        let output_dir = cli.output.clone().unwrap_or_else(|| match cli.format {
            ExportFormat::Svg => PathBuf::from("./icons"),
            ExportFormat::Json => PathBuf::from("./collections"),
        });
        let options = ExportOptions {
            subfolder: cli.subfolder.clone(),
            organize_by_prefix: cli.organize_by_prefix,
            apply_color: cli.color.is_some(),
            color: cli.color.clone(),
            force_monochrome: cli.monochrome,
            zip_enabled: cli.zip || cli.zip_name.is_some(),
            zip_name: cli.zip_name.clone(),
        };

        let exporter = Exporter::new(client);
        let written = match cli.format {
            ExportFormat::Svg => {
                exporter.export_svgs(&icons, &output_dir, &options, print_progress)?
            }
            ExportFormat::Json => {
                exporter.export_collections(&icons, &output_dir, &options, print_progress)?
            }
        };
        for path in &written {
            println!("{}", path.display());
        }
    }

    if let Some(gen_dir) = &cli.generate {
        let icon_dir = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("./collections"));
        let path = generate_provider(&icon_dir, gen_dir, cli.use_typescript)?;
        println!("{}", path.display());
    }

    Ok(())
}

fn print_progress(event: ProgressEvent<'_>) {
    match event {
        ProgressEvent::Start { format, total } => {
            eprintln!("downloading {total} icons ({format})");
        }
        ProgressEvent::Icon {
            current,
            total,
            icon,
        } => {
            eprintln!("[{current}/{total}] {icon}");
        }
        ProgressEvent::Done { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_export_invocation() {
        let cli = Cli::try_parse_from([
            "iconify-downloader",
            "--icons",
            "mdi:home",
            "mdi:account",
            "--format",
            "json",
            "--zip-name",
            "My Set",
        ])
        .unwrap();
        assert_eq!(cli.icons, ["mdi:home", "mdi:account"]);
        assert_eq!(cli.format, ExportFormat::Json);
        assert_eq!(cli.zip_name.as_deref(), Some("My Set"));
        assert!(cli.generate.is_none());
    }

    #[test]
    fn generate_flag_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["iconify-downloader", "--generate"]).unwrap();
        assert_eq!(cli.generate, Some(PathBuf::from(".")));

        let cli =
            Cli::try_parse_from(["iconify-downloader", "--generate", "src/generated"]).unwrap();
        assert_eq!(cli.generate, Some(PathBuf::from("src/generated")));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["iconify-downloader", "-f", "png"]).is_err());
    }
}
