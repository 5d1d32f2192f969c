mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use garmentkit::commands::{export_artwork, inspect_report, load_config, with_product, PlacementOverrides};
use garmentkit::{init_logging, Config};
use tracing::warn;

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            image,
            zone,
            u,
            v,
            width_cm,
            rotate_deg,
            out,
            product,
            template_px,
            dpi,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(product) = product {
                config = with_product(&config, &product)?;
            }
            let mut options = config.export_options();
            if let Some(px) = template_px {
                options.template_px = px;
            }
            if let Some(dpi) = dpi {
                options.dpi = dpi;
            }
            let out = out.unwrap_or_else(|| config.export.output_directory.clone());
            let bytes = std::fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            let overrides = PlacementOverrides {
                u,
                v,
                width_cm,
                rotate_deg,
            };

            let report = export_artwork(&config, &bytes, zone, overrides, &out, &options)?;
            if let Some(warning) = &report.warning {
                warn!("{}", warning);
            }
            println!("{}", report.png_path.display());
            println!("{}", report.json_path.display());
        }
        Commands::Inspect => {
            let config = load_config(cli.config.as_deref())?;
            print!("{}", inspect_report(&config)?);
        }
        Commands::Config { write, path } => {
            if path {
                println!("{}", Config::default_path()?.display());
                return Ok(());
            }
            let config = load_config(cli.config.as_deref())?;
            match write {
                Some(target) => {
                    config.save_to_file(&target)?;
                    println!("{}", target.display());
                }
                None => print!("{}", toml::to_string_pretty(&config)?),
            }
        }
    }

    Ok(())
}
