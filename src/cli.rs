use clap::{Parser, Subcommand};
use garmentkit_core::ZoneKey;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "garmentkit")]
#[command(author, version, about = "Place artwork on garment print zones and export print templates", long_about = None)]
#[command(long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
pub struct Cli {
    /// Config file (.toml or .json); defaults to the platform config file
    #[arg(long, global = true, env = "GARMENTKIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Place an image on a print zone and write the template and print job
    Export {
        /// Artwork image (PNG or JPEG)
        #[arg(long)]
        image: PathBuf,

        /// Print zone: front, back, left_arm or right_arm
        #[arg(long, default_value = "front")]
        zone: ZoneKey,

        /// Artwork center, zone-relative (0 = left edge)
        #[arg(long)]
        u: Option<f64>,

        /// Artwork center, zone-relative (0 = top edge)
        #[arg(long)]
        v: Option<f64>,

        /// Printed artwork width in centimetres
        #[arg(long)]
        width_cm: Option<f64>,

        /// Clockwise rotation in degrees
        #[arg(long, allow_hyphen_values = true)]
        rotate_deg: Option<f64>,

        /// Output directory; defaults to the configured one
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Catalog product whose zones to use: tshirt, hoodie or cap
        #[arg(long)]
        product: Option<String>,

        /// Template width in pixels
        #[arg(long)]
        template_px: Option<u32>,

        /// Resolution recorded in the print job
        #[arg(long)]
        dpi: Option<u32>,
    },

    /// Print zone rectangles, poses and HUD text for the demo garment
    Inspect,

    /// Show the effective configuration
    Config {
        /// Write the configuration to this file (.toml or .json)
        #[arg(long)]
        write: Option<PathBuf>,

        /// Print the default config file location and exit
        #[arg(long)]
        path: bool,
    },
}
