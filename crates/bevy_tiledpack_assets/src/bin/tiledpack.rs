use std::error::Error as StdError;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use bevy::log::{error, info};
use bevy_tiledpack_assets::compile::{compile_directory, compile_tileset, dump_tileset};
use bevy_tiledpack_assets::config::CompileSettings;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let result = load_settings(&cli).and_then(|settings| match cli.command {
        Commands::Compile { tileset, out } => compile(&settings, tileset, out),
        Commands::CompileDir { dir, out } => compile_dir(&settings, dir, out),
        Commands::Dump { file } => dump(file),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_settings(cli: &Cli) -> Result<CompileSettings, Box<dyn StdError>> {
    let settings = match &cli.settings {
        Some(path) => CompileSettings::from_json_file(path)?,
        None => CompileSettings::default(),
    };
    Ok(match &cli.assets {
        Some(assets) => settings.with_asset_root(assets.clone()),
        None => settings,
    })
}

fn compile(
    settings: &CompileSettings,
    tileset: PathBuf,
    out: PathBuf,
) -> Result<(), Box<dyn StdError>> {
    info!("Compiling {tileset:?} into {out:?}");
    let dependencies = compile_tileset(&tileset, settings, &out)?;
    for dependency in dependencies {
        info!("  depends on {dependency:?}");
    }
    Ok(())
}

fn compile_dir(
    settings: &CompileSettings,
    dir: PathBuf,
    out: PathBuf,
) -> Result<(), Box<dyn StdError>> {
    let written = compile_directory(&dir, settings, &out)?;
    info!("Compiled {} tilesets from {dir:?}", written.len());
    Ok(())
}

fn dump(file: PathBuf) -> Result<(), Box<dyn StdError>> {
    let bytes = fs::read(&file)?;
    let tileset = dump_tileset(&bytes)?;
    info!("{tileset:#?}");
    Ok(())
}

/// Compiles Tiled tilesets into packed `.tspack` files.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The location of the assets directory, overriding the settings file
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,
    /// JSON compile settings
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a single tileset
    Compile {
        /// The tileset to compile
        #[arg(short, long, value_name = "FILE")]
        tileset: PathBuf,
        /// The output file
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Compile every "name.tsx" in a directory into "name.tspack"
    CompileDir {
        /// The directory to read the tilesets from
        #[arg(short, long, value_name = "DIR")]
        dir: PathBuf,
        /// The directory to put the compiled tilesets in
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
    },
    /// Debug-dump a packed tileset
    Dump {
        /// The packed tileset to dump
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
}
