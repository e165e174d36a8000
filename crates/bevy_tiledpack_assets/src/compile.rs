//! Build-time compilation of `.tsx` tilesets into packed files.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::log::info;
use bevy_tiledpack_format::{
    CodecError, DependencyRegistry, ExternalReference, KeepReferences, Tileset, decode_tileset,
    encode_tileset,
};

use crate::config::CompileSettings;
use crate::import::{ImportError, import_tileset};

/// Compile one tileset into `out`.
///
/// Parent directories of `out` are created as needed.
///
/// # Returns
/// The image files the compiled tileset depends on, in registration order.
pub fn compile_tileset(
    tileset: impl AsRef<Path>,
    settings: &CompileSettings,
    out: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, ImportError> {
    let out = out.as_ref();
    let mut registry = DependencyRegistry::new(settings.asset_root.clone());
    let imported = import_tileset(tileset, settings, &mut registry)?;
    let bytes = encode_tileset(&imported, &registry)?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(out, &bytes)?;
    info!(
        "Wrote {:?} ({} bytes, images relative to {:?})",
        out,
        bytes.len(),
        registry.root()
    );

    Ok(registry.dependencies().map(Path::to_path_buf).collect())
}

/// Compile every `.tsx` file directly inside `dir` into `out_dir`.
///
/// Each `name.tsx` becomes `name.<output_extension>`.
///
/// # Returns
/// Paths of the files written.
pub fn compile_directory(
    dir: impl AsRef<Path>,
    settings: &CompileSettings,
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, ImportError> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "tsx") {
            sources.push(path);
        }
    }
    sources.sort();

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let mut out = out_dir.as_ref().join(name);
        out.set_extension(&settings.output_extension);
        compile_tileset(&source, settings, &out)?;
        written.push(out);
    }
    Ok(written)
}

/// Decode a packed tileset without an asset server, keeping the raw reference
/// tokens in place of textures.
pub fn dump_tileset(bytes: &[u8]) -> Result<Tileset<ExternalReference>, CodecError> {
    decode_tileset(bytes, &mut KeepReferences)
}
