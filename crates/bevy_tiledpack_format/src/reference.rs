//! External references: the boundary between the codec and the host asset system.
//!
//! Images are never embedded in a packed tileset. The encoder asks a
//! [`ReferenceResolver`] for a token standing in for each image path and the
//! decoder hands each token to a [`TextureMaterializer`] to obtain whatever
//! handle the runtime uses. Both are passed in explicitly.

use std::fmt;
use std::path::{Path, PathBuf};

use bevy::log::debug;
use indexmap::IndexMap;
use normalize_path::NormalizePath;

use crate::error::CodecError;

/// Serializable token standing in for an image built by the host.
///
/// Tokens are asset-root-relative paths with forward slashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalReference(String);

impl ExternalReference {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExternalReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode-side capability: turns a logical image path into a reference token.
///
/// Implementations must be idempotent; the encoder may ask for the same path
/// several times within one tileset.
pub trait ReferenceResolver {
    fn resolve(&self, logical_path: &Path) -> Result<ExternalReference, CodecError>;
}

/// Decode-side capability: turns a reference token into a texture handle.
pub trait TextureMaterializer {
    type Texture;

    fn materialize(&mut self, reference: &ExternalReference) -> Result<Self::Texture, CodecError>;
}

/// Materializer that keeps the raw tokens. Used for inspecting packed files
/// without an asset server.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepReferences;

impl TextureMaterializer for KeepReferences {
    type Texture = ExternalReference;

    fn materialize(&mut self, reference: &ExternalReference) -> Result<Self::Texture, CodecError> {
        Ok(reference.clone())
    }
}

/// Build-side record of every image a tileset depends on.
///
/// The importer registers each image path it encounters; only registered paths
/// resolve during encoding. Tokens are computed relative to `root`, which is
/// normally the asset directory the runtime loads from.
#[derive(Debug, Clone, Default)]
pub struct DependencyRegistry {
    root: PathBuf,
    dependencies: IndexMap<PathBuf, ExternalReference>,
}

impl DependencyRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into().normalize(),
            dependencies: IndexMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registers `path` as a build dependency and returns its token.
    ///
    /// Registering the same path twice is a no-op that returns the same token.
    ///
    /// # Errors
    /// [`CodecError::UnresolvedReference`] if the path lies outside the root or
    /// is not valid UTF-8.
    pub fn register(&mut self, path: impl AsRef<Path>) -> Result<ExternalReference, CodecError> {
        let normalized = path.as_ref().normalize();
        if let Some(existing) = self.dependencies.get(&normalized) {
            return Ok(existing.clone());
        }

        let token = self.token_for(&normalized)?;
        debug!("Adding dependency {:?} as {}", normalized, token);
        self.dependencies.insert(normalized, token.clone());
        Ok(token)
    }

    /// Registered paths in registration order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Path> {
        self.dependencies.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    fn token_for(&self, normalized: &Path) -> Result<ExternalReference, CodecError> {
        let relative = normalized
            .strip_prefix(&self.root)
            .map_err(|_| CodecError::UnresolvedReference(normalized.to_path_buf()))?;
        let token = relative
            .to_str()
            .ok_or_else(|| CodecError::UnresolvedReference(normalized.to_path_buf()))?
            .replace('\\', "/");
        let token = token.trim_start_matches('/');
        if token.is_empty() {
            return Err(CodecError::UnresolvedReference(normalized.to_path_buf()));
        }
        Ok(ExternalReference::new(token))
    }
}

impl ReferenceResolver for DependencyRegistry {
    fn resolve(&self, logical_path: &Path) -> Result<ExternalReference, CodecError> {
        self.dependencies
            .get(&logical_path.normalize())
            .cloned()
            .ok_or_else(|| CodecError::UnresolvedReference(logical_path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_makes_token_relative_to_root() {
        let mut registry = DependencyRegistry::new("assets/./");
        assert_eq!(registry.root(), Path::new("assets"));
        let token = registry.register("assets/tilesets/../images/grass.png").unwrap();
        assert_eq!(token.as_str(), "images/grass.png");
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = DependencyRegistry::new("assets");
        let first = registry.register("assets/a.png").unwrap();
        let second = registry.register("assets/./a.png").unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_requires_registration() {
        let mut registry = DependencyRegistry::new("assets");
        registry.register("assets/a.png").unwrap();

        assert_eq!(
            registry.resolve(Path::new("assets/a.png")).unwrap().as_str(),
            "a.png"
        );
        assert!(matches!(
            registry.resolve(Path::new("assets/b.png")),
            Err(CodecError::UnresolvedReference(_))
        ));
    }

    #[test]
    fn test_path_outside_root_is_rejected() {
        let mut registry = DependencyRegistry::new("assets");
        assert!(matches!(
            registry.register("elsewhere/a.png"),
            Err(CodecError::UnresolvedReference(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_empty_root_keeps_relative_paths() {
        let mut registry = DependencyRegistry::new("");
        let token = registry.register("tiles/a.png").unwrap();
        assert_eq!(token.as_str(), "tiles/a.png");
        assert_eq!(
            registry.dependencies().collect::<Vec<_>>(),
            vec![Path::new("tiles/a.png")]
        );
    }
}
