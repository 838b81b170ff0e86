//! Atlas loading seam
//!
//! Texture decoding and upload belong to the host; the session only needs
//! an opaque handle and a guarantee that the atlas exists.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Opaque reference to a loaded texture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureHandle {
    id: u32,
    path: PathBuf,
    byte_len: usize,
}

impl TextureHandle {
    pub fn new(id: u32, path: impl Into<PathBuf>, byte_len: usize) -> Self {
        Self {
            id,
            path: path.into(),
            byte_len,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

/// Something that can hand the session its sprite atlas
pub trait AtlasSource {
    fn load_atlas(&mut self, path: &Path) -> Result<TextureHandle, AssetError>;
}

/// Reads the atlas from disk and checks it is non-empty
#[derive(Debug, Default)]
pub struct FsAtlasSource {
    next_id: u32,
}

impl FsAtlasSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AtlasSource for FsAtlasSource {
    fn load_atlas(&mut self, path: &Path) -> Result<TextureHandle, AssetError> {
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => AssetError::Missing {
                path: path.to_path_buf(),
            },
            _ => AssetError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        if bytes.is_empty() {
            return Err(AssetError::Empty {
                path: path.to_path_buf(),
            });
        }
        self.next_id += 1;
        Ok(TextureHandle::new(self.next_id, path, bytes.len()))
    }
}

/// Atlas already resident in the host (or absent, for failure paths)
#[derive(Debug, Clone, Default)]
pub struct PreloadedAtlas {
    handle: Option<TextureHandle>,
}

impl PreloadedAtlas {
    pub fn new(handle: TextureHandle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// A source whose atlas never loads
    pub fn missing() -> Self {
        Self { handle: None }
    }
}

impl AtlasSource for PreloadedAtlas {
    fn load_atlas(&mut self, path: &Path) -> Result<TextureHandle, AssetError> {
        self.handle.clone().ok_or_else(|| AssetError::Missing {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_source_missing_file() {
        let mut source = FsAtlasSource::new();
        let result = source.load_atlas(Path::new("/nonexistent/arcade_atlas.png"));
        assert!(matches!(result, Err(AssetError::Missing { .. })));
    }

    #[test]
    fn test_fs_source_reads_file() {
        let path = std::env::temp_dir().join("lightgun_arcade_atlas_test.bin");
        fs::write(&path, [1u8, 2, 3]).unwrap();
        let mut source = FsAtlasSource::new();
        let handle = source.load_atlas(&path).unwrap();
        assert_eq!(handle.byte_len(), 3);
        assert_eq!(handle.id(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_fs_source_empty_file() {
        let path = std::env::temp_dir().join("lightgun_arcade_atlas_empty.bin");
        fs::write(&path, b"").unwrap();
        let result = FsAtlasSource::new().load_atlas(&path);
        assert!(matches!(result, Err(AssetError::Empty { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_preloaded_source() {
        let handle = TextureHandle::new(3, "atlas.png", 10);
        let mut source = PreloadedAtlas::new(handle.clone());
        assert_eq!(source.load_atlas(Path::new("ignored")).unwrap(), handle);
        assert!(PreloadedAtlas::missing().load_atlas(Path::new("x")).is_err());
    }
}
