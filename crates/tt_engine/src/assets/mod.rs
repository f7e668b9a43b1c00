//! Asset loading seam
//!
//! Textures and fonts are looked up by name. Providers only need to know an
//! asset's size and hand out a handle; decoding pixels is the draw backend's
//! business. Field maps are the exception: their pixels say where a sprite
//! field places its sprites, so they are decoded here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::foundation::math::Color;
use crate::render::{FontHandle, Texture, TextureHandle, TextureSource};

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The file exists but could not be decoded
    #[error("Corrupt asset {path}: {source}")]
    Corrupt {
        /// File that failed to decode
        path: PathBuf,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },

    /// IO error during asset loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Grid of cells, each either empty or holding a tint
///
/// Decoded from an image: every pixel with a non-zero alpha is an occupied
/// cell tinted with the pixel's color.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap {
    width: u32,
    height: u32,
    cells: Vec<Option<Color>>,
}

impl FieldMap {
    /// Create an empty field
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize) * (height as usize)],
        }
    }

    /// Build a field from text rows, `.` and ` ` being empty cells
    ///
    /// Rows shorter than the longest one are padded with empty cells.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_rows(rows: &[&str], tint: Color) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut field = Self::new(width as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, cell) in row.chars().enumerate() {
                if cell != '.' && cell != ' ' {
                    field.set(x as u32, y as u32, Some(tint));
                }
            }
        }
        field
    }

    /// Decode an RGBA image
    pub fn from_image(image: &image::RgbaImage) -> Self {
        let mut field = Self::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            if a > 0 {
                let channel = |v: u8| f32::from(v) / 255.0;
                field.set(x, y, Some(Color::rgba(channel(r), channel(g), channel(b), channel(a))));
            }
        }
        field
    }

    /// Cells per row
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Rows
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tint of a cell, `None` when empty or outside the field
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).and_then(|index| self.cells[index])
    }

    /// Fill or empty a cell; cells outside the field are ignored
    pub fn set(&mut self, x: u32, y: u32, cell: Option<Color>) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = cell;
        }
    }

    /// Occupied cells in row order
    pub fn occupied(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().filter_map(move |(index, cell)| {
            #[allow(clippy::cast_possible_truncation)]
            cell.map(|tint| ((index % width) as u32, (index / width) as u32, tint))
        })
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y as usize) * (self.width as usize) + x as usize)
    }
}

/// Source of textures, fonts and field maps
pub trait AssetProvider {
    /// Load a texture by name
    fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError>;

    /// Load a font by name
    fn load_font(&mut self, name: &str) -> Result<FontHandle, AssetError>;

    /// Load a field map by name
    fn load_field(&mut self, name: &str) -> Result<FieldMap, AssetError> {
        Err(AssetError::NotFound(name.to_string()))
    }
}

/// Loads assets from a content directory
///
/// Texture names may omit the `.png` extension. Loaded assets are cached by
/// name, so loading the same name twice returns the same handle.
#[derive(Debug)]
pub struct FileAssetProvider {
    root: PathBuf,
    textures: HashMap<String, Texture>,
    fonts: HashMap<String, FontHandle>,
    next_handle: u32,
}

impl FileAssetProvider {
    /// Create a provider reading from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: HashMap::new(),
            fonts: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Content directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str, default_extension: &str) -> Result<PathBuf, AssetError> {
        let path = self.root.join(name);
        if path.is_file() {
            return Ok(path);
        }
        let with_extension = path.with_extension(default_extension);
        if path.extension().is_none() && with_extension.is_file() {
            return Ok(with_extension);
        }
        Err(AssetError::NotFound(path.display().to_string()))
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl AssetProvider for FileAssetProvider {
    fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        if let Some(texture) = self.textures.get(name) {
            return Ok(*texture);
        }

        let path = self.resolve(name, "png")?;
        let (width, height) = image::image_dimensions(&path).map_err(|e| match e {
            image::ImageError::IoError(io) => AssetError::Io(io),
            other => AssetError::Corrupt {
                path: path.clone(),
                source: other,
            },
        })?;

        let texture = Texture::new(TextureSource::Asset(TextureHandle(self.next_handle())), width, height);
        log::debug!("Loaded texture {name} ({width}x{height}) from {}", path.display());
        self.textures.insert(name.to_string(), texture);
        Ok(texture)
    }

    fn load_font(&mut self, name: &str) -> Result<FontHandle, AssetError> {
        if let Some(font) = self.fonts.get(name) {
            return Ok(*font);
        }

        let path = self.resolve(name, "ttf")?;
        let font = FontHandle(self.next_handle());
        log::debug!("Loaded font {name} from {}", path.display());
        self.fonts.insert(name.to_string(), font);
        Ok(font)
    }

    fn load_field(&mut self, name: &str) -> Result<FieldMap, AssetError> {
        let path = self.resolve(name, "png")?;
        let image = image::open(&path).map_err(|e| match e {
            image::ImageError::IoError(io) => AssetError::Io(io),
            other => AssetError::Corrupt {
                path: path.clone(),
                source: other,
            },
        })?;
        let field = FieldMap::from_image(&image.to_rgba8());
        log::debug!("Loaded {}x{} field {name} from {}", field.width(), field.height(), path.display());
        Ok(field)
    }
}

/// Serves assets registered up front, for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryAssetProvider {
    textures: HashMap<String, (u32, u32)>,
    fonts: Vec<String>,
    fields: HashMap<String, FieldMap>,
}

impl MemoryAssetProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture of the given pixel size
    #[must_use]
    pub fn with_texture(mut self, name: impl Into<String>, width: u32, height: u32) -> Self {
        self.textures.insert(name.into(), (width, height));
        self
    }

    /// Register a font
    #[must_use]
    pub fn with_font(mut self, name: impl Into<String>) -> Self {
        self.fonts.push(name.into());
        self
    }

    /// Register a field map
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, field: FieldMap) -> Self {
        self.fields.insert(name.into(), field);
        self
    }
}

impl AssetProvider for MemoryAssetProvider {
    fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        let mut names: Vec<&String> = self.textures.keys().collect();
        names.sort();
        let index = names
            .iter()
            .position(|n| n.as_str() == name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?;
        let (width, height) = self.textures[name];
        #[allow(clippy::cast_possible_truncation)]
        let handle = TextureHandle(index as u32 + 1);
        Ok(Texture::new(TextureSource::Asset(handle), width, height))
    }

    fn load_font(&mut self, name: &str) -> Result<FontHandle, AssetError> {
        let index = self
            .fonts
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?;
        #[allow(clippy::cast_possible_truncation)]
        let handle = FontHandle(index as u32 + 1);
        Ok(handle)
    }

    fn load_field(&mut self, name: &str) -> Result<FieldMap, AssetError> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_content_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tt_engine_assets_{test}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_file_provider_reads_png_size() {
        let dir = temp_content_dir("size");
        image::RgbaImage::new(8, 4).save(dir.join("ball.png")).unwrap();

        let mut assets = FileAssetProvider::new(&dir);
        let texture = assets.load_texture("ball").unwrap();
        assert_eq!((texture.width, texture.height), (8, 4));
        assert_eq!(assets.load_texture("ball").unwrap(), texture);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_file_provider_reports_missing_and_corrupt() {
        let dir = temp_content_dir("errors");
        std::fs::write(dir.join("broken.png"), b"not a png").unwrap();

        let mut assets = FileAssetProvider::new(&dir);
        assert!(matches!(assets.load_texture("missing"), Err(AssetError::NotFound(_))));
        assert!(matches!(assets.load_texture("broken.png"), Err(AssetError::Corrupt { .. })));
        assert!(matches!(assets.load_font("nofont"), Err(AssetError::NotFound(_))));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_file_provider_decodes_field_alpha() {
        let dir = temp_content_dir("field");
        let mut pixels = image::RgbaImage::new(3, 2);
        pixels.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        pixels.put_pixel(2, 1, image::Rgba([0, 0, 255, 255]));
        pixels.save(dir.join("level.png")).unwrap();

        let mut assets = FileAssetProvider::new(&dir);
        let field = assets.load_field("level").unwrap();
        assert_eq!((field.width(), field.height()), (3, 2));
        assert_eq!(field.get(0, 0), Some(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(field.get(1, 0), None);
        assert_eq!(field.occupied().map(|(x, y, _)| (x, y)).collect::<Vec<_>>(), vec![(0, 0), (2, 1)]);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_field_from_rows_pads_short_rows() {
        let field = FieldMap::from_rows(&["#.#", "#"], Color::WHITE);
        assert_eq!((field.width(), field.height()), (3, 2));
        assert_eq!(field.occupied().count(), 3);
        assert_eq!(field.get(1, 1), None);
        assert_eq!(field.get(7, 7), None);
    }

    #[test]
    fn test_memory_provider() {
        let mut assets = MemoryAssetProvider::new().with_texture("ball", 32, 32).with_font("default");
        assert_eq!(assets.load_texture("ball").unwrap().width, 32);
        assert_eq!(assets.load_font("default").unwrap(), FontHandle(1));
        assert!(assets.load_texture("paddle").is_err());
        assert!(matches!(assets.load_field("level"), Err(AssetError::NotFound(_))));
    }
}
