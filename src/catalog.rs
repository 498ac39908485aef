//! The point-stream datasets of a chart, each loaded from its resource at most once.
//!
//! A [`Catalog`] is created once at startup and shared by reference with every overlay.
//! Datasets are decoded lazily on first access. When a resource is missing or corrupt
//! the error is logged a single time and the dataset stays empty, so its overlay simply
//! never appears.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use log::{info, warn};

use crate::error::LoadError;
use crate::stream::{PointStream, SectionLayout};

/// The datasets stored as point streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Constellation boundary polylines.
    ConstellationBoundaries,
    /// Constellation figure lines.
    ConstellationLines,
    /// Milky Way patches, each around a center point.
    MilkyWay,
}

impl Dataset {
    /// Every dataset, in resource order.
    pub const ALL: [Dataset; 3] = [
        Dataset::ConstellationBoundaries,
        Dataset::ConstellationLines,
        Dataset::MilkyWay,
    ];

    /// Name of the binary resource holding the dataset.
    pub fn resource_name(self) -> &'static str {
        match self {
            Dataset::ConstellationBoundaries => "conbounds.bin",
            Dataset::ConstellationLines => "conlines.bin",
            Dataset::MilkyWay => "milkyway.bin",
        }
    }

    /// How the sections of the dataset are laid out.
    pub fn layout(self) -> SectionLayout {
        match self {
            Dataset::MilkyWay => SectionLayout::Centered,
            _ => SectionLayout::Plain,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Provides the bytes of named resources.
pub trait ResourceSource: Send + Sync {
    /// Read the whole resource named `name`.
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Resources stored as files in a directory.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Source reading files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceSource for DirSource {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(name))
    }
}

impl ResourceSource for HashMap<String, Vec<u8>> {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no resource named {name}"))
        })
    }
}

/// Registry of the loaded datasets.
pub struct Catalog {
    source: Box<dyn ResourceSource>,
    streams: [OnceLock<PointStream>; 3],
}

impl Catalog {
    /// Catalog reading its resources from `source`. Nothing is loaded yet.
    pub fn new<R: ResourceSource + 'static>(source: R) -> Self {
        Self {
            source: Box::new(source),
            streams: Default::default(),
        }
    }

    /// Catalog reading its resources from files in `root`.
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self::new(DirSource::new(root))
    }

    /// The stream of `dataset`, decoding it on first access.
    ///
    /// Concurrent first calls decode once; the others wait for the result.
    pub fn stream(&self, dataset: Dataset) -> &PointStream {
        self.streams[dataset.index()].get_or_init(|| self.load(dataset))
    }

    /// Whether `dataset` has been loaded (successfully or not).
    pub fn is_loaded(&self, dataset: Dataset) -> bool {
        self.streams[dataset.index()].get().is_some()
    }

    /// Load every dataset now.
    pub fn preload(&self) {
        for dataset in Dataset::ALL {
            self.stream(dataset);
        }
    }

    fn load(&self, dataset: Dataset) -> PointStream {
        let name = dataset.resource_name();
        let decoded = self
            .source
            .read(name)
            .map_err(LoadError::from)
            .and_then(|bytes| PointStream::from_bytes(&bytes, dataset.layout()));

        match decoded {
            Ok(stream) => {
                info!(
                    "Loaded {:?}: {} points in {} sections.",
                    dataset,
                    stream.point_count(),
                    stream.section_count()
                );
                stream
            }
            Err(err) => {
                warn!("Failed to load {name}, {dataset:?} will not be drawn: {err}");
                PointStream::empty()
            }
        }
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    use rayon::prelude::*;

    use super::*;

    impl Catalog {
        /// Load every dataset now, in parallel.
        pub fn preload_par(&self) {
            Dataset::ALL.par_iter().for_each(|dataset| {
                self.stream(*dataset);
            });
        }
    }
}
