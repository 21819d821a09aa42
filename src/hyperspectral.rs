//! Hyperspectral transcoding module
//!
//! This module provides the mosaic model, the cube geometry and frame binding,
//! the encode/decode/reduce transforms, and the downstream export sinks.

pub mod common;
pub mod mosaic;
pub mod cube;
pub mod transform;
pub mod export;
pub mod raw;
pub mod tiff;
pub mod conversions;

pub use common::{
    HyperspectralError,
    Result,
};

pub use mosaic::{
    DefaultMosaic,
    Mosaic,
    TiledMosaic,
    WavelengthId,
};

pub use cube::{
    CubeDeclaration,
    CubeDescriptor,
    CubeFrame,
    CubeFrameMut,
    Layout,
    SampleFormat,
};

pub use transform::{
    BayerOrder,
    Decoder,
    Encoder,
    NavigationEvent,
    PlaneMut,
    RasterImage,
    Reducer,
    Selection,
    SourceFormat,
    SourceInfo,
};

pub use export::{
    BandBundleWriter,
    BandImageFormat,
    CsvWriter,
    CubeSink,
    ExportFormat,
    FileSink,
    RawDumpWriter,
    XmlWriter,
};

pub use raw::{
    RawImageData,
    RawImageReader,
    RawLoaderReader,
};

pub use tiff::{
    TiffCompression,
    TranscodeConfig,
    TranscodeConfigBuilder,
    MosaicSource,
};

pub use conversions::RawToCubePipeline;
