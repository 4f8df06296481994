pub mod capture;
pub mod cli;
pub mod config;
pub mod distance;
pub mod downsample;
pub mod entity;
pub mod export;
pub mod figure;
pub mod filter;
pub mod glyphs;
pub mod heatmap;
pub mod logging;
pub mod metadata;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod synth;
pub mod tables;
