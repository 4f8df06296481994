use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to read metadata file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("metadata is not valid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("metadata has no <{0}> element")]
    MissingElement(&'static str),

    #[error("<{element}> is missing attribute {attribute}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<{element}> attribute {attribute}={value:?} is not a number")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("invalid half periods: {0}")]
    InvalidPeriods(String),
}

/// Pitch size in metres. `width` runs along the X (long) axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchDimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingArea {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfPeriod {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub pitch: PitchDimensions,
    pub tracking_area: TrackingArea,
    pub first_half: HalfPeriod,
    pub second_half: HalfPeriod,
}

impl MatchMetadata {
    pub fn halves(&self) -> [HalfPeriod; 2] {
        [self.first_half, self.second_half]
    }
}

pub fn load_metadata(path: &Path) -> Result<MatchMetadata, MetadataError> {
    let raw = fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_metadata(&raw)
}

pub fn parse_metadata(raw: &str) -> Result<MatchMetadata, MetadataError> {
    let doc = roxmltree::Document::parse(raw)?;

    let match_node = doc
        .descendants()
        .find(|node| node.has_tag_name("match"))
        .ok_or(MetadataError::MissingElement("match"))?;

    let pitch = PitchDimensions {
        width: float_attr(match_node, "match", "fPitchXSizeMeters")?,
        height: float_attr(match_node, "match", "fPitchYSizeMeters")?,
    };
    let tracking_area = TrackingArea {
        width: float_attr(match_node, "match", "fTrackingAreaXSizeMeters")?,
        height: float_attr(match_node, "match", "fTrackingAreaYSizeMeters")?,
    };

    // Only the first two periods are halves; extra-time periods are ignored.
    let mut periods = doc.descendants().filter(|node| node.has_tag_name("period"));
    let first = periods.next().ok_or(MetadataError::MissingElement("period"))?;
    let second = periods.next().ok_or(MetadataError::MissingElement("period"))?;

    let first_half = half_period(first)?;
    let second_half = half_period(second)?;

    if first_half.end > second_half.start && second_half.end > first_half.start {
        return Err(MetadataError::InvalidPeriods(format!(
            "halves overlap ({}..{} and {}..{})",
            first_half.start, first_half.end, second_half.start, second_half.end
        )));
    }

    Ok(MatchMetadata {
        pitch,
        tracking_area,
        first_half,
        second_half,
    })
}

fn half_period(node: roxmltree::Node<'_, '_>) -> Result<HalfPeriod, MetadataError> {
    let start = int_attr(node, "period", "iStartFrame")?;
    let end = int_attr(node, "period", "iEndFrame")?;
    if start >= end {
        return Err(MetadataError::InvalidPeriods(format!(
            "start frame {start} is not before end frame {end}"
        )));
    }
    Ok(HalfPeriod { start, end })
}

fn attr<'a>(
    node: roxmltree::Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, MetadataError> {
    node.attribute(attribute)
        .ok_or(MetadataError::MissingAttribute { element, attribute })
}

fn float_attr(
    node: roxmltree::Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<f64, MetadataError> {
    let value = attr(node, element, attribute)?;
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| MetadataError::InvalidAttribute {
            element,
            attribute,
            value: value.to_string(),
        })
}

fn int_attr(
    node: roxmltree::Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<u64, MetadataError> {
    let value = attr(node, element, attribute)?;
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| MetadataError::InvalidAttribute {
            element,
            attribute,
            value: value.to_string(),
        })
}
