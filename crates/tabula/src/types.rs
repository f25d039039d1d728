use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Determines how to fill paths with self-intersections.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// How to stroke a path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StrokeSettings {
    /// Width of the path to stroke
    pub width: f32,
    /// How to cap the ends of open subpaths
    pub line_cap: LineCap,
    /// How to join segments together
    pub line_join: LineJoin,
    /// Ratio of miter length to line width above which
    /// a miter join falls back to a bevel
    pub miter_limit: f32,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            width: 1.,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.,
        }
    }
}

/// A Porter-Duff operator that combines newly drawn
/// content (the source) with the surface (the destination).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
}

impl CompositeOperation {
    pub const ALL: [CompositeOperation; 11] = [
        CompositeOperation::SourceOver,
        CompositeOperation::SourceIn,
        CompositeOperation::SourceOut,
        CompositeOperation::SourceAtop,
        CompositeOperation::DestinationOver,
        CompositeOperation::DestinationIn,
        CompositeOperation::DestinationOut,
        CompositeOperation::DestinationAtop,
        CompositeOperation::Lighter,
        CompositeOperation::Copy,
        CompositeOperation::Xor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeOperation::SourceOver => "source-over",
            CompositeOperation::SourceIn => "source-in",
            CompositeOperation::SourceOut => "source-out",
            CompositeOperation::SourceAtop => "source-atop",
            CompositeOperation::DestinationOver => "destination-over",
            CompositeOperation::DestinationIn => "destination-in",
            CompositeOperation::DestinationOut => "destination-out",
            CompositeOperation::DestinationAtop => "destination-atop",
            CompositeOperation::Lighter => "lighter",
            CompositeOperation::Copy => "copy",
            CompositeOperation::Xor => "xor",
        }
    }

    /// Whether a fully transparent source leaves the destination untouched.
    ///
    /// Unbounded operations must also be applied to the pixels
    /// outside the drawn shape.
    pub fn is_bounded(&self) -> bool {
        !matches!(
            self,
            CompositeOperation::SourceIn
                | CompositeOperation::SourceOut
                | CompositeOperation::DestinationIn
                | CompositeOperation::DestinationAtop
                | CompositeOperation::Copy
        )
    }

    /// Combines a premultiplied source and destination pixel.
    pub fn blend(&self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        let (sa, da) = (src[3], dst[3]);
        let (fa, fb) = match self {
            CompositeOperation::SourceOver => (1., 1. - sa),
            CompositeOperation::SourceIn => (da, 0.),
            CompositeOperation::SourceOut => (1. - da, 0.),
            CompositeOperation::SourceAtop => (da, 1. - sa),
            CompositeOperation::DestinationOver => (1. - da, 1.),
            CompositeOperation::DestinationIn => (0., sa),
            CompositeOperation::DestinationOut => (0., 1. - sa),
            CompositeOperation::DestinationAtop => (1. - da, sa),
            CompositeOperation::Lighter => (1., 1.),
            CompositeOperation::Copy => (1., 0.),
            CompositeOperation::Xor => (1. - da, 1. - sa),
        };
        let mut out = [0.; 4];
        for i in 0..4 {
            out[i] = (src[i] * fa + dst[i] * fb).clamp(0., 1.);
        }
        // Keep the result a valid premultiplied color after clamping.
        for i in 0..3 {
            out[i] = out[i].min(out[3]);
        }
        out
    }
}

impl Display for CompositeOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unrecognized style keyword.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownKeyword {
    kind: &'static str,
    value: String,
}

impl FromStr for CompositeOperation {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompositeOperation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownKeyword {
                kind: "composite operation",
                value: s.to_owned(),
            })
    }
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

impl FromStr for LineCap {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "square" => Ok(LineCap::Square),
            _ => Err(UnknownKeyword {
                kind: "line cap",
                value: s.to_owned(),
            }),
        }
    }
}

impl LineJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

impl FromStr for LineJoin {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miter" => Ok(LineJoin::Miter),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            _ => Err(UnknownKeyword {
                kind: "line join",
                value: s.to_owned(),
            }),
        }
    }
}

impl Display for LineCap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for LineJoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
