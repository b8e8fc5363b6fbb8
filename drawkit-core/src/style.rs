//! Fill and stroke pass selection.

use serde::{Deserialize, Serialize};

/// How a single fill or stroke pass is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "pass", content = "color")]
pub enum StylePass {
    /// Do not perform the pass.
    #[default]
    Skip,
    /// Perform the pass with the style currently active on the surface.
    UseCurrent,
    /// Perform the pass with this color, restoring the previous style afterwards.
    Explicit(String),
}

impl StylePass {
    /// Explicit color pass.
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self::Explicit(color.into())
    }

    /// Whether the pass draws anything.
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        !matches!(self, Self::Skip)
    }

    /// The explicit color, if any.
    #[must_use]
    pub fn as_color(&self) -> Option<&str> {
        match self {
            Self::Explicit(color) => Some(color),
            _ => None,
        }
    }
}

impl From<&str> for StylePass {
    fn from(color: &str) -> Self {
        Self::Explicit(color.to_string())
    }
}

impl From<String> for StylePass {
    fn from(color: String) -> Self {
        Self::Explicit(color)
    }
}

impl<T: Into<StylePass>> From<Option<T>> for StylePass {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Skip, Into::into)
    }
}

/// Fill styles for the faces of a cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaceStyles {
    /// Every face uses the same pass.
    Uniform(StylePass),
    /// One pass per face, in face order. Missing faces are skipped.
    PerFace(Vec<StylePass>),
}

impl FaceStyles {
    /// Pass for the face at `index`.
    #[must_use]
    pub fn for_face(&self, index: usize) -> StylePass {
        match self {
            Self::Uniform(pass) => pass.clone(),
            Self::PerFace(passes) => passes.get(index).cloned().unwrap_or_default(),
        }
    }
}

impl Default for FaceStyles {
    fn default() -> Self {
        Self::Uniform(StylePass::Skip)
    }
}

impl From<StylePass> for FaceStyles {
    fn from(pass: StylePass) -> Self {
        Self::Uniform(pass)
    }
}

impl From<Vec<StylePass>> for FaceStyles {
    fn from(passes: Vec<StylePass>) -> Self {
        Self::PerFace(passes)
    }
}
