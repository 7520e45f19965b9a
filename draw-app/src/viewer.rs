//! Passive 3D model viewer.
//!
//! The viewer is told which model URL to display and, once the bytes are
//! available, summarizes the glTF/GLB document. It never talks to the backend.

use gltf::mesh::Mode;
use gltf::Semantic;

use crate::error::AppResult;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl Bounds {
    /// Edge lengths along x, y and z.
    #[must_use]
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    fn union(self, other: Self) -> Self {
        Self {
            min: [
                self.min[0].min(other.min[0]),
                self.min[1].min(other.min[1]),
                self.min[2].min(other.min[2]),
            ],
            max: [
                self.max[0].max(other.max[0]),
                self.max[1].max(other.max[1]),
                self.max[2].max(other.max[2]),
            ],
        }
    }
}

/// What a loaded model contains.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelSummary {
    /// Number of meshes.
    pub meshes: usize,
    /// Number of primitives across all meshes.
    pub primitives: usize,
    /// Number of vertices across all primitives.
    pub vertices: usize,
    /// Number of triangles across all primitives.
    pub triangles: usize,
    /// Bounds of all positions, when the file declares them.
    pub bounds: Option<Bounds>,
}

impl ModelSummary {
    /// Summarize a GLB or glTF JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Model`] if the bytes are not a valid glTF document.
    pub fn from_slice(bytes: &[u8]) -> AppResult<Self> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let mut summary = Self::default();

        for mesh in gltf.meshes() {
            summary.meshes += 1;
            for primitive in mesh.primitives() {
                summary.primitives += 1;

                let Some(positions) = primitive.get(&Semantic::Positions) else {
                    continue;
                };
                let vertex_count = positions.count();
                summary.vertices += vertex_count;

                let element_count = primitive.indices().map_or(vertex_count, |i| i.count());
                summary.triangles += match primitive.mode() {
                    Mode::Triangles => element_count / 3,
                    Mode::TriangleStrip | Mode::TriangleFan => element_count.saturating_sub(2),
                    _ => 0,
                };

                let bounds = positions
                    .min()
                    .zip(positions.max())
                    .and_then(|(min, max)| {
                        Some(Bounds {
                            min: serde_json::from_value(min).ok()?,
                            max: serde_json::from_value(max).ok()?,
                        })
                    });
                if let Some(bounds) = bounds {
                    summary.bounds = Some(summary.bounds.map_or(bounds, |b| b.union(bounds)));
                }
            }
        }

        Ok(summary)
    }
}

/// Displays the most recent generated model.
#[derive(Debug, Clone, Default)]
pub struct ModelViewer {
    url: Option<String>,
    summary: Option<ModelSummary>,
}

impl ModelViewer {
    /// Create an empty viewer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Display the model at `url`. Any previously loaded summary is dropped.
    pub fn show(&mut self, url: impl Into<String>) {
        let url = url.into();
        tracing::debug!(%url, "Viewer showing model");
        self.url = Some(url);
        self.summary = None;
    }

    /// Parse the model bytes for the displayed URL.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Model`] if the bytes are not a valid glTF document;
    /// the previous summary is kept.
    pub fn load(&mut self, bytes: &[u8]) -> AppResult<&ModelSummary> {
        let summary = ModelSummary::from_slice(bytes)?;
        tracing::debug!(
            meshes = summary.meshes,
            vertices = summary.vertices,
            triangles = summary.triangles,
            "Viewer loaded model"
        );
        Ok(self.summary.insert(summary))
    }

    /// Empty the viewer.
    pub fn reset(&mut self) {
        self.url = None;
        self.summary = None;
    }

    /// URL being displayed.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Summary of the loaded model.
    #[must_use]
    pub fn summary(&self) -> Option<&ModelSummary> {
        self.summary.as_ref()
    }

    /// Whether nothing is displayed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
    }
}
