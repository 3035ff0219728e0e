//! # Mesh — Descriptions, Shared Data, and the Mesh Component
//!
//! Mesh geometry is described in JSON and loaded once into the mesh
//! [`Library`]. Entities carry a [`Mesh`] component that only points at the
//! shared [`MeshData`]:
//!
//! ```json
//! {
//!   "type": "TriangleMesh",
//!   "color": [1.0, 1.0, 1.0],
//!   "vertices": [-0.5, -0.5, 0.0,   0.5, -0.5, 0.0,   0.0, 0.5, 0.0],
//!   "uv":       [ 0.0,  1.0,        1.0,  1.0,        0.5, 0.0],
//!   "indices":  [0, 1, 2]
//! }
//! ```
//!
//! `vertices` holds XYZ triples and `uv` holds UV pairs; both must describe
//! the same number of vertices. `type` is one of the four built-in names or
//! any other string for a custom mesh, and is the key in the library.

use std::path::Path;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use super::vertex::Vertex;
use crate::ecs::{Component, ComponentKind};
use crate::error::AssetError;
use crate::library::Library;

/// The built-in shapes, plus `Custom` for anything loaded by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshType {
    Custom,
    Triangle,
    Square,
    Prism,
    Cube,
}

impl MeshType {
    /// Library key of a built-in shape; `None` for `Custom`.
    pub const fn builtin_name(self) -> Option<&'static str> {
        match self {
            MeshType::Custom => None,
            MeshType::Triangle => Some("TriangleMesh"),
            MeshType::Square => Some("SquareMesh"),
            MeshType::Prism => Some("PrismMesh"),
            MeshType::Cube => Some("CubeMesh"),
        }
    }

    /// Classify a description's `type` string.
    pub fn from_name(name: &str) -> MeshType {
        match name {
            "TriangleMesh" => MeshType::Triangle,
            "SquareMesh" => MeshType::Square,
            "PrismMesh" => MeshType::Prism,
            "CubeMesh" => MeshType::Cube,
            _ => MeshType::Custom,
        }
    }
}

/// A mesh as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    #[serde(rename = "type")]
    pub name: String,
    pub color: [f32; 3],
    pub vertices: Vec<f32>,
    pub uv: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Validated, interleaved geometry shared by every entity using the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub mesh_type: MeshType,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn from_description(desc: MeshDescription) -> Result<Self, AssetError> {
        let invalid = |reason: String| AssetError::InvalidMesh {
            name: desc.name.clone(),
            reason,
        };
        if desc.vertices.len() % 3 != 0 {
            return Err(invalid(format!(
                "{} position values is not a multiple of 3",
                desc.vertices.len()
            )));
        }
        if desc.uv.len() % 2 != 0 {
            return Err(invalid(format!(
                "{} uv values is not a multiple of 2",
                desc.uv.len()
            )));
        }
        let count = desc.vertices.len() / 3;
        if desc.uv.len() / 2 != count {
            return Err(invalid(format!(
                "{count} positions but {} texture coordinates",
                desc.uv.len() / 2
            )));
        }
        if let Some(&bad) = desc.indices.iter().find(|&&i| i as usize >= count) {
            return Err(invalid(format!("index {bad} out of range for {count} vertices")));
        }

        let vertices = desc
            .vertices
            .chunks_exact(3)
            .zip(desc.uv.chunks_exact(2))
            .map(|(p, t)| Vertex {
                pos: [p[0], p[1], p[2]],
                tex: [t[0], t[1]],
                color: desc.color,
            })
            .collect();

        Ok(Self {
            mesh_type: MeshType::from_name(&desc.name),
            name: desc.name,
            vertices,
            indices: desc.indices,
        })
    }

    pub fn from_json(json: &str, origin: &str) -> Result<Self, AssetError> {
        let desc: MeshDescription = serde_json::from_str(json).map_err(|source| AssetError::Json {
            origin: origin.to_owned(),
            source,
        })?;
        Self::from_description(desc)
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let json = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json, &path.display().to_string())
    }

    /// Empty geometry loads fine but is skipped at draw time.
    pub fn is_drawable(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }
}

const BUILTIN_MESHES: [(&str, &str); 4] = [
    ("triangle.json", include_str!("../../assets/meshes/triangle.json")),
    ("square.json", include_str!("../../assets/meshes/square.json")),
    ("prism.json", include_str!("../../assets/meshes/prism.json")),
    ("cube.json", include_str!("../../assets/meshes/cube.json")),
];

/// Add the four built-in shapes to `library`.
pub fn register_builtin_meshes(library: &mut Library<MeshData>) -> Result<(), AssetError> {
    for (file, json) in BUILTIN_MESHES {
        let data = MeshData::from_json(json, file)?;
        log::debug!(
            "registered mesh `{}` ({} vertices, {} indices)",
            data.name,
            data.vertices.len(),
            data.indices.len()
        );
        library.add_item(data.name.clone(), data);
    }
    Ok(())
}

/// Load a custom mesh file into `library` under its `type` name.
///
/// A name already in the library is an error; the existing entry is kept.
pub fn load_mesh_into(library: &mut Library<MeshData>, path: &Path) -> Result<Weak<MeshData>, AssetError> {
    let data = MeshData::load(path)?;
    if library.contains(&data.name) {
        log::error!("mesh `{}` from {} is already loaded", data.name, path.display());
        return Err(AssetError::InvalidMesh {
            name: data.name,
            reason: "duplicate mesh name".to_owned(),
        });
    }
    Ok(library.add_item(data.name.clone(), data))
}

/// The `Mesh` component: a name and a weak handle into the mesh library.
#[derive(Debug)]
pub struct Mesh {
    name: String,
    data: Weak<MeshData>,
}

impl Component for Mesh {
    const KIND: ComponentKind = ComponentKind::Mesh;
}

impl Mesh {
    /// Look up a built-in shape, or `custom_name` when `mesh_type` is `Custom`.
    pub fn new(mesh_type: MeshType, custom_name: &str, library: &Library<MeshData>) -> Result<Self, AssetError> {
        let name = mesh_type.builtin_name().unwrap_or(custom_name);
        match library.get(name) {
            Some(data) => Ok(Self {
                name: name.to_owned(),
                data,
            }),
            None => {
                log::error!("cannot find mesh data named `{name}`");
                Err(AssetError::UnknownMesh(name.to_owned()))
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared geometry, or `None` once the library entry is gone.
    pub fn data(&self) -> Option<Rc<MeshData>> {
        self.data.upgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(vertices: Vec<f32>, uv: Vec<f32>, indices: Vec<u32>) -> MeshDescription {
        MeshDescription {
            name: "Custom".into(),
            color: [1.0, 0.0, 0.0],
            vertices,
            uv,
            indices,
        }
    }

    #[test]
    fn builtins_load_with_matching_counts() {
        let mut library = Library::new();
        register_builtin_meshes(&mut library).unwrap();
        assert_eq!(library.len(), 4);

        let cube = library.get("CubeMesh").unwrap().upgrade().unwrap();
        assert_eq!(cube.mesh_type, MeshType::Cube);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.is_drawable());

        let triangle = library.get("TriangleMesh").unwrap().upgrade().unwrap();
        assert_eq!(triangle.indices, vec![0, 1, 2]);
    }

    #[test]
    fn vertices_are_interleaved_with_the_mesh_color() {
        let data = MeshData::from_description(desc(
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            vec![0.1, 0.2, 0.3, 0.4],
            vec![0, 1, 0],
        ))
        .unwrap();
        assert_eq!(data.mesh_type, MeshType::Custom);
        assert_eq!(data.vertices[1].pos, [3.0, 4.0, 5.0]);
        assert_eq!(data.vertices[1].tex, [0.3, 0.4]);
        assert_eq!(data.vertices[0].color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn mismatched_counts_are_rejected() {
        let err = MeshData::from_description(desc(vec![0.0; 9], vec![0.0; 4], vec![])).unwrap_err();
        assert!(matches!(err, AssetError::InvalidMesh { .. }));
        assert!(MeshData::from_description(desc(vec![0.0; 8], vec![], vec![])).is_err());
        assert!(MeshData::from_description(desc(vec![0.0; 3], vec![0.0; 3], vec![])).is_err());
        assert!(MeshData::from_description(desc(vec![0.0; 3], vec![0.0; 2], vec![1])).is_err());
    }

    #[test]
    fn empty_mesh_loads_but_is_not_drawable() {
        let data = MeshData::from_description(desc(vec![], vec![], vec![])).unwrap();
        assert!(!data.is_drawable());
    }

    #[test]
    fn component_resolves_through_the_library() {
        let mut library = Library::new();
        register_builtin_meshes(&mut library).unwrap();
        let mesh = Mesh::new(MeshType::Cube, "", &library).unwrap();
        assert_eq!(mesh.name(), "CubeMesh");
        assert!(mesh.data().is_some());

        assert!(matches!(
            Mesh::new(MeshType::Custom, "Teapot", &library),
            Err(AssetError::UnknownMesh(name)) if name == "Teapot"
        ));

        library.clear();
        assert!(mesh.data().is_none());
    }

    #[test]
    fn custom_mesh_file_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wedge.json");
        std::fs::write(
            &path,
            r#"{ "type": "Wedge", "color": [0.5, 0.5, 0.5],
                 "vertices": [0,0,0, 1,0,0, 0,1,0], "uv": [0,0, 1,0, 0,1], "indices": [0,1,2] }"#,
        )
        .unwrap();

        let mut library = Library::new();
        load_mesh_into(&mut library, &path).unwrap();
        let mesh = Mesh::new(MeshType::Custom, "Wedge", &library).unwrap();
        assert_eq!(mesh.data().unwrap().vertices.len(), 3);
        assert!(load_mesh_into(&mut library, &path).is_err());
        assert_eq!(library.len(), 1);
    }
}
