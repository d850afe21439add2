//! Scene graphs and binary model import.

use mediafetch_core::math::{Mat3, Quat, Vec3};
use mediafetch_core::profiling::{profile_function, profile_scope};

use crate::error::DecodeError;

/// Local transform of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// The node's local +Z axis.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// The node's local +Y axis.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate so that +Z points along `forward`, keeping +Y as close to
    /// world up as possible.
    pub fn set_forward(&mut self, forward: Vec3) {
        let Some(f) = forward.try_normalize() else {
            return;
        };

        self.rotation = match Vec3::Y.cross(f).try_normalize() {
            Some(right) => {
                let up = f.cross(right);
                Quat::from_mat3(&Mat3::from_cols(right, up, f)).normalize()
            }
            // Looking straight up or down: any roll will do
            None => Quat::from_rotation_arc(Vec3::Z, f),
        };
    }
}

/// Summary of a mesh attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshInfo {
    pub name: Option<String>,
    pub primitive_count: usize,
}

/// A node in an imported hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub mesh: Option<MeshInfo>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// An empty node with an identity transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            transform: Transform::IDENTITY,
            mesh: None,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Depth-first search by name.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

/// A named animation and its length.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds (the latest keyframe time across all channels).
    pub duration: f32,
}

/// An imported model: a root node plus its animation clips.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    pub root: SceneNode,
    pub animations: Vec<AnimationClip>,
    playing: Option<usize>,
}

impl SceneGraph {
    /// Create a scene graph with nothing playing.
    pub fn new(root: SceneNode, animations: Vec<AnimationClip>) -> Self {
        Self {
            root,
            animations,
            playing: None,
        }
    }

    /// The clip that plays by default: the first one.
    pub fn default_animation(&self) -> Option<&AnimationClip> {
        self.animations.first()
    }

    /// Start the default clip. Returns `false` when there is none.
    pub fn play_default_animation(&mut self) -> bool {
        if self.animations.is_empty() {
            return false;
        }
        self.playing = Some(0);
        true
    }

    /// Stop whatever is playing.
    pub fn stop_animation(&mut self) {
        self.playing = None;
    }

    /// The clip currently playing.
    pub fn playing(&self) -> Option<&AnimationClip> {
        self.playing.and_then(|i| self.animations.get(i))
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Apply the fixed coordinate correction: the root faces -Z.
    pub fn flip_forward(&mut self) {
        self.root.transform.set_forward(Vec3::NEG_Z);
    }
}

/// Turns a binary model buffer into a [`SceneGraph`].
pub trait ModelImporter: Send + Sync {
    /// Import from an in-memory buffer.
    fn import(&self, bytes: &[u8]) -> Result<SceneGraph, DecodeError>;
}

/// Importer backed by the `gltf` crate.
///
/// Accepts `.glb` and self-contained `.gltf` (buffers embedded or as data
/// URIs). The chosen scene is wrapped in a synthetic root with an identity
/// transform, so corrections applied to the root never clobber authored
/// node transforms.
#[derive(Debug, Clone)]
pub struct GltfImporter {
    root_name: String,
}

impl Default for GltfImporter {
    fn default() -> Self {
        Self {
            root_name: "memory".to_string(),
        }
    }
}

impl GltfImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name given to the synthetic root when the scene has none.
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    fn convert_node(node: gltf::Node<'_>) -> SceneNode {
        let (t, r, s) = node.transform().decomposed();
        let mesh = node.mesh().map(|mesh| MeshInfo {
            name: mesh.name().map(String::from),
            primitive_count: mesh.primitives().len(),
        });

        SceneNode {
            name: node.name().map(String::from),
            transform: Transform {
                translation: Vec3::from_array(t),
                rotation: Quat::from_xyzw(r[0], r[1], r[2], r[3]).normalize(),
                scale: Vec3::from_array(s),
            },
            mesh,
            children: node.children().map(Self::convert_node).collect(),
        }
    }

    fn convert_animation(
        index: usize,
        animation: gltf::Animation<'_>,
        buffers: &[gltf::buffer::Data],
    ) -> AnimationClip {
        let name = animation
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("animation_{index}"));

        let mut duration = 0.0f32;
        for channel in animation.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
            if let Some(inputs) = reader.read_inputs() {
                duration = inputs.fold(duration, f32::max);
            }
        }

        AnimationClip { name, duration }
    }
}

impl ModelImporter for GltfImporter {
    fn import(&self, bytes: &[u8]) -> Result<SceneGraph, DecodeError> {
        profile_function!();

        let (document, buffers, _images) = gltf::import_slice(bytes)?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| DecodeError::new("Model contains no scene"))?;

        let mut root = SceneNode::new(
            scene
                .name()
                .map(String::from)
                .unwrap_or_else(|| self.root_name.clone()),
        );
        {
            profile_scope!("convert_nodes");
            root.children = scene.nodes().map(Self::convert_node).collect();
        }

        let animations = document
            .animations()
            .enumerate()
            .map(|(i, animation)| Self::convert_animation(i, animation, &buffers))
            .collect();

        let graph = SceneGraph::new(root, animations);
        tracing::debug!(
            "Imported model: {} nodes, {} animations",
            graph.node_count(),
            graph.animations.len()
        );
        Ok(graph)
    }
}
