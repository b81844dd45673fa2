pub mod material;
pub mod object3d;
pub mod scene;
pub mod transform;

pub use material::{Material, MaterialId, StandardMaterial};
pub use object3d::{AmbientLight, Object3D, ObjectId, ObjectKind, PointLight};
pub use scene::{GeometryId, Scene};
pub use transform::Transform;
