use id_arena::{Arena, Id};

use crate::geometry::Geometry;
use crate::scene_graph::material::{Material, MaterialId};
use crate::scene_graph::object3d::{Object3D, ObjectId, ObjectKind};
use crate::scene_graph::transform::Transform;

pub type GeometryId = Id<Geometry>;

/// Flat scene: every object is a root. Objects are only ever added, so ids
/// stay valid for the scene's whole lifetime.
pub struct Scene {
    pub objects: Arena<Object3D>,
    pub geometries: Arena<Geometry>,
    pub materials: Arena<Material>,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            geometries: Arena::new(),
            materials: Arena::new(),
            revision: 0,
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.revision += 1;
        self.objects.alloc(object)
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.revision += 1;
        self.geometries.alloc(geometry)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.alloc(material)
    }

    pub fn add_mesh(
        &mut self,
        name: impl Into<String>,
        geometry: GeometryId,
        material: MaterialId,
        transform: Transform,
    ) -> ObjectId {
        self.add_object(Object3D::new(
            name,
            transform,
            ObjectKind::Mesh { geometry, material },
        ))
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn get_geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id)
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Bumped whenever an object or geometry is added.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.objects.iter().filter(|(_, object)| object.is_mesh()).count()
    }

    pub fn light_count(&self) -> usize {
        self.objects.iter().filter(|(_, object)| object.is_light()).count()
    }

    pub fn count_meshes_with_geometry(&self, geometry: GeometryId) -> usize {
        self.meshes_with_geometry(geometry).count()
    }

    pub fn meshes_with_geometry(
        &self,
        geometry_id: GeometryId,
    ) -> impl Iterator<Item = &Object3D> + '_ {
        self.objects.iter().filter_map(move |(_, object)| match object.kind {
            ObjectKind::Mesh { geometry, .. } if geometry == geometry_id => Some(object),
            _ => None,
        })
    }

    pub fn find_geometry_by_name(&self, name: &str) -> Option<GeometryId> {
        self.geometries
            .iter()
            .find(|(_, geometry)| geometry.name == name)
            .map(|(id, _)| id)
    }

    /// Refreshes world matrices of changed objects, returns how many changed.
    pub fn late_update(&mut self) -> usize {
        self.objects
            .iter_mut()
            .map(|(_, object)| object.transform.update_matrices())
            .filter(|changed| *changed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::geometry::primitives;
    use crate::scene_graph::object3d::{AmbientLight, PointLight};

    #[test]
    fn meshes_are_counted_per_geometry() {
        let mut scene = Scene::new();
        let cube = scene.add_geometry(primitives::cuboid(1.0, 1.0, 1.0));
        let sphere = scene.add_geometry(primitives::sphere(1.0, 8, 6));
        let material = scene.add_material(Material::Normal);

        for i in 0..3 {
            scene.add_mesh(format!("Cube {i}"), cube, material, Transform::from_translation(Vec3::ZERO));
        }
        scene.add_mesh("Sphere", sphere, material, Transform::from_translation(Vec3::ZERO));
        scene.add_object(Object3D::new(
            "Ambient",
            Transform::from_translation(Vec3::ZERO),
            ObjectKind::AmbientLight(AmbientLight {
                color: Vec3::ONE,
                intensity: 1.0,
            }),
        ));

        assert_eq!(scene.mesh_count(), 4);
        assert_eq!(scene.count_meshes_with_geometry(cube), 3);
        assert_eq!(scene.count_meshes_with_geometry(sphere), 1);
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.find_geometry_by_name("Sphere"), Some(sphere));
    }

    #[test]
    fn revision_tracks_additions() {
        let mut scene = Scene::new();
        let before = scene.revision();

        scene.add_object(Object3D::new(
            "Point",
            Transform::from_translation(Vec3::X),
            ObjectKind::PointLight(PointLight::new(Vec3::ONE, 30.0)),
        ));

        assert!(scene.revision() > before);
        assert!(scene.get_object_by_name("Point").is_some());
    }

    #[test]
    fn late_update_only_touches_changed_objects() {
        let mut scene = Scene::new();
        let camera = scene.add_object(Object3D::new(
            "Camera",
            Transform::from_translation(Vec3::Z),
            ObjectKind::Camera,
        ));
        assert_eq!(scene.late_update(), 0);

        scene
            .get_object_mut(camera)
            .unwrap()
            .transform
            .set_translation(Vec3::ONE);
        assert_eq!(scene.late_update(), 1);
    }
}
