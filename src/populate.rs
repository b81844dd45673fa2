use glam::Vec3;
use rand::Rng;

use crate::assets::{Font, TextureSlot};
use crate::config::{DemoConfig, PopulationConfig};
use crate::geometry::{primitives, text, Geometry};
use crate::scene_graph::{Material, MaterialId, ObjectId, Scene, StandardMaterial, Transform};

pub struct Population {
    pub text: ObjectId,
    /// Built from the ornament textures but not assigned to any mesh.
    pub ornament_material: MaterialId,
    pub primitives: Vec<ObjectId>,
}

/// Fills the scene once the font is available: the centered text followed by
/// the scattered primitives.
pub fn populate<R: Rng + ?Sized>(
    scene: &mut Scene,
    font: &Font,
    config: &DemoConfig,
    rng: &mut R,
) -> Population {
    let ornament_material = scene.add_material(Material::Standard(StandardMaterial {
        map: Some(TextureSlot::Color),
        metalness_map: Some(TextureSlot::Metalness),
        roughness_map: Some(TextureSlot::Roughness),
        ..Default::default()
    }));

    let mut text_geometry = text::text(font, &config.text, &config.text_options);
    text_geometry.center();
    log::info!(
        "Built text geometry for {:?} with {} triangles",
        config.text,
        text_geometry.triangle_count()
    );

    let text_geometry = scene.add_geometry(text_geometry);
    let text_material = scene.add_material(Material::Normal);
    let text = scene.add_mesh(
        "Text",
        text_geometry,
        text_material,
        Transform::from_translation(Vec3::ZERO),
    );

    let population = &config.population;
    let shapes = [
        (primitives::torus(0.3, 0.2, 32, 64), "Donut", population.torus_count),
        (primitives::sphere(0.3, 30, 20), "Sphere", population.sphere_count),
        (primitives::cuboid(0.3, 0.3, 0.3), "Cube", population.cube_count),
    ];

    let mut primitives = Vec::with_capacity(population.total());
    for (geometry, name, count) in shapes {
        primitives.extend(scatter(scene, geometry, name, count, population, rng));
    }

    log::info!("Scattered {} primitives", primitives.len());

    Population {
        text,
        ornament_material,
        primitives,
    }
}

fn scatter<R: Rng + ?Sized>(
    scene: &mut Scene,
    geometry: Geometry,
    name: &str,
    count: usize,
    config: &PopulationConfig,
    rng: &mut R,
) -> Vec<ObjectId> {
    let geometry = scene.add_geometry(geometry);

    (0..count)
        .map(|i| {
            let material = scene.add_material(Material::Normal);
            let transform = random_transform(config, rng);
            scene.add_mesh(format!("{name} {i}"), geometry, material, transform)
        })
        .collect()
}

pub fn random_transform<R: Rng + ?Sized>(config: &PopulationConfig, rng: &mut R) -> Transform {
    let mut coordinate = || (rng.gen::<f32>() - 0.5) * config.spread;
    let position = Vec3::new(coordinate(), coordinate(), coordinate());

    let rotation = Vec3::new(
        rng.gen::<f32>() * config.max_rotation,
        rng.gen::<f32>() * config.max_rotation,
        0.0,
    );
    let scale = rng.gen::<f32>();

    Transform::from_euler(position, rotation, scale)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::assets::font::tests::ring_font;
    use crate::scene_graph::ObjectKind;

    fn populated_scene(seed: u64) -> (Scene, Population) {
        let mut scene = Scene::new();
        let config = DemoConfig {
            text: "oi".to_string(),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let population = populate(&mut scene, &ring_font(), &config, &mut rng);
        (scene, population)
    }

    #[test]
    fn adds_the_configured_primitive_counts() {
        let (scene, population) = populated_scene(1);

        let count = |name| {
            let geometry = scene.find_geometry_by_name(name).unwrap();
            scene.count_meshes_with_geometry(geometry)
        };
        assert_eq!(count("Torus"), 75);
        assert_eq!(count("Sphere"), 300);
        assert_eq!(count("Cube"), 75);
        assert_eq!(population.primitives.len(), 450);
        assert_eq!(scene.mesh_count(), 451);
    }

    #[test]
    fn primitive_transforms_stay_in_range() {
        let (scene, population) = populated_scene(7);

        for id in &population.primitives {
            let transform = &scene.get_object(*id).unwrap().transform;
            let position = transform.translation();
            let euler = transform.euler();

            assert!(position.abs().max_element() <= 7.5, "{position:?}");
            assert!((0.0..=PI).contains(&euler.x));
            assert!((0.0..=PI).contains(&euler.y));
            assert_eq!(euler.z, 0.0);
            assert!((0.0..1.0).contains(&transform.scale()));
        }
    }

    #[test]
    fn every_primitive_gets_its_own_normal_material() {
        let (scene, population) = populated_scene(3);

        let mut materials: Vec<_> = population
            .primitives
            .iter()
            .map(|id| match scene.get_object(*id).unwrap().kind {
                ObjectKind::Mesh { material, .. } => material,
                _ => panic!("primitive is not a mesh"),
            })
            .collect();
        materials.sort_by_key(|id| id.index());
        materials.dedup();

        assert_eq!(materials.len(), 450);
        assert!(materials
            .iter()
            .all(|id| scene.get_material(*id) == Some(&Material::Normal)));
    }

    #[test]
    fn text_is_centered_and_ornament_material_is_unused() {
        let (scene, population) = populated_scene(5);

        let text = scene.get_object(population.text).unwrap();
        let ObjectKind::Mesh { geometry, material } = text.kind else {
            panic!("text is not a mesh");
        };
        let bounds = scene.get_geometry(geometry).unwrap().bounding_box().unwrap();
        assert!(bounds.center().length() < 1e-5);
        assert_eq!(scene.get_material(material), Some(&Material::Normal));

        let used_by_mesh = scene.objects.iter().any(|(_, object)| {
            matches!(object.kind, ObjectKind::Mesh { material, .. } if material == population.ornament_material)
        });
        assert!(!used_by_mesh);
    }

    #[test]
    fn placements_differ_between_generators() {
        let (first, a) = populated_scene(11);
        let (second, b) = populated_scene(12);

        let position = |scene: &Scene, id: ObjectId| scene.get_object(id).unwrap().transform.translation();
        assert_ne!(position(&first, a.primitives[0]), position(&second, b.primitives[0]));
    }
}
