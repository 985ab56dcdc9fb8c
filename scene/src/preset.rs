//! The built-in demo scene: a box made of six huge spheres, a spherical lamp
//! high to the right, and a few sample spheres showing off each material.
//! Loaded OBJ meshes are dropped onto the floor in the middle.

use crate::{Albedo, Material, SceneBuilder};
use geometry::camera::Camera;
use math::hcm::{point3, vec3, Vec3};
use radiometry::color::Color;
use shape::{Sphere, TriangleMesh};

const WALL_RADIUS: f32 = 10_000.0;

/// Camera slightly above the floor, tilted 10 degrees down towards the scene.
pub fn camera() -> Camera {
    let mut camera = Camera::new(point3(0.0, 10.0, 55.0), -Vec3::Z, Vec3::Y);
    camera.rotate(math::new_deg(-10.0), 0);
    camera
}

/// Builds a `SceneBuilder` pre-populated with the demo geometry. The caller
/// may add meshes before `build()`.
pub fn builder() -> SceneBuilder {
    let gray = Material::matte(Albedo::Constant(Color::gray(0.2)));
    let checker = Material::matte(Albedo::Checkerboard {
        axes: (0, 2),
        cell: 8.0,
        colors: (Color::gray(0.3), Color::gray(0.05)),
    });

    let mut builder = SceneBuilder::new(camera());
    builder
        .add_sphere(Sphere::new(point3(20.0, 20.0, 40.0), 5.0), Material::light(2e10))
        // Matte, mirror and glass demo spheres.
        .add_sphere(
            Sphere::new(point3(15.0, -18.0, 3.0), 2.0),
            Material::matte(Albedo::Constant(Color::new(0.5, 0.2, 0.9))),
        )
        .add_sphere(Sphere::new(point3(-14.0, -14.0, -4.0), 6.0), Material::mirror())
        .add_sphere(
            Sphere::new(point3(9.0, -14.0, 17.0), 6.0),
            Material::transparent(1.5),
        )
        // The walls of the box: floor, ceiling, left, right, back, front.
        .add_sphere(Sphere::new(point3(0.0, -10_020.0, 0.0), WALL_RADIUS), checker)
        .add_sphere(Sphere::new(point3(0.0, 10_040.0, 0.0), WALL_RADIUS), gray)
        .add_sphere(Sphere::new(point3(-10_040.0, 0.0, 0.0), WALL_RADIUS), gray)
        .add_sphere(Sphere::new(point3(10_040.0, 0.0, 0.0), WALL_RADIUS), gray)
        .add_sphere(Sphere::new(point3(0.0, 0.0, -10_030.0), WALL_RADIUS), gray)
        .add_sphere(Sphere::new(point3(0.0, 0.0, 10_070.0), WALL_RADIUS), gray);
    builder.add_mesh(
        pyramid_mesh(),
        Material::matte(Albedo::Constant(Color::new(0.8, 0.6, 0.2))),
    );
    builder
}

/// A small four-sided pyramid standing on the floor, so the demo scene
/// exercises the mesh intersection path without any external OBJ file.
fn pyramid_mesh() -> TriangleMesh {
    let apex = point3(0.0, -13.0, 11.0);
    let base = [
        point3(-3.0, -20.0, 8.0),
        point3(3.0, -20.0, 8.0),
        point3(3.0, -20.0, 14.0),
        point3(-3.0, -20.0, 14.0),
    ];
    let mut positions = vec![];
    let mut normals = vec![];
    let mut indices = vec![];
    for i in 0..4 {
        let (a, b) = (base[i], base[(i + 1) % 4]);
        let normal = (apex - a).cross(b - a).hat();
        let start = positions.len();
        positions.extend([a, b, apex].iter().copied());
        normals.extend(std::iter::repeat(normal).take(3));
        indices.push((start, start + 1, start + 2));
    }
    let uvs = vec![(0.0, 0.0); positions.len()];
    TriangleMesh::from_soa(positions, normals, uvs, indices)
}

/// Poses a loaded mesh in the demo scene: upright, scaled to roughly
/// room size, standing on the floor a little behind the origin.
pub fn pose_mesh(mesh: &mut TriangleMesh) {
    mesh.rotate(math::new_deg(60.0), 1);
    mesh.scale_translate(4.5, vec3(0.0, -20.0, -7.0));
    mesh.build_bvh();
}

#[cfg(test)]
mod test {
    use geometry::ray::Ray;
    use math::hcm::{point3, vec3};

    #[test]
    fn demo_scene_builds_with_one_light() {
        let scene = super::builder().build().expect("demo scene must validate");
        // Looking straight down from the middle of the room hits the floor.
        let down = Ray::new(point3(0.0, 0.0, 0.0), vec3(0.0, -1.0, 0.0));
        let (hit, material) = scene.intersect(&down).expect("floor below");
        assert!((hit.ray_t - 20.0).abs() < 1.0);
        assert!(!material.is_light && !material.mirrors && !material.transparent);
    }

    #[test]
    fn demo_camera_looks_slightly_down() {
        let camera = super::camera();
        assert_eq!(camera.origin(), point3(0.0, 10.0, 55.0));
    }
}
