//! Scene assembly: surfaces paired with materials, a single spherical area
//! light, and the camera. `SceneBuilder` collects the pieces and `build()`
//! checks the one-light precondition before handing out an immutable `Scene`.

pub mod loader;
pub mod preset;

use geometry::camera::Camera;
use geometry::ray::Ray;
use light::SphereLight;
use math::hcm::Point3;
use radiometry::color::Color;
use shape::{Interaction, Shape, Sphere, TriangleMesh};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene has no light source")]
    NoLight,
    #[error("scene has {0} light sources where exactly one is supported")]
    MultipleLights(usize),
}

/// Surface reflectance, evaluated at the world-space hit point. The
/// checkerboard projects the point onto two axes and alternates colors on a
/// grid of `cell`-sized squares.
#[derive(Debug, Clone, Copy)]
pub enum Albedo {
    Constant(Color),
    Checkerboard {
        axes: (usize, usize),
        cell: f32,
        colors: (Color, Color),
    },
}

impl Albedo {
    pub fn at(&self, p: Point3) -> Color {
        match *self {
            Albedo::Constant(c) => c,
            Albedo::Checkerboard { axes, cell, colors } => {
                let i = (p[axes.0] / cell).floor() as i64;
                let j = (p[axes.1] / cell).floor() as i64;
                if (i + j) % 2 == 0 {
                    colors.0
                } else {
                    colors.1
                }
            }
        }
    }
}

/// How a surface scatters light. The flags are checked in a fixed order by
/// the integrator (light, then transparent, then mirror, then diffuse), so a
/// material sets at most one of them.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub albedo: Albedo,
    pub is_light: bool,
    pub mirrors: bool,
    pub transparent: bool,
    pub optical_index: f32,
    pub light_power: f32,
}

impl Material {
    pub fn matte(albedo: Albedo) -> Self {
        Material {
            albedo,
            is_light: false,
            mirrors: false,
            transparent: false,
            optical_index: 1.0,
            light_power: 0.0,
        }
    }

    pub fn mirror() -> Self {
        Material {
            mirrors: true,
            ..Self::matte(Albedo::Constant(Color::white()))
        }
    }

    pub fn transparent(optical_index: f32) -> Self {
        Material {
            transparent: true,
            optical_index,
            ..Self::matte(Albedo::Constant(Color::white()))
        }
    }

    pub fn light(power: f32) -> Self {
        Material {
            is_light: true,
            light_power: power,
            ..Self::matte(Albedo::Constant(Color::white()))
        }
    }

    /// Reflectance at the hit point: a mesh texture color if the interaction
    /// carries one, the material's own albedo otherwise.
    pub fn albedo_at(&self, isect: &Interaction) -> Color {
        match isect.tex_color {
            Some(c) => c,
            None => self.albedo.at(isect.pos),
        }
    }
}

/// Geometry a scene can hold. Dispatch is a match on the variant rather than
/// a trait object so the hot intersection loop stays monomorphic.
pub enum Surface {
    Sphere(Sphere),
    Mesh(TriangleMesh),
}

impl Surface {
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        match self {
            Surface::Sphere(s) => s.intersect(r),
            Surface::Mesh(m) => m.intersect(r),
        }
    }

    fn occludes(&self, r: &Ray) -> bool {
        match self {
            Surface::Sphere(s) => s.occludes(r),
            Surface::Mesh(m) => m.occludes(r),
        }
    }

    fn summary(&self) -> String {
        match self {
            Surface::Sphere(s) => s.summary(),
            Surface::Mesh(m) => m.summary(),
        }
    }
}

pub struct Scene {
    surfaces: Vec<(Surface, Material)>,
    light: SphereLight,
    pub camera: Camera,
}

impl Scene {
    /// Finds the nearest surface hit along the ray, if any, together with the
    /// material there. A plain linear scan over the surfaces; each mesh runs
    /// its own BVH internally.
    pub fn intersect(&self, r: &Ray) -> Option<(Interaction, &Material)> {
        let mut ray = *r;
        let mut best = None;
        for (surface, material) in self.surfaces.iter() {
            if let Some(hit) = surface.intersect(&ray) {
                ray.t_max = hit.ray_t;
                best = Some((hit, material));
            }
        }
        best
    }

    /// True if anything blocks the ray within its extent.
    pub fn occluded(&self, r: &Ray) -> bool {
        self.surfaces.iter().any(|(surface, _)| surface.occludes(r))
    }

    pub fn light(&self) -> &SphereLight {
        &self.light
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("{} surfaces:", self.surfaces.len())];
        lines.extend(self.surfaces.iter().map(|(s, _)| format!("  {}", s.summary())));
        lines.join("\n")
    }
}

pub struct SceneBuilder {
    surfaces: Vec<(Surface, Material)>,
    lights: Vec<SphereLight>,
    camera: Camera,
}

impl SceneBuilder {
    pub fn new(camera: Camera) -> Self {
        SceneBuilder {
            surfaces: vec![],
            lights: vec![],
            camera,
        }
    }

    /// Adds a sphere. A sphere with a light material is also registered as
    /// the scene's area light.
    pub fn add_sphere(&mut self, sphere: Sphere, material: Material) -> &mut Self {
        if material.is_light {
            self.lights.push(SphereLight::new(
                sphere.center(),
                sphere.radius(),
                material.light_power,
            ));
        }
        self.surfaces.push((Surface::Sphere(sphere), material));
        self
    }

    /// Adds a triangle mesh, building its BVH if the caller hasn't yet.
    pub fn add_mesh(&mut self, mut mesh: TriangleMesh, material: Material) -> &mut Self {
        if !mesh.has_bvh() {
            mesh.build_bvh();
        }
        log::info!("adding mesh: {}", mesh.summary());
        self.surfaces.push((Surface::Mesh(mesh), material));
        self
    }

    /// Validates the one-light precondition and produces the scene.
    pub fn build(self) -> Result<Scene, SceneError> {
        let light = match self.lights.len() {
            0 => return Err(SceneError::NoLight),
            1 => self.lights[0],
            n => return Err(SceneError::MultipleLights(n)),
        };
        Ok(Scene {
            surfaces: self.surfaces,
            light,
            camera: self.camera,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, vec3};

    fn test_camera() -> Camera {
        Camera::new(point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, -1.0), vec3(0.0, 1.0, 0.0))
    }

    #[test]
    fn build_requires_exactly_one_light() {
        let builder = SceneBuilder::new(test_camera());
        assert!(matches!(builder.build(), Err(SceneError::NoLight)));

        let mut builder = SceneBuilder::new(test_camera());
        builder
            .add_sphere(Sphere::new(point3(0.0, 10.0, 0.0), 1.0), Material::light(100.0))
            .add_sphere(Sphere::new(point3(5.0, 10.0, 0.0), 1.0), Material::light(100.0));
        assert!(matches!(builder.build(), Err(SceneError::MultipleLights(2))));

        let mut builder = SceneBuilder::new(test_camera());
        builder.add_sphere(Sphere::new(point3(0.0, 10.0, 0.0), 1.0), Material::light(100.0));
        let scene = builder.build().expect("one light is the supported case");
        assert!((scene.light().power() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn nearest_surface_wins() {
        let mut builder = SceneBuilder::new(test_camera());
        builder
            .add_sphere(Sphere::new(point3(0.0, 0.0, -5.0), 1.0), Material::mirror())
            .add_sphere(
                Sphere::new(point3(0.0, 0.0, -10.0), 1.0),
                Material::matte(Albedo::Constant(Color::gray(0.5))),
            )
            .add_sphere(Sphere::new(point3(0.0, 50.0, 0.0), 1.0), Material::light(100.0));
        let scene = builder.build().unwrap();

        let r = Ray::new(point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, -1.0));
        let (hit, material) = scene.intersect(&r).expect("two spheres dead ahead");
        assert!((hit.ray_t - 4.0).abs() < 1e-4);
        assert!(material.mirrors);

        // A shadow ray stopping short of the first sphere sees nothing.
        let short = r.with_extent(3.0);
        assert!(!scene.occluded(&short));
        assert!(scene.occluded(&r));
    }

    #[test]
    fn checkerboard_alternates_on_floor_cells() {
        let albedo = Albedo::Checkerboard {
            axes: (0, 2),
            cell: 10.0,
            colors: (Color::white(), Color::black()),
        };
        let a = albedo.at(point3(5.0, 0.0, 5.0));
        let b = albedo.at(point3(15.0, 0.0, 5.0));
        let c = albedo.at(point3(-5.0, 0.0, 5.0));
        assert_eq!(a, Color::white());
        assert_eq!(b, Color::black());
        // Floor division keeps the pattern consistent across zero.
        assert_eq!(c, Color::black());
    }
}
