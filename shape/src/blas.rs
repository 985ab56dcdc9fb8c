use crate::{Interaction, Shape};
use geometry::bvh::{self, BBox};
use geometry::ray::Ray;
use math::float::{barycentric_lerp, Inside};
use math::hcm::{Point3, Vec3};
use math::Angle;
use partition::partition;
use radiometry::color::Color;
use std::ops::Range;

/// Triangles stop being split once a range is this small.
const LEAF_SIZE: usize = 4;

/// Group index of triangles that belong to no material group (and therefore
/// never sample a texture).
pub const NO_GROUP: usize = usize::MAX;

/// A texture image already decoded to linear-light RGB. Sampling wraps the
/// fractional UV coordinates into [0, 1) with the V axis flipped, matching
/// image row order.
pub struct Texture {
    pixels: Vec<Color>,
    width: usize,
    height: usize,
}

impl Texture {
    pub fn new(pixels: Vec<Color>, width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0);
        assert_eq!(pixels.len(), width * height);
        Texture {
            pixels,
            width,
            height,
        }
    }

    fn sample(&self, (u, v): (f32, f32)) -> Color {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);
        let col = ((u * self.width as f32) as usize).min(self.width - 1);
        let row = (((1.0 - v) * self.height as f32) as usize).min(self.height - 1);
        self.pixels[row * self.width + col]
    }
}

/// Index triples of one triangle into the mesh's vertex arrays, plus the
/// material group it belongs to and its precomputed barycenter (the BVH build
/// partitions triangles by barycenter).
#[derive(Debug, Clone)]
pub struct TriangleIndices {
    pub vertex: [usize; 3],
    pub normal: [usize; 3],
    pub uv: [usize; 3],
    pub group: usize,
    barycenter: Point3,
}

impl TriangleIndices {
    pub fn new(vertex: [usize; 3], normal: [usize; 3], uv: [usize; 3], group: usize) -> Self {
        TriangleIndices {
            vertex,
            normal,
            uv,
            group,
            barycenter: Point3::ORIGIN,
        }
    }
}

/// One node of the mesh's bounding-volume hierarchy. Nodes live in a
/// contiguous arena owned by the mesh and refer to each other by index; a node
/// covers the half-open range `[range.start, range.end)` of the mesh's
/// triangle array, and its two children (if any) partition that range exactly.
#[derive(Debug)]
struct BvhNode {
    bbox: BBox,
    range: Range<usize>,
    children: Option<[usize; 2]>,
}

/// An indexed triangle mesh with per-group textures and a BVH over its
/// triangles. Geometry is mutable (transforms) until `build_bvh()` finalizes
/// it; afterwards the mesh is read-only and safe to share across threads.
pub struct TriangleMesh {
    positions: Vec<Point3>,
    normals: Vec<Vec3>,
    uvs: Vec<(f32, f32)>,
    triangles: Vec<TriangleIndices>,
    textures: Vec<Texture>,

    // Filled in by `build_bvh`. The root is the last node pushed.
    nodes: Vec<BvhNode>,
    root: usize,
}

impl TriangleMesh {
    /// Builds a mesh from fully-indexed arrays (distinct position / normal /
    /// uv indices per corner, as OBJ files provide).
    pub fn from_indices(
        positions: Vec<Point3>, normals: Vec<Vec3>, uvs: Vec<(f32, f32)>,
        triangles: Vec<TriangleIndices>,
    ) -> Self {
        TriangleMesh {
            positions,
            normals,
            uvs,
            triangles,
            textures: vec![],
            nodes: vec![],
            root: 0,
        }
    }

    /// Builds a mesh from structure-of-arrays data where each corner uses the
    /// same index for position, normal and uv. Handy for procedural geometry.
    pub fn from_soa(
        positions: Vec<Point3>, normals: Vec<Vec3>, uvs: Vec<(f32, f32)>,
        indices: Vec<(usize, usize, usize)>,
    ) -> Self {
        let triangles = indices
            .into_iter()
            .map(|(i, j, k)| TriangleIndices::new([i, j, k], [i, j, k], [i, j, k], NO_GROUP))
            .collect();
        Self::from_indices(positions, normals, uvs, triangles)
    }

    /// Appends a texture; triangles whose `group` equals the texture's
    /// position in insertion order will sample it.
    pub fn add_texture(&mut self, texture: Texture) {
        self.textures.push(texture);
    }

    /// Scales all vertex positions about the world origin, then translates
    /// them. Invalidates any previously built BVH.
    pub fn scale_translate(&mut self, scale: f32, translation: Vec3) {
        for p in self.positions.iter_mut() {
            *p = Point3::from(Vec3::from(*p) * scale + translation);
        }
        self.nodes.clear();
    }

    /// Rotates all vertex positions and normals around a principal axis.
    /// Invalidates any previously built BVH.
    pub fn rotate(&mut self, angle: Angle, axis: usize) {
        for p in self.positions.iter_mut() {
            *p = Point3::from(Vec3::from(*p).rotated(angle, axis));
        }
        for n in self.normals.iter_mut() {
            *n = n.rotated(angle, axis);
        }
        self.nodes.clear();
    }

    pub fn has_bvh(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Finalizes the geometry: precomputes triangle barycenters and builds the
    /// BVH arena. Must be called after the last transform and before the mesh
    /// is intersected. A mesh with zero triangles builds an empty hierarchy
    /// and misses every ray.
    pub fn build_bvh(&mut self) {
        self.nodes.clear();
        if self.triangles.is_empty() {
            return;
        }
        for tri in self.triangles.iter_mut() {
            let [i, j, k] = tri.vertex;
            let (a, b, c) = (self.positions[i], self.positions[j], self.positions[k]);
            tri.barycenter = a + ((b - a) + (c - a)) / 3.0;
        }
        let whole_range = 0..self.triangles.len();
        self.root = build_node(
            &self.positions,
            &mut self.triangles,
            &mut self.nodes,
            whole_range,
        );
    }

    fn intersect_triangle(&self, tri: &TriangleIndices, r: &Ray) -> Option<Interaction> {
        let [i, j, k] = tri.vertex;
        let (a, b, c) = (self.positions[i], self.positions[j], self.positions[k]);
        let e1 = b - a;
        let e2 = c - a;
        let face_normal = e1.cross(e2);
        let det = r.dir.dot(face_normal);
        if det == 0.0 {
            // Degenerate triangle or a ray parallel to its plane.
            return None;
        }
        let inv_det = 1.0 / det;
        let ao = r.origin - a;
        let ao_cross_d = ao.cross(r.dir);
        let beta = -e2.dot(ao_cross_d) * inv_det;
        if !beta.inside((0.0, 1.0)) {
            return None;
        }
        let gamma = e1.dot(ao_cross_d) * inv_det;
        if !gamma.inside((0.0, 1.0)) {
            return None;
        }
        let alpha = 1.0 - beta - gamma;
        if alpha < 0.0 {
            return None;
        }
        let t = -ao.dot(face_normal) * inv_det;
        let ray_t = r.truncated_t(t)?;
        let pos = r.position_at(ray_t);

        // Smooth shading: the normal is the barycentric blend of the vertex
        // normals, not the flat face normal.
        let [ni, nj, nk] = tri.normal;
        let normal = barycentric_lerp(
            (self.normals[ni], self.normals[nj], self.normals[nk]),
            (alpha, beta, gamma),
        )
        .try_hat()
        .unwrap_or_else(|| face_normal.hat());

        let [ui, uj, uk] = tri.uv;
        let uv = (
            barycentric_lerp((self.uvs[ui].0, self.uvs[uj].0, self.uvs[uk].0), (alpha, beta, gamma)),
            barycentric_lerp((self.uvs[ui].1, self.uvs[uj].1, self.uvs[uk].1), (alpha, beta, gamma)),
        );
        let tex_color = self.textures.get(tri.group).map(|t| t.sample(uv));
        Some(Interaction::new(pos, ray_t, uv, normal).with_texture_color(tex_color))
    }

    fn intersect_triangle_pred(&self, tri: &TriangleIndices, r: &Ray) -> bool {
        let [i, j, k] = tri.vertex;
        let (a, b, c) = (self.positions[i], self.positions[j], self.positions[k]);
        let e1 = b - a;
        let e2 = c - a;
        let face_normal = e1.cross(e2);
        let det = r.dir.dot(face_normal);
        if det == 0.0 {
            return false;
        }
        let inv_det = 1.0 / det;
        let ao = r.origin - a;
        let ao_cross_d = ao.cross(r.dir);
        let beta = -e2.dot(ao_cross_d) * inv_det;
        let gamma = e1.dot(ao_cross_d) * inv_det;
        if !beta.inside((0.0, 1.0)) || !gamma.inside((0.0, 1.0)) || beta + gamma > 1.0 {
            return false;
        }
        let t = -ao.dot(face_normal) * inv_det;
        r.truncated_t(t).is_some()
    }

    pub fn bvh_summary(&self) -> String {
        format!(
            "height = {}, node count = {}",
            self.node_height(self.root),
            self.nodes.len()
        )
    }

    fn node_height(&self, index: usize) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        match self.nodes[index].children {
            None => 1,
            Some([left, right]) => 1 + self.node_height(left).max(self.node_height(right)),
        }
    }
}

impl Shape for TriangleMesh {
    fn intersect(&self, r: &Ray) -> Option<Interaction> {
        if self.nodes.is_empty() {
            return None;
        }
        self.nodes[self.root].bbox.intersect(r)?;

        // Best-first pruning happens through the shrinking ray extent: a child
        // is pushed only if its box is entered before the best hit so far.
        let mut node_stack = Vec::with_capacity(60);
        node_stack.push(self.root);
        let mut ray = *r;
        let mut best_hit: Option<Interaction> = None;
        while let Some(index) = node_stack.pop() {
            let node = &self.nodes[index];
            match node.children {
                Some(children) => {
                    for &child in children.iter() {
                        if self.nodes[child].bbox.intersect(&ray).is_some() {
                            node_stack.push(child);
                        }
                    }
                }
                None => {
                    for tri in self.triangles[node.range.clone()].iter() {
                        if let Some(hit) = self.intersect_triangle(tri, &ray) {
                            ray.t_max = hit.ray_t;
                            best_hit = Some(hit);
                        }
                    }
                }
            }
        }
        best_hit
    }

    fn occludes(&self, r: &Ray) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let mut node_stack = vec![self.root];
        while let Some(index) = node_stack.pop() {
            let node = &self.nodes[index];
            if node.bbox.intersect(r).is_none() {
                continue;
            }
            match node.children {
                Some([left, right]) => {
                    node_stack.push(left);
                    node_stack.push(right);
                }
                None => {
                    if self.triangles[node.range.clone()]
                        .iter()
                        .any(|tri| self.intersect_triangle_pred(tri, r))
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn bbox(&self) -> BBox {
        if self.nodes.is_empty() {
            self.triangles.iter().fold(BBox::empty(), |b, tri| {
                tri.vertex
                    .iter()
                    .fold(b, |b, &v| b.union(self.positions[v]))
            })
        } else {
            self.nodes[self.root].bbox
        }
    }

    fn summary(&self) -> String {
        format!(
            "TriangleMesh{{{} triangles, {} vertices, bbox = {}, bvh = {}}}",
            self.triangles.len(),
            self.positions.len(),
            self.bbox(),
            self.bvh_summary()
        )
    }
}

fn range_bbox(positions: &[Point3], triangles: &[TriangleIndices], range: &Range<usize>) -> BBox {
    triangles[range.clone()].iter().fold(BBox::empty(), |b, tri| {
        tri.vertex.iter().fold(b, |b, &v| b.union(positions[v]))
    })
}

/// Recursively builds the subtree covering `range`, appends its nodes to the
/// arena and returns the subtree root's index. Triangles are partitioned
/// in-place around the midpoint of the bounding box's longest axis; a
/// one-sided partition becomes a leaf rather than recursing forever.
fn build_node(
    positions: &[Point3], triangles: &mut Vec<TriangleIndices>, nodes: &mut Vec<BvhNode>,
    range: Range<usize>,
) -> usize {
    let bbox = range_bbox(positions, triangles, &range);
    if range.len() > LEAF_SIZE {
        let split_axis = bbox.diag().max_dimension();
        let limit = (bbox.min()[split_axis] + bbox.max()[split_axis]) * 0.5;
        let (left, _) = partition(&mut triangles[range.clone()], |tri| {
            tri.barycenter[split_axis] <= limit
        });
        let pivot = range.start + left.len();
        if pivot != range.start && pivot != range.end {
            let left_child = build_node(positions, triangles, nodes, range.start..pivot);
            let right_child = build_node(positions, triangles, nodes, pivot..range.end);
            nodes.push(BvhNode {
                bbox: bvh::union(nodes[left_child].bbox, nodes[right_child].bbox),
                range,
                children: Some([left_child, right_child]),
            });
            return nodes.len() - 1;
        }
        // All barycenters fell on one side of the midpoint; accept an
        // oversized leaf.
    }
    nodes.push(BvhNode {
        bbox,
        range,
        children: None,
    });
    nodes.len() - 1
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Two triangles forming the unit square in the z = 0 plane, with normals
    /// tilted to exercise the barycentric blend.
    fn quad_mesh() -> TriangleMesh {
        let positions = vec![
            point3(0.0, 0.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(1.0, 1.0, 0.0),
            point3(0.0, 1.0, 0.0),
        ];
        let normals = vec![vec3(0.0, 0.0, 1.0); 4];
        let uvs = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let mut mesh =
            TriangleMesh::from_soa(positions, normals, uvs, vec![(0, 1, 2), (0, 2, 3)]);
        mesh.build_bvh();
        mesh
    }

    fn random_soup(rng: &mut StdRng, count: usize) -> TriangleMesh {
        let mut positions = vec![];
        let mut normals = vec![];
        let mut uvs = vec![];
        let mut indices = vec![];
        for t in 0..count {
            let center = vec3(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            for _ in 0..3 {
                let corner = center
                    + vec3(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                    );
                positions.push(Point3::from(corner));
                normals.push(vec3(0.0, 0.0, 1.0));
                uvs.push((0.0, 0.0));
            }
            indices.push((3 * t, 3 * t + 1, 3 * t + 2));
        }
        let mut mesh = TriangleMesh::from_soa(positions, normals, uvs, indices);
        mesh.build_bvh();
        mesh
    }

    #[test]
    fn quad_head_on_hit() {
        let mesh = quad_mesh();
        let r = Ray::new(point3(0.25, 0.25, 5.0), vec3(0.0, 0.0, -1.0));
        let hit = mesh.intersect(&r).expect("must hit the quad");
        assert!((hit.ray_t - 5.0).abs() < 1e-4);
        math::assert_close!(hit.normal, vec3(0.0, 0.0, 1.0));
        // uv interpolates the corner attributes.
        assert!((hit.uv.0 - 0.25).abs() < 1e-4 && (hit.uv.1 - 0.25).abs() < 1e-4);
    }

    #[test]
    fn quad_miss_outside() {
        let mesh = quad_mesh();
        let r = Ray::new(point3(1.5, 0.5, 5.0), vec3(0.0, 0.0, -1.0));
        assert!(mesh.intersect(&r).is_none());
        assert!(!mesh.occludes(&r));
    }

    #[test]
    fn empty_mesh_always_misses() {
        let mut mesh = TriangleMesh::from_soa(vec![], vec![], vec![], vec![]);
        mesh.build_bvh();
        let r = Ray::new(Point3::ORIGIN, vec3(0.0, 0.0, -1.0));
        assert!(mesh.intersect(&r).is_none());
        assert!(!mesh.occludes(&r));
    }

    #[test]
    fn bvh_ranges_partition_exactly() {
        let mut rng = StdRng::seed_from_u64(42);
        let mesh = random_soup(&mut rng, 128);
        assert_eq!(mesh.nodes[mesh.root].range, 0..128);
        for node in mesh.nodes.iter() {
            match node.children {
                Some([left, right]) => {
                    let (l, r) = (&mesh.nodes[left].range, &mesh.nodes[right].range);
                    assert_eq!(l.start, node.range.start);
                    assert_eq!(l.end, r.start);
                    assert_eq!(r.end, node.range.end);
                    assert!(node.bbox.encloses(mesh.nodes[left].bbox));
                    assert!(node.bbox.encloses(mesh.nodes[right].bbox));
                }
                None => {
                    if node.range.len() > LEAF_SIZE {
                        // Oversized leaves only happen on degenerate splits:
                        // every barycenter on one side of the midpoint.
                        let axis = node.bbox.diag().max_dimension();
                        let limit = (node.bbox.min()[axis] + node.bbox.max()[axis]) * 0.5;
                        let one_sided = mesh.triangles[node.range.clone()]
                            .iter()
                            .all(|t| t.barycenter[axis] <= limit)
                            || mesh.triangles[node.range.clone()]
                                .iter()
                                .all(|t| t.barycenter[axis] > limit);
                        assert!(one_sided, "oversized leaf without degenerate split");
                    }
                }
            }
        }
    }

    #[test]
    fn bvh_traversal_matches_exhaustive_scan() {
        let mut rng = StdRng::seed_from_u64(7);
        let mesh = random_soup(&mut rng, 100);
        for _ in 0..200 {
            let origin = point3(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            );
            let dir = vec3(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if dir.norm_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new(origin, dir.hat());

            let exhaustive = mesh
                .triangles
                .iter()
                .filter_map(|tri| mesh.intersect_triangle(tri, &ray))
                .min_by(|a, b| a.ray_t.partial_cmp(&b.ray_t).unwrap());
            let traversed = mesh.intersect(&ray);
            match (exhaustive, traversed) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    assert!((a.ray_t - b.ray_t).abs() < 1e-4, "{} vs {}", a.ray_t, b.ray_t)
                }
                (a, b) => panic!("exhaustive = {:?}, bvh = {:?}", a.is_some(), b.is_some()),
            }
        }
    }

    #[test]
    fn transforms_move_the_mesh_and_stale_the_bvh() {
        let mut mesh = quad_mesh();
        mesh.scale_translate(2.0, vec3(0.0, 0.0, -10.0));
        assert!(!mesh.has_bvh());
        mesh.build_bvh();
        let r = Ray::new(point3(0.5, 0.5, 5.0), vec3(0.0, 0.0, -1.0));
        let hit = mesh.intersect(&r).expect("scaled quad still covers (0.5, 0.5)");
        assert!((hit.ray_t - 15.0).abs() < 1e-4);
    }

    #[test]
    fn rotated_normals_follow_the_geometry() {
        let mut mesh = quad_mesh();
        mesh.rotate(math::new_deg(90.0), 0);
        mesh.build_bvh();
        // The quad now spans the y = 0 plane with normals along -y... or +y
        // depending on winding; either way the normal is parallel to y.
        let r = Ray::new(point3(0.25, 5.0, 0.25), vec3(0.0, -1.0, 0.0));
        let hit = mesh.intersect(&r).expect("rotated quad must be hit from above");
        assert!(hit.normal.x.abs() < 1e-4 && hit.normal.z.abs() < 1e-4);
    }

    #[test]
    fn textured_group_samples_texture() {
        let positions = vec![
            point3(0.0, 0.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(0.0, 1.0, 0.0),
        ];
        let normals = vec![vec3(0.0, 0.0, 1.0); 3];
        let uvs = vec![(0.1, 0.1), (0.9, 0.1), (0.1, 0.9)];
        let faces = vec![TriangleIndices::new([0, 1, 2], [0, 1, 2], [0, 1, 2], 0)];
        let mut mesh = TriangleMesh::from_indices(positions, normals, uvs, faces);
        mesh.add_texture(Texture::new(vec![Color::new(0.25, 0.5, 0.75)], 1, 1));
        mesh.build_bvh();
        let r = Ray::new(point3(0.2, 0.2, 5.0), vec3(0.0, 0.0, -1.0));
        let hit = mesh.intersect(&r).unwrap();
        assert_eq!(hit.tex_color, Some(Color::new(0.25, 0.5, 0.75)));
    }
}
