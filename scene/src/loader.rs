//! Wavefront OBJ loading. All models in the file are merged into a single
//! `TriangleMesh`; materials with a diffuse texture map get their PNG decoded
//! to linear light and attached as a texture group.

use math::hcm::{point3, vec3, Point3, Vec3};
use radiometry::color::Color;
use shape::{Texture, TriangleIndices, TriangleMesh, NO_GROUP};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("can't read obj file: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("can't decode texture image: {0}")]
    Image(#[from] png::DecodingError),
    #[error("can't open texture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported texture format: {0}")]
    UnsupportedTexture(String),
}

/// Loads an OBJ file into one mesh. The caller still applies transforms and
/// calls `build_bvh()` (or lets `SceneBuilder::add_mesh` do it).
pub fn load_obj(path: &Path) -> Result<TriangleMesh, LoadError> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options)?;
    let materials = materials.unwrap_or_else(|err| {
        log::warn!("obj loaded but mtl didn't: {}", err);
        vec![]
    });

    // Materials carrying a diffuse texture become texture groups, numbered in
    // material order. Untextured materials keep NO_GROUP and fall back to the
    // scene material's albedo.
    let obj_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut group_of_material = vec![NO_GROUP; materials.len()];
    let mut textures = vec![];
    for (id, material) in materials.iter().enumerate() {
        if let Some(tex_name) = &material.diffuse_texture {
            group_of_material[id] = textures.len();
            textures.push(load_png_texture(&obj_dir.join(tex_name))?);
        }
    }

    let mut positions: Vec<Point3> = vec![];
    let mut normals: Vec<Vec3> = vec![];
    let mut uvs: Vec<(f32, f32)> = vec![];
    let mut triangles: Vec<TriangleIndices> = vec![];
    for model in models.iter() {
        let mesh = &model.mesh;
        let base = positions.len();
        let group = texture_group(mesh.material_id, &group_of_material);

        let vertex_count = mesh.positions.len() / 3;
        positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| point3(p[0], p[1], p[2])),
        );
        if mesh.normals.is_empty() {
            normals.extend(averaged_normals(&mesh.positions, &mesh.indices));
        } else {
            normals.extend(mesh.normals.chunks_exact(3).map(|n| vec3(n[0], n[1], n[2])));
        }
        if mesh.texcoords.is_empty() {
            uvs.extend(std::iter::repeat((0.0, 0.0)).take(vertex_count));
        } else {
            uvs.extend(mesh.texcoords.chunks_exact(2).map(|t| (t[0], t[1])));
        }

        triangles.extend(mesh.indices.chunks_exact(3).map(|tri| {
            let corners = [
                base + tri[0] as usize,
                base + tri[1] as usize,
                base + tri[2] as usize,
            ];
            TriangleIndices::new(corners, corners, corners, group)
        }));
        log::info!(
            "loaded model '{}': {} vertices, {} triangles",
            model.name,
            vertex_count,
            mesh.indices.len() / 3
        );
    }

    let mut mesh = TriangleMesh::from_indices(positions, normals, uvs, triangles);
    for texture in textures {
        mesh.add_texture(texture);
    }
    Ok(mesh)
}

/// Maps a model's material id to its texture group. Ids past the end of the
/// materials list (possible when an MTL library failed to load) fall back to
/// `NO_GROUP`, same as untextured materials.
fn texture_group(material_id: Option<usize>, group_of_material: &[usize]) -> usize {
    material_id
        .and_then(|id| group_of_material.get(id).copied())
        .unwrap_or(NO_GROUP)
}

/// Area-weighted vertex normals for models that ship without any.
fn averaged_normals(positions: &[f32], indices: &[u32]) -> Vec<Vec3> {
    let vertex_count = positions.len() / 3;
    let position_at =
        |i: usize| point3(positions[3 * i], positions[3 * i + 1], positions[3 * i + 2]);
    let mut sums = vec![Vec3::ZERO; vertex_count];
    for tri in indices.chunks_exact(3) {
        let (i, j, k) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (position_at(j) - position_at(i)).cross(position_at(k) - position_at(i));
        sums[i] += face;
        sums[j] += face;
        sums[k] += face;
    }
    sums.into_iter()
        .map(|n| n.try_hat().unwrap_or(vec3(0.0, 0.0, 1.0)))
        .collect()
}

/// Decodes an 8-bit grayscale / RGB / RGBA PNG into a linear-light texture.
/// Stored bytes are display-encoded, so each channel goes through the 2.2
/// power curve once here and never again.
pub fn load_png_texture(path: &Path) -> Result<Texture, LoadError> {
    let decoder = png::Decoder::new(File::open(path)?);
    let (info, mut reader) = decoder.read_info()?;
    let mut buf = vec![0; info.buffer_size()];
    reader.next_frame(&mut buf)?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(LoadError::UnsupportedTexture(format!(
            "{:?} bit depth in {}",
            info.bit_depth,
            path.display()
        )));
    }
    let num_channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::RGB => 3,
        png::ColorType::RGBA => 4,
        other => {
            return Err(LoadError::UnsupportedTexture(format!(
                "{:?} color type in {}",
                other,
                path.display()
            )))
        }
    };

    let pixels: Vec<Color> = match num_channels {
        1 => buf
            .iter()
            .map(|&gray| Color::gray(Color::linearize_u8(gray)))
            .collect(),
        _ => buf
            .chunks(num_channels)
            .map(|px| {
                Color::new(
                    Color::linearize_u8(px[0]),
                    Color::linearize_u8(px[1]),
                    Color::linearize_u8(px[2]),
                )
            })
            .collect(),
    };
    Ok(Texture::new(
        pixels,
        info.width as usize,
        info.height as usize,
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dangling_material_ids_get_no_texture_group() {
        // One textured material in slot 0.
        let groups = [0usize];
        assert_eq!(texture_group(Some(0), &groups), 0);
        assert_eq!(texture_group(None, &groups), NO_GROUP);
        // An id past the list, as left behind by a failed MTL load.
        assert_eq!(texture_group(Some(5), &groups), NO_GROUP);
        assert_eq!(texture_group(Some(0), &[]), NO_GROUP);
    }

    #[test]
    fn averaged_normals_point_away_from_a_flat_face() {
        // Two triangles in the z = 0 plane, counter-clockwise from +z.
        let positions = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 1.0, 0.0,
        ];
        let indices = [0, 1, 2, 1, 3, 2];
        for n in averaged_normals(&positions, &indices) {
            math::assert_close!(n, vec3(0.0, 0.0, 1.0));
        }
    }
}
