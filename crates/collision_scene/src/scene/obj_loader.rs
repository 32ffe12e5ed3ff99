//! Wavefront OBJ reader

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{IoMesh, IoPolygon, IoScene, IoVertex, SceneError};
use crate::foundation::math::Vec3;

/// Name given to faces that appear before any `o`/`g` statement
const DEFAULT_GROUP_NAME: &str = "default";

/// Loads OBJ files into an [`IoScene`]
///
/// Each `o`/`g` group becomes one mesh and `usemtl` switches the material of
/// the polygons that follow. OBJ carries no hierarchy, so the returned scene
/// has meshes and materials but no nodes.
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<IoScene, SceneError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse OBJ text from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<IoScene, SceneError> {
        let mut scene = IoScene::new();
        let mut positions: Vec<Vec3> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();
        let mut mesh = IoMesh::new(DEFAULT_GROUP_NAME);
        let mut material = String::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let number = number + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => positions.push(parse_vec3(&parts, number, "vertex")?),
                "vn" => normals.push(parse_vec3(&parts, number, "normal")?),
                "o" | "g" => {
                    let name = parts.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
                    finish_mesh(&mut scene, &mut mesh);
                    mesh.name = if name.is_empty() { DEFAULT_GROUP_NAME.to_string() } else { name };
                }
                "usemtl" => {
                    material = parts.get(1).copied().unwrap_or_default().to_string();
                    scene.add_material(&material);
                }
                "f" => {
                    if parts.len() < 4 {
                        return Err(obj_error(number, "face needs at least three vertices"));
                    }

                    let mut corners = Vec::with_capacity(parts.len() - 1);
                    for token in &parts[1..] {
                        let vertex = parse_corner(token, &positions, &normals, number)?;
                        mesh.vertices.push(vertex);
                        corners.push((mesh.vertices.len() - 1) as u32);
                    }

                    let polygon = current_polygon(&mut mesh, &material);
                    for i in 1..corners.len() - 1 {
                        polygon.indices.extend([corners[0], corners[i], corners[i + 1]]);
                    }
                }
                _ => {
                    // mtllib, vt, s and friends carry nothing collision needs
                }
            }
        }

        finish_mesh(&mut scene, &mut mesh);
        log::debug!(
            "Parsed OBJ: {} positions, {} meshes, {} materials",
            positions.len(),
            scene.meshes.len(),
            scene.materials.len()
        );
        Ok(scene)
    }
}

fn obj_error(line: usize, message: impl Into<String>) -> SceneError {
    SceneError::Obj {
        line,
        message: message.into(),
    }
}

fn parse_vec3(parts: &[&str], line: usize, what: &str) -> Result<Vec3, SceneError> {
    if parts.len() < 4 {
        return Err(obj_error(line, format!("{what} needs three components")));
    }
    let mut v = [0.0f32; 3];
    for (slot, part) in v.iter_mut().zip(&parts[1..4]) {
        *slot = part
            .parse()
            .map_err(|_| obj_error(line, format!("invalid {what} component '{part}'")))?;
    }
    Ok(Vec3::new(v[0], v[1], v[2]))
}

/// Resolve a 1-based or negative (relative) OBJ index
fn resolve_index(token: &str, count: usize, line: usize, what: &str) -> Result<usize, SceneError> {
    let raw: i64 = token
        .parse()
        .map_err(|_| obj_error(line, format!("invalid {what} index '{token}'")))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => (count as i64).checked_add(r),
    };
    resolved
        .and_then(|i| usize::try_from(i).ok())
        .filter(|&i| i < count)
        .ok_or_else(|| obj_error(line, format!("{what} index {raw} out of range ({count} defined)")))
}

fn parse_corner(
    token: &str,
    positions: &[Vec3],
    normals: &[Vec3],
    line: usize,
) -> Result<IoVertex, SceneError> {
    let mut fields = token.split('/');
    let position_token = fields.next().unwrap_or_default();
    let position = positions[resolve_index(position_token, positions.len(), line, "position")?];

    // texture coordinate is skipped
    let _ = fields.next();

    let normal = match fields.next().filter(|t| !t.is_empty()) {
        Some(t) => normals[resolve_index(t, normals.len(), line, "normal")?],
        None => Vec3::y(),
    };

    Ok(IoVertex { position, normal })
}

fn current_polygon<'a>(mesh: &'a mut IoMesh, material: &str) -> &'a mut IoPolygon {
    let reuse = mesh.polygons.last().is_some_and(|p| p.material == material);
    if !reuse {
        mesh.polygons.push(IoPolygon {
            material: material.to_string(),
            indices: Vec::new(),
        });
    }
    let last = mesh.polygons.len() - 1;
    &mut mesh.polygons[last]
}

fn finish_mesh(scene: &mut IoScene, mesh: &mut IoMesh) {
    if mesh.polygons.is_empty() {
        return;
    }
    let name = mesh.name.clone();
    scene.add_mesh(std::mem::replace(mesh, IoMesh::new(name)));
}
