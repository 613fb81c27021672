use crate::field_engine::types::Vec3;

/// Solides platoniques disponibles pour le fond 3D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolidKind {
    Icosahedron,
    Octahedron,
    Tetrahedron,
}

impl SolidKind {
    pub const ALL: [SolidKind; 3] = [
        SolidKind::Icosahedron,
        SolidKind::Octahedron,
        SolidKind::Tetrahedron,
    ];

    pub fn index(self) -> usize {
        match self {
            SolidKind::Icosahedron => 0,
            SolidKind::Octahedron => 1,
            SolidKind::Tetrahedron => 2,
        }
    }

    /// Maillage centré sur l'origine, sommets sur la sphère de rayon `radius`.
    pub fn mesh(self, radius: f32) -> Mesh {
        let (vertices, faces): (Vec<Vec3>, Vec<[usize; 3]>) = match self {
            SolidKind::Icosahedron => {
                let t = (1.0 + 5f32.sqrt()) / 2.0;
                (
                    vec![
                        Vec3::new(-1.0, t, 0.0),
                        Vec3::new(1.0, t, 0.0),
                        Vec3::new(-1.0, -t, 0.0),
                        Vec3::new(1.0, -t, 0.0),
                        Vec3::new(0.0, -1.0, t),
                        Vec3::new(0.0, 1.0, t),
                        Vec3::new(0.0, -1.0, -t),
                        Vec3::new(0.0, 1.0, -t),
                        Vec3::new(t, 0.0, -1.0),
                        Vec3::new(t, 0.0, 1.0),
                        Vec3::new(-t, 0.0, -1.0),
                        Vec3::new(-t, 0.0, 1.0),
                    ],
                    vec![
                        [0, 11, 5],
                        [0, 5, 1],
                        [0, 1, 7],
                        [0, 7, 10],
                        [0, 10, 11],
                        [1, 5, 9],
                        [5, 11, 4],
                        [11, 10, 2],
                        [10, 7, 6],
                        [7, 1, 8],
                        [3, 9, 4],
                        [3, 4, 2],
                        [3, 2, 6],
                        [3, 6, 8],
                        [3, 8, 9],
                        [4, 9, 5],
                        [2, 4, 11],
                        [6, 2, 10],
                        [8, 6, 7],
                        [9, 8, 1],
                    ],
                )
            }
            SolidKind::Octahedron => (
                vec![
                    Vec3::X,
                    Vec3::NEG_X,
                    Vec3::Y,
                    Vec3::NEG_Y,
                    Vec3::Z,
                    Vec3::NEG_Z,
                ],
                vec![
                    [0, 2, 4],
                    [0, 4, 3],
                    [0, 3, 5],
                    [0, 5, 2],
                    [1, 2, 5],
                    [1, 5, 3],
                    [1, 3, 4],
                    [1, 4, 2],
                ],
            ),
            SolidKind::Tetrahedron => (
                vec![
                    Vec3::new(1.0, 1.0, 1.0),
                    Vec3::new(-1.0, -1.0, 1.0),
                    Vec3::new(-1.0, 1.0, -1.0),
                    Vec3::new(1.0, -1.0, -1.0),
                ],
                vec![[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]],
            ),
        };

        let vertices: Vec<Vec3> = vertices
            .into_iter()
            .map(|v| v.normalize() * radius)
            .collect();

        // Toutes les faces orientées vers l'extérieur (sens direct).
        let faces = faces
            .into_iter()
            .map(|[a, b, c]| {
                let normal = (vertices[b] - vertices[a]).cross(vertices[c] - vertices[a]);
                let centroid = vertices[a] + vertices[b] + vertices[c];
                if normal.dot(centroid) < 0.0 {
                    [a, c, b]
                } else {
                    [a, b, c]
                }
            })
            .collect();

        Mesh { vertices, faces }
    }
}

/// Maillage triangulaire indexé.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[usize; 3]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_sizes() {
        let ico = SolidKind::Icosahedron.mesh(2.0);
        assert_eq!((ico.vertices.len(), ico.faces.len()), (12, 20));
        let octa = SolidKind::Octahedron.mesh(2.0);
        assert_eq!((octa.vertices.len(), octa.faces.len()), (6, 8));
        let tetra = SolidKind::Tetrahedron.mesh(2.0);
        assert_eq!((tetra.vertices.len(), tetra.faces.len()), (4, 4));
    }

    #[test]
    fn test_faces_point_outward() {
        for kind in SolidKind::ALL {
            let mesh = kind.mesh(2.0);
            for v in &mesh.vertices {
                assert!((v.length() - 2.0).abs() < 1e-5);
            }
            for [a, b, c] in &mesh.faces {
                let (a, b, c) = (mesh.vertices[*a], mesh.vertices[*b], mesh.vertices[*c]);
                let normal = (b - a).cross(c - a);
                assert!(normal.dot(a + b + c) > 0.0, "{:?} has an inward face", kind);
            }
        }
    }
}
