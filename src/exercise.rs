use cgmath::{Deg, InnerSpace, Matrix4, Vector3};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Exercise {
    Triangles,
    TexturedQuad,
    Camera,
}

impl Exercise {
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Triangles),
            2 => Some(Self::TexturedQuad),
            3 => Some(Self::Camera),
            _ => None,
        }
    }

    pub fn uses_textures(&self) -> bool {
        match self {
            Self::Triangles => false,
            Self::TexturedQuad | Self::Camera => true,
        }
    }

    pub fn uses_camera(&self) -> bool {
        matches!(self, Self::Camera)
    }
}

#[rustfmt::skip]
pub const LEFT_TRIANGLE: [f32; 9] = [
    -1.0, -0.5, 0.0,
    0.0, -0.5, 0.0,
    -0.5, 0.5, 0.0,
];

#[rustfmt::skip]
pub const RIGHT_TRIANGLE: [f32; 9] = [
    0.0, -0.5, 0.0,
    1.0, -0.5, 0.0,
    0.5, 0.5, 0.0,
];

/// Position, color and texture coordinates per corner.
#[rustfmt::skip]
pub const TEXTURED_QUAD: [f32; 32] = [
    0.5, 0.5, 0.0,     1.0, 0.0, 0.0,   1.0, 1.0,
    0.5, -0.5, 0.0,    0.0, 1.0, 0.0,   1.0, 0.0,
    -0.5, -0.5, 0.0,   0.0, 0.0, 1.0,   0.0, 0.0,
    -0.5, 0.5, 0.0,    1.0, 1.0, 0.0,   0.0, 1.0,
];

#[rustfmt::skip]
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 3,
    1, 2, 3,
];

pub const QUAD_POSITIONS: [[f32; 3]; 6] = [
    [0.0, 0.0, 0.0],
    [2.0, 5.0, -15.0],
    [-1.5, -2.2, -2.5],
    [-3.8, -2.0, -12.3],
    [2.4, -0.4, -3.5],
    [1.5, 2.0, -2.5],
];

/// Model matrix of the `index`-th quad in the camera exercise.
pub fn quad_model(index: usize) -> Matrix4<f32> {
    let [x, y, z] = QUAD_POSITIONS[index % QUAD_POSITIONS.len()];
    let axis = Vector3::new(1.0, 0.3, 0.5);
    let angle = Deg(20.0 * index as f32);

    Matrix4::from_translation(Vector3::new(x, y, z))
        * Matrix4::from_axis_angle(axis.normalize(), angle)
}

pub fn projection(fov: Deg<f32>, width: u32, height: u32) -> Matrix4<f32> {
    let aspect = width as f32 / height.max(1) as f32;

    cgmath::perspective(fov, aspect, 0.1, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn digits_select_exercises() {
        assert_eq!(Exercise::from_digit(1), Some(Exercise::Triangles));
        assert_eq!(Exercise::from_digit(2), Some(Exercise::TexturedQuad));
        assert_eq!(Exercise::from_digit(3), Some(Exercise::Camera));
        assert_eq!(Exercise::from_digit(4), None);

        assert!(!Exercise::Triangles.uses_textures());
        assert!(Exercise::Camera.uses_camera());
        assert!(!Exercise::TexturedQuad.uses_camera());
    }

    #[test]
    fn triangles_share_an_edge_vertex() {
        assert_eq!(&LEFT_TRIANGLE[3..6], &RIGHT_TRIANGLE[0..3]);
    }

    #[test]
    fn quad_indices_in_range() {
        let vertices = TEXTURED_QUAD.len() / 8;

        assert!(QUAD_INDICES.iter().all(|i| (*i as usize) < vertices));
    }

    #[test]
    fn first_quad_sits_at_origin() {
        assert_eq!(quad_model(0), Matrix4::identity());

        let moved = quad_model(1) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(moved, Vector4::new(2.0, 5.0, -15.0, 1.0));
    }

    #[test]
    fn projection_tolerates_zero_height() {
        let proj = projection(Deg(45.0), 800, 0);

        assert!(proj.x.x.is_finite());
    }
}
