use std::ffi::c_void;
use thiserror::Error;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
    indices: Option<&'a [u32]>,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            indices: None,
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Draw through an element buffer instead of plain vertex order.
    pub fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn stride(&self) -> usize {
        self.attributes.iter().map(|a| a.size()).sum()
    }

    /// Returns the vertex count the data describes.
    pub fn validate(&self) -> Result<usize, GBError> {
        let total_len = self.stride();

        if total_len == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.len() % total_len != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = self.data.len() / total_len;

        if let Some(indices) = self.indices {
            if let Some(index) = indices.iter().find(|i| **i as usize >= vertices) {
                return Err(GBError::IndexOutOfRange(*index, vertices));
            }
        }

        Ok(vertices)
    }

    pub fn build(self) -> Result<Geometry, GBError> {
        let vertices = self.validate()?;
        let total_len = self.stride();

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = None;

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(self.data) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            if let Some(indices) = self.indices {
                let mut id = 0;
                gl::GenBuffers(1, &mut id);
                // element buffer binding is stored in the VAO
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, id);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    std::mem::size_of_val(indices) as isize,
                    indices.as_ptr() as *const c_void,
                    gl::STATIC_DRAW,
                );
                ebo = Some(id);
            }

            let mut offset = 0;

            for (i, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    i as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    (total_len * std::mem::size_of::<f32>()) as i32,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                );
                offset += attr.size();
                gl::EnableVertexAttribArray(i as u32);
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        let elements = self.indices.map(|i| i.len());

        Ok(Geometry {
            vao,
            vbo,
            ebo,
            vertices,
            elements,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("No vertex attributes given")]
    NoAttributes,
    #[error("Index {0} out of range for {1} vertices")]
    IndexOutOfRange(u32, usize),
}

#[derive(Debug, Copy, Clone)]
pub enum VertexAttribute {
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: Option<u32>,
    vertices: usize,
    elements: Option<usize>,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    /// Index count for geometry built with an element buffer.
    pub fn elements(&self) -> Option<usize> {
        self.elements
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            if let Some(ebo) = &self.ebo {
                gl::DeleteBuffers(1, ebo);
            }
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: [f32; 9] = [-1.0, -0.5, 0.0, 0.0, -0.5, 0.0, -0.5, 0.5, 0.0];

    #[test]
    fn counts_vertices() {
        let builder = GeometryBuilder::new(&TRIANGLE).with_attribute(VertexAttribute::Vec3);

        assert_eq!(builder.stride(), 3);
        assert_eq!(builder.validate(), Ok(3));
    }

    #[test]
    fn interleaved_stride() {
        let data = [0.0; 32];
        let builder = GeometryBuilder::new(&data)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&[0, 1, 3, 1, 2, 3]);

        assert_eq!(builder.stride(), 8);
        assert_eq!(builder.validate(), Ok(4));
    }

    #[test]
    fn rejects_partial_vertex() {
        let builder = GeometryBuilder::new(&TRIANGLE).with_attribute(VertexAttribute::Vec2);

        assert_eq!(builder.validate(), Err(GBError::InvalidDataLength));
    }

    #[test]
    fn rejects_missing_attributes() {
        let builder = GeometryBuilder::new(&TRIANGLE);

        assert_eq!(builder.validate(), Err(GBError::NoAttributes));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let builder = GeometryBuilder::new(&TRIANGLE)
            .with_attribute(VertexAttribute::Vec3)
            .with_indices(&[0, 1, 3]);

        assert_eq!(builder.validate(), Err(GBError::IndexOutOfRange(3, 3)));
    }
}
