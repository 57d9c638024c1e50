use crate::geometry::Geometry;
use crate::program::Program;

pub struct GlRenderer {
    current_program: u32,
    wireframe: bool,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self {
            current_program: 0,
            wireframe: false,
        }
    }

    pub fn draw(&mut self, geometry: &Geometry, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }

        unsafe {
            gl::BindVertexArray(geometry.vao());
            match geometry.elements() {
                Some(count) => gl::DrawElements(
                    gl::TRIANGLES,
                    count as i32,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                ),
                None => gl::DrawArrays(gl::TRIANGLES, 0, geometry.vertices() as i32),
            }
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn clear_color(&self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        if self.wireframe == wireframe {
            return;
        }

        let mode = if wireframe { gl::LINE } else { gl::FILL };
        unsafe { gl::PolygonMode(gl::FRONT_AND_BACK, mode) }
        self.wireframe = wireframe;
    }

    pub fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }
        }
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
