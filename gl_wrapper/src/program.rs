use gl::types::{GLenum, GLint, GLuint};
use std::ffi::{c_char, CString};
use thiserror::Error;

const LOG_LEN: usize = 1024;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    pub fn build(self) -> Result<Program, ProgramError> {
        let vert_src = CString::new(self.vert).map_err(|_| ProgramError::InvalidSource)?;
        let frag_src = CString::new(self.frag).map_err(|_| ProgramError::InvalidSource)?;

        let vert = compile(gl::VERTEX_SHADER, &vert_src)?;
        let frag = match compile(gl::FRAGMENT_SHADER, &frag_src) {
            Ok(frag) => frag,
            Err(e) => {
                unsafe { gl::DeleteShader(vert) };
                return Err(e);
            }
        };

        let mut success: GLint = 0;

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            if success != 1 {
                let mut buf = [0_u8; LOG_LEN];
                gl::GetProgramInfoLog(
                    program,
                    LOG_LEN as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );
                gl::DeleteProgram(program);

                return Err(ProgramError::Linking(info_log(&buf)));
            }

            log::debug!("Linked shader program {program}");

            Ok(Program { id: program })
        }
    }
}

fn compile(kind: GLenum, src: &CString) -> Result<GLuint, ProgramError> {
    let mut success: GLint = 0;

    unsafe {
        let shader = gl::CreateShader(kind);

        gl::ShaderSource(shader, 1, &src.as_ptr(), std::ptr::null());
        gl::CompileShader(shader);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);

        if success != 1 {
            let mut buf = [0_u8; LOG_LEN];
            gl::GetShaderInfoLog(
                shader,
                LOG_LEN as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );
            gl::DeleteShader(shader);

            let stage = if kind == gl::VERTEX_SHADER {
                "vertex"
            } else {
                "fragment"
            };

            return Err(ProgramError::Compilation(stage, info_log(&buf)));
        }

        Ok(shader)
    }
}

/// Cuts the driver log at the first NUL.
pub(crate) fn info_log(buf: &[u8]) -> String {
    let data = buf.split(|a| *a == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("{0} shader failed to compile: {1}")]
    Compilation(&'static str, String),
    #[error("program failed to link: {0}")]
    Linking(String),
    #[error("shader source contains a NUL byte")]
    InvalidSource,
    #[error("no active uniform named '{0}'")]
    UnknownUniform(String),
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn set_mat4(&self, name: &str, value: &[f32; 16]) -> Result<(), ProgramError> {
        let location = self.uniform_location(name)?;

        unsafe { gl::ProgramUniformMatrix4fv(self.id, location, 1, gl::FALSE, value.as_ptr()) }

        Ok(())
    }

    pub fn set_float(&self, name: &str, value: f32) -> Result<(), ProgramError> {
        let location = self.uniform_location(name)?;

        unsafe { gl::ProgramUniform1f(self.id, location, value) }

        Ok(())
    }

    pub fn set_int(&self, name: &str, value: i32) -> Result<(), ProgramError> {
        let location = self.uniform_location(name)?;

        unsafe { gl::ProgramUniform1i(self.id, location, value) }

        Ok(())
    }

    fn uniform_location(&self, name: &str) -> Result<GLint, ProgramError> {
        let unknown = || ProgramError::UnknownUniform(name.to_string());

        let c_name = CString::new(name).map_err(|_| unknown())?;

        let location = unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) };

        if location < 0 {
            return Err(unknown());
        }

        Ok(location)
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_stops_at_nul() {
        let mut buf = [0_u8; 32];
        buf[..12].copy_from_slice(b"0:1: error\n\n");

        assert_eq!(info_log(&buf), "0:1: error");
    }

    #[test]
    fn info_log_without_nul() {
        assert_eq!(info_log(b"full buffer"), "full buffer");
    }

    #[test]
    fn nul_in_source_is_rejected_before_gl() {
        let res = ProgramBuilder::new("void main() {}\0", "void main() {}").build();

        assert!(matches!(res, Err(ProgramError::InvalidSource)));
    }
}
