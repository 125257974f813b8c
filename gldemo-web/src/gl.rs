//! Thin helpers over `WebGl2RenderingContext`: context lookup, shader
//! programs and float buffers.

use js_sys::Float32Array;
use nalgebra::{Matrix4, Point3, Vector3};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

/// Look up `canvas_id`, size it, and return its WebGL2 context
pub fn context(canvas_id: &str, width: u32, height: u32) -> Result<Gl, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("canvas '{}' not found", canvas_id)))?
        .dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);

    let gl: Gl = canvas
        .get_context("webgl2")?
        .ok_or_else(|| JsValue::from_str("WebGL 2 is not supported by your browser"))?
        .dyn_into()?;
    gl.viewport(0, 0, width as i32, height as i32);
    Ok(gl)
}

fn compile(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| JsValue::from_str("unable to create shader object"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(JsValue::from_str(&format!("shader compile failed: {}", log)))
    }
}

/// A linked vertex + fragment program
pub struct ShaderProgram {
    program: WebGlProgram,
}

impl ShaderProgram {
    pub fn new(gl: &Gl, vertex_src: &str, fragment_src: &str) -> Result<Self, JsValue> {
        let vert = compile(gl, Gl::VERTEX_SHADER, vertex_src)?;
        let frag = compile(gl, Gl::FRAGMENT_SHADER, fragment_src)?;
        let program = gl
            .create_program()
            .ok_or_else(|| JsValue::from_str("unable to create program object"))?;
        gl.attach_shader(&program, &vert);
        gl.attach_shader(&program, &frag);
        gl.link_program(&program);
        gl.delete_shader(Some(&vert));
        gl.delete_shader(Some(&frag));

        let ok = gl
            .get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !ok {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            return Err(JsValue::from_str(&format!("program link failed: {}", log)));
        }
        Ok(Self { program })
    }

    pub fn bind(&self, gl: &Gl) {
        gl.use_program(Some(&self.program));
    }

    fn location(&self, gl: &Gl, name: &str) -> Option<WebGlUniformLocation> {
        gl.get_uniform_location(&self.program, name)
    }

    pub fn set_mat4(&self, gl: &Gl, name: &str, m: &Matrix4<f32>) {
        gl.uniform_matrix4fv_with_f32_array(self.location(gl, name).as_ref(), false, m.as_slice());
    }

    pub fn set_vec2(&self, gl: &Gl, name: &str, x: f32, y: f32) {
        gl.uniform2f(self.location(gl, name).as_ref(), x, y);
    }

    pub fn set_vec3(&self, gl: &Gl, name: &str, v: &Vector3<f32>) {
        gl.uniform3f(self.location(gl, name).as_ref(), v.x, v.y, v.z);
    }

    pub fn set_point3(&self, gl: &Gl, name: &str, p: &Point3<f32>) {
        self.set_vec3(gl, name, &p.coords);
    }

    pub fn set_vec4(&self, gl: &Gl, name: &str, v: [f32; 4]) {
        gl.uniform4f(self.location(gl, name).as_ref(), v[0], v[1], v[2], v[3]);
    }

    pub fn set_float(&self, gl: &Gl, name: &str, v: f32) {
        gl.uniform1f(self.location(gl, name).as_ref(), v);
    }
}

pub fn create_vertex_array(gl: &Gl) -> Result<WebGlVertexArrayObject, JsValue> {
    gl.create_vertex_array()
        .ok_or_else(|| JsValue::from_str("unable to create vertex array"))
}

pub fn create_buffer(gl: &Gl) -> Result<WebGlBuffer, JsValue> {
    gl.create_buffer()
        .ok_or_else(|| JsValue::from_str("unable to create buffer"))
}

/// Replace the contents of the bound `ARRAY_BUFFER`
pub fn upload(gl: &Gl, data: &[f32], usage: u32) {
    let array = Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, usage);
}

/// Overwrite part of the bound `ARRAY_BUFFER` starting at `offset` bytes
pub fn upload_range(gl: &Gl, offset: i32, data: &[f32]) {
    let array = Float32Array::from(data);
    gl.buffer_sub_data_with_i32_and_array_buffer_view(Gl::ARRAY_BUFFER, offset, &array);
}

pub fn byte_len(data: &[f32]) -> i32 {
    (data.len() * std::mem::size_of::<f32>()) as i32
}
