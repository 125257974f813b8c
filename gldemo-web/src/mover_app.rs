//! Arrow-key square mover.

use gldemo_core::{Direction, KeyMover};
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext as Gl, WebGlVertexArrayObject};

use crate::gl::{self, ShaderProgram};
use crate::shaders::{FLAT_2D_FRAG, FLAT_2D_VERT};

const CANVAS_SIZE: u32 = 600;
const SQUARE: [f32; 8] = [-0.1, -0.1, 0.1, -0.1, 0.1, 0.1, -0.1, 0.1];

fn direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

#[wasm_bindgen]
pub struct MoverApp {
    gl: Gl,
    program: ShaderProgram,
    vao: WebGlVertexArrayObject,
    mover: KeyMover,
}

#[wasm_bindgen]
impl MoverApp {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<MoverApp, JsValue> {
        let gl = gl::context(canvas_id, CANVAS_SIZE, CANVAS_SIZE)?;
        gl.clear_color(0.1, 0.2, 0.3, 1.0);

        let program = ShaderProgram::new(&gl, FLAT_2D_VERT, FLAT_2D_FRAG)?;
        let vao = gl::create_vertex_array(&gl)?;
        let buffer = gl::create_buffer(&gl)?;

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        gl::upload(&gl, &SQUARE, Gl::STATIC_DRAW);
        gl.vertex_attrib_pointer_with_i32(0, 2, Gl::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(0);
        gl.bind_vertex_array(None);

        Ok(MoverApp {
            gl,
            program,
            vao,
            mover: KeyMover::default(),
        })
    }

    /// `KeyboardEvent.key` of a pressed key; non-arrow keys are ignored
    pub fn key_down(&mut self, key: &str) {
        if let Some(d) = direction(key) {
            self.mover.key_down(d);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(d) = direction(key) {
            self.mover.key_up(d);
        }
    }

    /// Draw one animation frame, then advance the square
    pub fn frame(&mut self) {
        let gl = &self.gl;
        gl.clear(Gl::COLOR_BUFFER_BIT);

        let offset = self.mover.displacement();
        self.program.bind(gl);
        self.program.set_vec2(gl, "u_offset", offset.x, offset.y);
        self.program.set_vec4(gl, "u_color", [1.0, 0.0, 0.0, 1.0]);
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(Gl::TRIANGLE_FAN, 0, 4);
        gl.bind_vertex_array(None);

        self.mover.step();
    }
}
