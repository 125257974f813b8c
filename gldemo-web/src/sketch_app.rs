//! Circle/segment sketch on a WebGL2 canvas.

use gldemo_core::{canvas_to_ndc, Preview, Sketch};
use js_sys::Array;
use nalgebra::Point2;
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext as Gl, WebGlBuffer, WebGlVertexArrayObject};

use crate::gl::{self, ShaderProgram};
use crate::shaders::{FLAT_2D_FRAG, FLAT_2D_VERT};

const CANVAS_SIZE: u32 = 700;
const CIRCLE_SEGMENTS: usize = 100;

const CIRCLE_COLOR: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
const SEGMENT_COLOR: [f32; 4] = [0.0, 0.5, 0.5, 1.0];
const PREVIEW_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const POINT_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const X_AXIS_COLOR: [f32; 4] = [1.0, 0.3, 0.3, 1.0];
const Y_AXIS_COLOR: [f32; 4] = [0.3, 1.0, 0.3, 1.0];

fn flatten(points: &[Point2<f64>]) -> Vec<f32> {
    points.iter().flat_map(|p| [p.x as f32, p.y as f32]).collect()
}

#[wasm_bindgen]
pub struct SketchApp {
    gl: Gl,
    program: ShaderProgram,
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    sketch: Sketch,
}

#[wasm_bindgen]
impl SketchApp {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<SketchApp, JsValue> {
        let gl = gl::context(canvas_id, CANVAS_SIZE, CANVAS_SIZE)?;
        gl.clear_color(0.1, 0.2, 0.3, 1.0);

        let program = ShaderProgram::new(&gl, FLAT_2D_VERT, FLAT_2D_FRAG)?;
        let vao = gl::create_vertex_array(&gl)?;
        let buffer = gl::create_buffer(&gl)?;

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        gl.vertex_attrib_pointer_with_i32(0, 2, Gl::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(0);
        gl.bind_vertex_array(None);

        Ok(SketchApp {
            gl,
            program,
            vao,
            buffer,
            sketch: Sketch::new(),
        })
    }

    fn to_ndc(x: f64, y: f64) -> Point2<f64> {
        let size = f64::from(CANVAS_SIZE);
        canvas_to_ndc(x, y, size, size)
    }

    /// Canvas-relative pixel coordinates
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.sketch.pointer_down(Self::to_ndc(x, y));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.sketch.is_dragging() {
            self.sketch.pointer_move(Self::to_ndc(x, y));
            self.render();
        }
    }

    pub fn pointer_up(&mut self) {
        if self.sketch.pointer_up().is_some() {
            self.render();
        }
    }

    pub fn reset(&mut self) {
        self.sketch.reset();
        self.render();
    }

    /// Text overlay lines for the committed shapes
    pub fn overlay(&self) -> Array {
        self.sketch
            .overlay_lines()
            .into_iter()
            .map(|line| JsValue::from_str(&line))
            .collect()
    }

    fn draw(&self, data: &[f32], mode: u32, color: [f32; 4]) {
        if data.is_empty() {
            return;
        }
        let gl = &self.gl;
        self.program.set_vec4(gl, "u_color", color);
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.buffer));
        gl::upload(gl, data, Gl::STATIC_DRAW);
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(mode, 0, (data.len() / 2) as i32);
    }

    pub fn render(&self) {
        let gl = &self.gl;
        gl.clear(Gl::COLOR_BUFFER_BIT);
        self.program.bind(gl);
        self.program.set_vec2(gl, "u_offset", 0.0, 0.0);

        self.draw(&[-0.85, 0.0, 0.85, 0.0], Gl::LINES, X_AXIS_COLOR);
        self.draw(&[0.0, -0.85, 0.0, 0.85], Gl::LINES, Y_AXIS_COLOR);

        if let Some(circle) = self.sketch.circle() {
            self.draw(&flatten(&circle.outline(CIRCLE_SEGMENTS)), Gl::LINE_LOOP, CIRCLE_COLOR);
        }
        if let Some(segment) = self.sketch.segment() {
            self.draw(&flatten(&[segment.start, segment.end]), Gl::LINES, SEGMENT_COLOR);
        }
        match self.sketch.preview() {
            Some(Preview::Circle(circle)) => {
                self.draw(&flatten(&circle.outline(CIRCLE_SEGMENTS)), Gl::LINE_LOOP, PREVIEW_COLOR)
            }
            Some(Preview::Segment(segment)) => {
                self.draw(&flatten(&[segment.start, segment.end]), Gl::LINES, PREVIEW_COLOR)
            }
            None => {}
        }
        if let Some(hit) = self.sketch.intersection() {
            self.draw(&hit.flat_points(), Gl::POINTS, POINT_COLOR);
        }

        gl.bind_vertex_array(None);
    }
}
