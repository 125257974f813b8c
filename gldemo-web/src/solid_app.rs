//! Lit pyramid/octahedron with flat/smooth and Phong/Gouraud switching.

use gldemo_core::{
    canvas_to_ndc, Arcball, ArcballMode, Camera, Light, LightingModel, Material, PolyhedronMesh,
    ShadingAction, ShadingControls, Shape,
};
use js_sys::Array;
use nalgebra::{Matrix4, Point2, Point3};
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext as Gl, WebGlBuffer, WebGlVertexArrayObject};

use crate::gl::{self, ShaderProgram};
use crate::shaders::{gouraud_sources, phong_sources, FLAT_2D_FRAG, FLAT_2D_VERT};

const CANVAS_SIZE: u32 = 700;
const LAMP_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[wasm_bindgen]
pub struct SolidApp {
    gl: Gl,
    phong: ShaderProgram,
    gouraud: ShaderProgram,
    vao: WebGlVertexArrayObject,
    vbo: WebGlBuffer,
    /// Byte offset of the normal region inside `vbo`
    normal_offset: i32,
    lamp_program: ShaderProgram,
    lamp_vao: WebGlVertexArrayObject,
    lamp_buffer: WebGlBuffer,
    mesh: PolyhedronMesh,
    controls: ShadingControls,
    arcball: Arcball,
    camera: Camera,
    light: Light,
    material: Material,
}

#[wasm_bindgen]
impl SolidApp {
    /// `shape` is `"pyramid"` or `"octahedron"`
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, shape: &str) -> Result<SolidApp, JsValue> {
        let shape: Shape = shape
            .parse()
            .map_err(|e: gldemo_core::MeshError| JsValue::from_str(&e.to_string()))?;
        let mesh = shape.build(Default::default());

        let gl = gl::context(canvas_id, CANVAS_SIZE, CANVAS_SIZE)?;
        gl.clear_color(0.1, 0.1, 0.1, 1.0);
        gl.enable(Gl::DEPTH_TEST);

        let (vert, frag) = phong_sources();
        let phong = ShaderProgram::new(&gl, &vert, &frag)?;
        let (vert, frag) = gouraud_sources();
        let gouraud = ShaderProgram::new(&gl, &vert, &frag)?;

        let vao = gl::create_vertex_array(&gl)?;
        let vbo = gl::create_buffer(&gl)?;
        let normal_offset = Self::upload_mesh(&gl, &vao, &vbo, &mesh);

        let lamp_program = ShaderProgram::new(&gl, FLAT_2D_VERT, FLAT_2D_FRAG)?;
        let lamp_vao = gl::create_vertex_array(&gl)?;
        let lamp_buffer = gl::create_buffer(&gl)?;
        gl.bind_vertex_array(Some(&lamp_vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&lamp_buffer));
        gl.vertex_attrib_pointer_with_i32(0, 2, Gl::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(0);
        gl.bind_vertex_array(None);

        let app = SolidApp {
            gl,
            phong,
            gouraud,
            vao,
            vbo,
            normal_offset,
            lamp_program,
            lamp_vao,
            lamp_buffer,
            mesh,
            controls: ShadingControls::new(),
            arcball: Arcball::default(),
            camera: Camera::new(CANVAS_SIZE, CANVAS_SIZE),
            light: Light::default(),
            material: Material::default(),
        };
        for program in [&app.phong, &app.gouraud] {
            app.set_static_uniforms(program);
        }
        Ok(app)
    }

    /// Lay the attributes out back to back: positions, normals, colors, texture coordinates
    fn upload_mesh(gl: &Gl, vao: &WebGlVertexArrayObject, vbo: &WebGlBuffer, mesh: &PolyhedronMesh) -> i32 {
        let positions = mesh.position_buffer();
        let normals = mesh.normal_buffer();
        let colors = mesh.color_buffer();
        let tex_coords = mesh.tex_coord_buffer();

        let v_size = gl::byte_len(&positions);
        let n_size = gl::byte_len(&normals);
        let c_size = gl::byte_len(&colors);
        let t_size = gl::byte_len(&tex_coords);

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_with_i32(Gl::ARRAY_BUFFER, v_size + n_size + c_size + t_size, Gl::STATIC_DRAW);
        gl::upload_range(gl, 0, &positions);
        gl::upload_range(gl, v_size, &normals);
        gl::upload_range(gl, v_size + n_size, &colors);
        gl::upload_range(gl, v_size + n_size + c_size, &tex_coords);

        gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, 0, 0);
        gl.vertex_attrib_pointer_with_i32(1, 3, Gl::FLOAT, false, 0, v_size);
        gl.vertex_attrib_pointer_with_i32(2, 4, Gl::FLOAT, false, 0, v_size + n_size);
        gl.vertex_attrib_pointer_with_i32(3, 2, Gl::FLOAT, false, 0, v_size + n_size + c_size);
        for location in 0..4 {
            gl.enable_vertex_attrib_array(location);
        }

        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);
        v_size
    }

    fn set_static_uniforms(&self, program: &ShaderProgram) {
        let gl = &self.gl;
        program.bind(gl);
        program.set_mat4(gl, "u_projection", &self.camera.projection_matrix());
        program.set_vec3(gl, "material.diffuse", &self.material.diffuse);
        program.set_vec3(gl, "material.specular", &self.material.specular);
        program.set_float(gl, "material.shininess", self.material.shininess);
        program.set_point3(gl, "light.position", &self.light.position);
        program.set_vec3(gl, "light.ambient", &self.light.ambient);
        program.set_vec3(gl, "light.diffuse", &self.light.diffuse);
        program.set_vec3(gl, "light.specular", &self.light.specular);
    }

    /// `KeyboardEvent.key`; returns true when the key was bound
    pub fn key_down(&mut self, key: &str) -> bool {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return false;
        };
        match self.controls.handle_key(c) {
            Some(ShadingAction::NormalSet(kind)) => self.mesh.set_active_normal_set(kind),
            Some(ShadingAction::ResetView) => self.arcball.reset(),
            Some(ShadingAction::ArcballMode(_)) | Some(ShadingAction::Lighting(_)) => {}
            None => return false,
        }
        true
    }

    fn to_ndc(x: f64, y: f64) -> Point2<f32> {
        let size = f64::from(CANVAS_SIZE);
        let p = canvas_to_ndc(x, y, size, size);
        Point2::new(p.x as f32, p.y as f32)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.arcball.begin_drag(Self::to_ndc(x, y));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.arcball.drag_to(Self::to_ndc(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.arcball.end_drag();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.arcball.zoom(delta_y);
    }

    /// Overlay lines: arcball mode, shading mode, key help
    pub fn overlay(&self) -> Array {
        let mut lines = vec![self.controls.arcball_line(), self.controls.status_line()];
        lines.extend(ShadingControls::help_lines().iter().map(|s| s.to_string()));
        lines.into_iter().map(|line| JsValue::from_str(&line)).collect()
    }

    pub fn render(&mut self) {
        let gl = &self.gl;

        if let Some(normals) = self.mesh.take_normals_update() {
            gl.bind_vertex_array(Some(&self.vao));
            gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.vbo));
            gl::upload_range(gl, self.normal_offset, &normals);
            gl.bind_buffer(Gl::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);
        }

        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        let (model, view) = match self.controls.arcball_mode {
            ArcballMode::Camera => (Matrix4::identity(), self.arcball.view_matrix()),
            ArcballMode::Model => (
                self.arcball.model_rotation_matrix(),
                self.arcball.camera_distance_matrix(),
            ),
        };
        let program = match self.controls.lighting {
            LightingModel::Phong => &self.phong,
            LightingModel::Gouraud => &self.gouraud,
        };

        program.bind(gl);
        program.set_mat4(gl, "u_model", &model);
        program.set_mat4(gl, "u_view", &view);
        let eye = view
            .try_inverse()
            .map(|inv| inv.transform_point(&Point3::origin()))
            .unwrap_or(self.camera.position);
        program.set_point3(gl, "u_viewPos", &eye);

        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(Gl::TRIANGLES, 0, self.mesh.slot_count() as i32);
        gl.bind_vertex_array(None);

        self.draw_lamp(&view);
    }

    /// Mark the light position with a point sprite drawn over the mesh
    fn draw_lamp(&self, view: &Matrix4<f32>) {
        let Some(ndc) = self.camera.project_to_ndc(&self.light.position, view) else {
            return;
        };
        let gl = &self.gl;
        gl.disable(Gl::DEPTH_TEST);
        self.lamp_program.bind(gl);
        self.lamp_program.set_vec2(gl, "u_offset", 0.0, 0.0);
        self.lamp_program.set_vec4(gl, "u_color", LAMP_COLOR);
        gl.bind_vertex_array(Some(&self.lamp_vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.lamp_buffer));
        gl::upload(gl, &[ndc.x, ndc.y], Gl::DYNAMIC_DRAW);
        gl.draw_arrays(Gl::POINTS, 0, 1);
        gl.bind_vertex_array(None);
        gl.enable(Gl::DEPTH_TEST);
    }
}
