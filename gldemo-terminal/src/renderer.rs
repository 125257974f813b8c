/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use gldemo_core::lighting::{luminance, shade};
use gldemo_core::{Camera, Light, LightingModel, Material, PolyhedronMesh, ScreenPoint};
use nalgebra::{Matrix4, Point2, Point3, Vector3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Scene-wide inputs for shading a mesh
pub struct ShadingParams<'a> {
    pub light: &'a Light,
    pub material: &'a Material,
    pub view_position: Point3<f32>,
    pub lighting: LightingModel,
}

/// One projected vertex with the attributes the lighting paths interpolate
#[derive(Clone, Copy)]
struct RasterVertex {
    screen: ScreenPoint,
    world: Point3<f32>,
    normal: Vector3<f32>,
    brightness: f32,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

/// ASCII renderer that converts meshes and sketch primitives to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.cells.get(y * self.width + x).map(|c| c.ch)
    }

    /// Rasterize every triangle of `mesh` using its live normal buffer
    pub fn render_mesh(
        &mut self,
        mesh: &PolyhedronMesh,
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        camera: &Camera,
        params: &ShadingParams<'_>,
    ) {
        let model_view = view * model;
        for [a, b, c] in mesh.triangles() {
            let mut corners = [None; 3];
            for (corner, slot) in corners.iter_mut().zip([a, b, c]) {
                *corner = self.prepare_vertex(mesh, slot, model, &model_view, camera, params);
            }
            // Any corner outside the view volume drops the whole triangle
            if let [Some(v0), Some(v1), Some(v2)] = corners {
                self.rasterize_triangle([v0, v1, v2], params);
            }
        }
    }

    fn prepare_vertex(
        &self,
        mesh: &PolyhedronMesh,
        slot: usize,
        model: &Matrix4<f32>,
        model_view: &Matrix4<f32>,
        camera: &Camera,
        params: &ShadingParams<'_>,
    ) -> Option<RasterVertex> {
        let position = mesh.positions()[slot];
        let screen = camera.project_to_screen(
            &position,
            model_view,
            self.width as u32,
            self.height as u32,
        )?;
        let world = model.transform_point(&position);
        let normal = model.transform_vector(&mesh.normals()[slot]);
        let brightness = luminance(&shade(
            params.light,
            params.material,
            &world,
            &normal,
            &params.view_position,
        ));

        Some(RasterVertex {
            screen,
            world,
            normal,
            brightness,
        })
    }

    fn rasterize_triangle(&mut self, v: [RasterVertex; 3], params: &ShadingParams<'_>) {
        let xs = [v[0].screen.x, v[1].screen.x, v[2].screen.x];
        let ys = [v[0].screen.y, v[1].screen.y, v[2].screen.y];

        // Bounding box, clipped to screen bounds
        let min_x = xs.iter().copied().fold(f32::INFINITY, f32::min).floor().max(0.0) as i32;
        let max_x = (xs.iter().copied().fold(f32::NEG_INFINITY, f32::max).ceil() as i32)
            .min(self.width as i32 - 1);
        let min_y = ys.iter().copied().fold(f32::INFINITY, f32::min).floor().max(0.0) as i32;
        let max_y = (ys.iter().copied().fold(f32::NEG_INFINITY, f32::max).ceil() as i32)
            .min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((xs[0], ys[0]), (xs[1], ys[1]), (xs[2], ys[2]), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v[0].screen.depth + w1 * v[1].screen.depth + w2 * v[2].screen.depth;
                let idx = y as usize * self.width + x as usize;
                if depth >= self.depth_buffer[idx] {
                    continue;
                }

                let brightness = match params.lighting {
                    LightingModel::Gouraud => {
                        w0 * v[0].brightness + w1 * v[1].brightness + w2 * v[2].brightness
                    }
                    LightingModel::Phong => {
                        let world = Point3::from(
                            v[0].world.coords * w0 + v[1].world.coords * w1 + v[2].world.coords * w2,
                        );
                        let normal = v[0].normal * w0 + v[1].normal * w1 + v[2].normal * w2;
                        luminance(&shade(
                            params.light,
                            params.material,
                            &world,
                            &normal,
                            &params.view_position,
                        ))
                    }
                };

                self.depth_buffer[idx] = depth;
                self.cells[idx] = shade_cell(brightness);
            }
        }
    }

    /// Depth-tested single cell at a projected point
    pub fn draw_marker(&mut self, p: &ScreenPoint, ch: char, color: Color) {
        if p.x < 0.0 || p.y < 0.0 || p.x >= self.width as f32 || p.y >= self.height as f32 {
            return;
        }
        let idx = p.y as usize * self.width + p.x as usize;
        if p.depth >= self.depth_buffer[idx] {
            return;
        }
        self.depth_buffer[idx] = p.depth;
        self.cells[idx] = Cell { ch, color };
    }

    fn ndc_to_cell(&self, p: &Point2<f64>) -> (f64, f64) {
        (
            (p.x + 1.0) * 0.5 * self.width as f64,
            (1.0 - p.y) * 0.5 * self.height as f64,
        )
    }

    fn put(&mut self, x: i64, y: i64, ch: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = Cell { ch, color };
    }

    /// Draw a line between two NDC points
    pub fn draw_line(&mut self, from: &Point2<f64>, to: &Point2<f64>, ch: char, color: Color) {
        let (x0, y0) = self.ndc_to_cell(from);
        let (x1, y1) = self.ndc_to_cell(to);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            self.put(x.floor() as i64, y.floor() as i64, ch, color);
        }
    }

    /// Draw a closed polyline through NDC points
    pub fn draw_line_loop(&mut self, points: &[Point2<f64>], ch: char, color: Color) {
        for (i, p) in points.iter().enumerate() {
            let next = &points[(i + 1) % points.len()];
            self.draw_line(p, next, ch, color);
        }
    }

    pub fn draw_point(&mut self, p: &Point2<f64>, ch: char, color: Color) {
        let (x, y) = self.ndc_to_cell(p);
        self.put(x.floor() as i64, y.floor() as i64, ch, color);
    }

    /// Write text into the cell grid starting at `row`, clipped at the right edge
    pub fn draw_text(&mut self, row: usize, text: &str, color: Color) {
        for (x, ch) in text.chars().enumerate().take(self.width) {
            self.put(x as i64, row as i64, ch, color);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.ch))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn shade_cell(brightness: f32) -> Cell {
    let char_index = (brightness.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
    let ch = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

    // Color based on character intensity
    let color = match ch {
        ' ' | '.' | ':' => Color::DarkGrey,
        '-' | '=' => Color::Grey,
        '+' | '*' => Color::White,
        _ => Color::Cyan,
    };
    Cell { ch, color }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
