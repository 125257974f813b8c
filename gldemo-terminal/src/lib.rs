/// Terminal front-end for the sketch and solid demos
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use gldemo_core::{
    canvas_to_ndc, Arcball, ArcballMode, Camera, Light, Material, PolyhedronMesh, Preview,
    ShadingAction, ShadingControls, Shape, Sketch, SketchEvent,
};
use nalgebra::{Matrix4, Point2, Point3, Vector3};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod renderer;

pub use config::AppConfig;
pub use renderer::{AsciiRenderer, ShadingParams};

/// Rows reserved at the top of the screen for overlay text
const OVERLAY_ROWS: usize = 3;

/// Cell drawn at the light position in the solid demo
const LAMP_MARKER: char = 'L';

/// Which demo the app runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Sketch,
    Solid(Shape),
}

impl Demo {
    /// Pick the demo from the command-line argument.
    ///
    /// No argument runs the sketch. A bare `solid` runs the shape named by
    /// `solid.shape` in the config; any other argument names a demo directly.
    pub fn select(arg: Option<&str>, config: &AppConfig) -> Result<Self, gldemo_core::MeshError> {
        match arg {
            None => Ok(Demo::Sketch),
            Some(name) if name.eq_ignore_ascii_case("solid") => config.solid.shape().map(Demo::Solid),
            Some(name) => name.parse(),
        }
    }
}

impl std::str::FromStr for Demo {
    type Err = gldemo_core::MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("sketch") {
            return Ok(Demo::Sketch);
        }
        s.parse().map(Demo::Solid)
    }
}

/// Circle, segment and intersection drawn with the mouse
pub struct SketchScene {
    sketch: Sketch,
    circle_segments: usize,
}

impl SketchScene {
    pub fn new(circle_segments: usize) -> Self {
        Self {
            sketch: Sketch::new(),
            circle_segments,
        }
    }

    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }

    pub fn handle_mouse(&mut self, kind: MouseEventKind, point: Point2<f64>) {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => self.sketch.pointer_down(point),
            MouseEventKind::Drag(MouseButton::Left) => self.sketch.pointer_move(point),
            MouseEventKind::Up(MouseButton::Left) => match self.sketch.pointer_up() {
                Some(SketchEvent::CircleCommitted(_)) => log::info!("circle committed"),
                Some(SketchEvent::SegmentCommitted(_, hit)) => log::info!("{}", hit),
                None => {}
            },
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: char) {
        if key == 'c' {
            self.sketch.reset();
            log::info!("sketch cleared");
        }
    }

    pub fn render(&self, renderer: &mut AsciiRenderer) {
        // axes
        renderer.draw_line(&Point2::new(-0.85, 0.0), &Point2::new(0.85, 0.0), '-', Color::DarkRed);
        renderer.draw_line(&Point2::new(0.0, -0.85), &Point2::new(0.0, 0.85), '|', Color::DarkGreen);

        if let Some(circle) = self.sketch.circle() {
            renderer.draw_line_loop(&circle.outline(self.circle_segments), 'o', Color::Magenta);
        }
        if let Some(segment) = self.sketch.segment() {
            renderer.draw_line(&segment.start, &segment.end, '#', Color::DarkCyan);
        }
        match self.sketch.preview() {
            Some(Preview::Circle(circle)) => {
                renderer.draw_line_loop(&circle.outline(self.circle_segments), '.', Color::Grey)
            }
            Some(Preview::Segment(segment)) => {
                renderer.draw_line(&segment.start, &segment.end, '.', Color::Grey)
            }
            None => {}
        }
        if let Some(hit) = self.sketch.intersection() {
            for p in hit.points() {
                renderer.draw_point(&p, '@', Color::Yellow);
            }
        }

        for (row, line) in self.sketch.overlay_lines().iter().take(OVERLAY_ROWS).enumerate() {
            renderer.draw_text(row, line, Color::White);
        }
    }
}

/// A lit polyhedron with flat/smooth and Phong/Gouraud toggles
pub struct SolidScene {
    mesh: PolyhedronMesh,
    controls: ShadingControls,
    arcball: Arcball,
    camera: Camera,
    light: Light,
    material: Material,
    spin: f32,
    rotation_speed: f32,
    dragging: bool,
}

impl SolidScene {
    pub fn new(shape: Shape, config: &AppConfig) -> Self {
        Self {
            mesh: shape.build(config.solid.mesh_options()),
            controls: ShadingControls::new(),
            arcball: config.arcball.arcball(),
            camera: Camera::default(),
            light: config.light.light(),
            material: config.light.material(),
            spin: 0.0,
            rotation_speed: config.solid.rotation_speed,
            dragging: false,
        }
    }

    pub fn mesh(&self) -> &PolyhedronMesh {
        &self.mesh
    }

    pub fn controls(&self) -> &ShadingControls {
        &self.controls
    }

    pub fn handle_key(&mut self, key: char) {
        match self.controls.handle_key(key) {
            Some(ShadingAction::NormalSet(kind)) => self.mesh.set_active_normal_set(kind),
            Some(ShadingAction::ResetView) => {
                self.arcball.reset();
                self.spin = 0.0;
            }
            Some(ShadingAction::ArcballMode(_)) | Some(ShadingAction::Lighting(_)) | None => {}
        }
    }

    pub fn handle_mouse(&mut self, kind: MouseEventKind, point: Point2<f64>) {
        let point = Point2::new(point.x as f32, point.y as f32);
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.dragging = true;
                self.arcball.begin_drag(point);
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging => self.arcball.drag_to(point),
            MouseEventKind::Up(MouseButton::Left) => {
                self.dragging = false;
                self.arcball.end_drag();
            }
            MouseEventKind::ScrollUp => self.arcball.zoom(-200.0),
            MouseEventKind::ScrollDown => self.arcball.zoom(200.0),
            _ => {}
        }
    }

    pub fn update(&mut self) {
        if !self.dragging {
            self.spin += self.rotation_speed;
        }
    }

    /// Model and view matrices for the current arcball mode
    fn matrices(&self) -> (Matrix4<f32>, Matrix4<f32>) {
        let spin = Matrix4::new_rotation(Vector3::new(0.0, self.spin, 0.0));
        match self.controls.arcball_mode {
            ArcballMode::Camera => (spin, self.arcball.view_matrix()),
            ArcballMode::Model => (
                self.arcball.model_rotation_matrix() * spin,
                self.arcball.camera_distance_matrix(),
            ),
        }
    }

    pub fn render(&mut self, renderer: &mut AsciiRenderer) {
        if let Some(normals) = self.mesh.take_normals_update() {
            log::debug!("normal buffer refreshed ({} floats)", normals.len());
        }

        // Terminal cells are roughly twice as tall as they are wide
        self.camera
            .resize(renderer.width() as u32, renderer.height() as u32 * 2);

        let (model, view) = self.matrices();
        let view_position = view
            .try_inverse()
            .map(|inv| inv.transform_point(&Point3::origin()))
            .unwrap_or(self.camera.position);
        let params = ShadingParams {
            light: &self.light,
            material: &self.material,
            view_position,
            lighting: self.controls.lighting,
        };
        renderer.render_mesh(&self.mesh, &model, &view, &self.camera, &params);

        let lamp = self.camera.project_to_screen(
            &self.light.position,
            &view,
            renderer.width() as u32,
            renderer.height() as u32,
        );
        if let Some(lamp) = lamp {
            renderer.draw_marker(&lamp, LAMP_MARKER, Color::Yellow);
        }

        renderer.draw_text(0, &self.controls.arcball_line(), Color::White);
        renderer.draw_text(1, &self.controls.status_line(), Color::White);
        renderer.draw_text(
            2,
            "a: arcball mode  r: reset  s/f: smooth/flat  g/p: Gouraud/Phong",
            Color::DarkGrey,
        );
    }
}

pub enum Scene {
    Sketch(SketchScene),
    Solid(SolidScene),
}

impl Scene {
    pub fn new(demo: Demo, config: &AppConfig) -> Self {
        match demo {
            Demo::Sketch => Scene::Sketch(SketchScene::new(config.sketch.circle_segments)),
            Demo::Solid(shape) => Scene::Solid(SolidScene::new(shape, config)),
        }
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    target_frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(demo: Demo, config: &AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene: Scene::new(demo, config),
            // Last row holds the status bar
            renderer: AsciiRenderer::new(width as usize, (height as usize).saturating_sub(1)),
            target_frame_time: Duration::from_millis(1000 / u64::from(config.render.target_fps.max(1))),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            cursor::Show,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event)?;
            }

            if let Scene::Solid(solid) = &mut self.scene {
                solid.update();
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char(c) => match &mut self.scene {
                    Scene::Sketch(sketch) => sketch.handle_key(c),
                    Scene::Solid(solid) => solid.handle_key(c),
                },
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                // Cell centres, mapped into the drawable area below the status bar
                let point = canvas_to_ndc(
                    f64::from(column) + 0.5,
                    f64::from(row) + 0.5,
                    self.renderer.width() as f64,
                    self.renderer.height() as f64,
                );
                match &mut self.scene {
                    Scene::Sketch(sketch) => sketch.handle_mouse(kind, point),
                    Scene::Solid(solid) => solid.handle_mouse(kind, point),
                }
            }
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                self.renderer =
                    AsciiRenderer::new(width as usize, (height as usize).saturating_sub(1));
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        match &mut self.scene {
            Scene::Sketch(sketch) => sketch.render(&mut self.renderer),
            Scene::Solid(solid) => solid.render(&mut self.renderer),
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let hint = match self.scene {
            Scene::Sketch(_) => "drag: circle, then segment  c: clear",
            Scene::Solid(_) => "drag: rotate  wheel: zoom",
        };
        queue!(
            stdout,
            cursor::MoveTo(0, self.renderer.height() as u16),
            SetForegroundColor(Color::Yellow),
            Print(format!("gldemo | FPS: {:.1} | {} | Q=Quit", self.fps, hint)),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gldemo_core::{NormalSet, SketchState};

    #[test]
    fn test_demo_from_str() {
        assert_eq!("sketch".parse::<Demo>().unwrap(), Demo::Sketch);
        assert_eq!("octahedron".parse::<Demo>().unwrap(), Demo::Solid(Shape::Octahedron));
        assert!("teapot".parse::<Demo>().is_err());
    }

    #[test]
    fn test_sketch_scene_mouse_sequence() {
        let mut scene = SketchScene::new(100);
        let drag = |scene: &mut SketchScene, from: (f64, f64), to: (f64, f64)| {
            scene.handle_mouse(MouseEventKind::Down(MouseButton::Left), Point2::new(from.0, from.1));
            scene.handle_mouse(MouseEventKind::Drag(MouseButton::Left), Point2::new(to.0, to.1));
            scene.handle_mouse(MouseEventKind::Up(MouseButton::Left), Point2::new(to.0, to.1));
        };
        drag(&mut scene, (0.0, 0.0), (0.0, 0.5));
        drag(&mut scene, (-1.0, 0.5), (1.0, 0.5));
        assert_eq!(scene.sketch().state(), SketchState::Complete);
        assert_eq!(scene.sketch().intersection().map(|i| i.count()), Some(1));

        let mut renderer = AsciiRenderer::new(40, 20);
        scene.render(&mut renderer);
        assert_eq!(renderer.char_at(0, 2), Some('I'));

        scene.handle_key('c');
        assert_eq!(scene.sketch().state(), SketchState::Idle);
    }

    #[test]
    fn test_solid_scene_keys_swap_normals() {
        let mut scene = SolidScene::new(Shape::Pyramid, &AppConfig::default());
        scene.handle_key('s');
        assert_eq!(scene.mesh().active_normal_set(), NormalSet::Smooth);
        assert_eq!(scene.mesh().normals(), scene.mesh().vertex_normals());
        scene.handle_key('g');
        assert_eq!(scene.controls().status_line(), "shading mode: SMOOTH (GOURAUD)");
        scene.handle_key('f');
        assert_eq!(scene.mesh().normals(), scene.mesh().face_normals());
    }

    #[test]
    fn test_solid_scene_draws_lamp_at_light_position() {
        let mut scene = SolidScene::new(Shape::Pyramid, &AppConfig::default());
        let mut renderer = AsciiRenderer::new(80, 30);
        scene.render(&mut renderer);

        let (_, view) = scene.matrices();
        let lamp = scene
            .camera
            .project_to_screen(&scene.light.position, &view, 80, 30)
            .unwrap();
        assert_eq!(
            renderer.char_at(lamp.x as usize, lamp.y as usize),
            Some(LAMP_MARKER)
        );
    }

    #[test]
    fn test_solid_argument_uses_configured_shape() {
        let mut config = AppConfig::default();
        config.solid.shape = "octahedron".to_string();

        assert_eq!(Demo::select(None, &config).unwrap(), Demo::Sketch);
        assert_eq!(Demo::select(Some("pyramid"), &config).unwrap(), Demo::Solid(Shape::Pyramid));
        let demo = Demo::select(Some("solid"), &config).unwrap();
        assert_eq!(demo, Demo::Solid(Shape::Octahedron));

        match Scene::new(demo, &config) {
            Scene::Solid(solid) => assert_eq!(solid.mesh().slot_count(), 24),
            Scene::Sketch(_) => panic!("expected the solid scene"),
        }
    }

    #[test]
    fn test_sketch_overlay_stays_in_reserved_rows() {
        let mut scene = SketchScene::new(100);
        for (from, to) in [((0.0, 0.0), (0.0, 0.5)), ((-1.0, 0.0), (1.0, 0.0))] {
            scene.handle_mouse(MouseEventKind::Down(MouseButton::Left), Point2::new(from.0, from.1));
            scene.handle_mouse(MouseEventKind::Drag(MouseButton::Left), Point2::new(to.0, to.1));
            scene.handle_mouse(MouseEventKind::Up(MouseButton::Left), Point2::new(to.0, to.1));
        }
        assert_eq!(scene.sketch().overlay_lines().len(), OVERLAY_ROWS);

        let mut renderer = AsciiRenderer::new(60, 20);
        scene.render(&mut renderer);
        for row in 0..OVERLAY_ROWS {
            assert_ne!(renderer.char_at(0, row), Some(' '));
        }
        assert_eq!(renderer.char_at(0, OVERLAY_ROWS), Some(' '));
    }

    #[test]
    fn test_solid_scene_renders_overlay() {
        let mut scene = SolidScene::new(Shape::Octahedron, &AppConfig::default());
        let mut renderer = AsciiRenderer::new(80, 30);
        scene.render(&mut renderer);
        assert_eq!(renderer.char_at(0, 1), Some('s'));
    }
}
