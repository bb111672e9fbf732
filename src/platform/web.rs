//! Browser frontend
//!
//! Canvas2D drawing surface, DOM HUD, input wiring and the
//! requestAnimationFrame loop. [`SummitGame`] is the handle exported to JS.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

use crate::render::{Color, Paint, Renderer, Surface, css_color};
use crate::sim::{
    DriveInput, ExternalVehicle, FuelGauge, Phase, RunSummary, Session, TerrainFollower, Vehicle,
    VehicleState,
};
use crate::{DistanceRecord, QualityPreset, Settings, Tuning, Viewport};

/// Backing store resolution cap
const MAX_DPR: f64 = 2.0;

fn warn_on_err(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("{} failed: {:?}", what, e);
    }
}

/// [`Surface`] over a Canvas 2D context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn apply_fill(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&css_color(*color)),
            Paint::LinearGradient(g) => {
                let gradient = self.ctx.create_linear_gradient(
                    g.from.x as f64,
                    g.from.y as f64,
                    g.to.x as f64,
                    g.to.y as f64,
                );
                for (offset, color) in &g.stops {
                    warn_on_err("addColorStop", gradient.add_color_stop(*offset, &css_color(*color)));
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        warn_on_err("translate", self.ctx.translate(offset.x as f64, offset.y as f64));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn clear(&mut self, size: Vec2) {
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint) {
        self.apply_fill(paint);
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Vec2) {
        self.ctx.move_to(p.x as f64, p.y as f64);
    }

    fn line_to(&mut self, p: Vec2) {
        self.ctx.line_to(p.x as f64, p.y as f64);
    }

    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) {
        warn_on_err(
            "arc",
            self.ctx.arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                start as f64,
                end as f64,
            ),
        );
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self, paint: &Paint) {
        self.apply_fill(paint);
        self.ctx.fill();
    }

    fn stroke(&mut self, color: Color, width: f32) {
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, at: Vec2, font: &str, color: Color) {
        self.ctx.set_font(font);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&css_color(color));
        warn_on_err("fillText", self.ctx.fill_text(text, at.x as f64, at.y as f64));
    }
}

/// Which body feeds the session
enum Driver {
    /// Kinematic follower driven by the page's own input
    Builtin(TerrainFollower),
    /// Truck simulated by the JS host, pushed in with `set_vehicle`
    Host(ExternalVehicle),
}

impl Driver {
    fn vehicle(&mut self) -> &mut dyn Vehicle {
        match self {
            Driver::Builtin(v) => v,
            Driver::Host(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pedal {
    Gas,
    Brake,
}

struct Game {
    session: Session,
    renderer: Renderer,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    document: Document,
    settings: Settings,
    driver: Driver,
    /// Keyboard pedals
    keys: DriveInput,
    /// Active pointers and the pedal zone under each
    pointers: Vec<(i32, Pedal)>,
    last_time: f64,
    last_phase: Phase,
    last_summary: Option<RunSummary>,
    fps: f32,
}

impl Game {
    fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a 2d context"))?;

        let seed = js_sys::Date::now() as u64;
        log::info!("Summit initialized with seed: {}", seed);

        let mut game = Self {
            session: Session::new(seed, Tuning::default(), DistanceRecord::load()),
            renderer: Renderer::new(Viewport::default()),
            surface: CanvasSurface::new(ctx),
            canvas,
            document,
            settings: Settings::load(),
            driver: Driver::Builtin(TerrainFollower::default()),
            keys: DriveInput::default(),
            pointers: Vec::new(),
            last_time: 0.0,
            last_phase: Phase::Start,
            last_summary: None,
            fps: 0.0,
        };
        game.resize();
        game.sync_screens();
        Ok(game)
    }

    fn resize(&mut self) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .min(MAX_DPR);
        let width = self.canvas.client_width().max(1) as f64;
        let height = self.canvas.client_height().max(1) as f64;
        self.canvas.set_width((width * dpr) as u32);
        self.canvas.set_height((height * dpr) as u32);
        warn_on_err(
            "setTransform",
            self.surface.context().set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0),
        );

        let viewport = Viewport::new(width as f32, height as f32);
        self.session.resize(viewport);
        self.renderer.resize(viewport);
    }

    fn input(&self) -> DriveInput {
        DriveInput {
            gas: self.keys.gas || self.pointers.iter().any(|(_, p)| *p == Pedal::Gas),
            brake: self.keys.brake || self.pointers.iter().any(|(_, p)| *p == Pedal::Brake),
        }
    }

    fn pedal_at(&self, client_x: i32) -> Pedal {
        if client_x < self.canvas.client_width() / 2 {
            Pedal::Brake
        } else {
            Pedal::Gas
        }
    }

    fn start(&mut self) {
        self.last_summary = None;
        self.session.start(self.driver.vehicle());
        self.sync_screens();
    }

    fn toggle_pause(&mut self) {
        match self.session.phase() {
            Phase::Playing => self.session.pause(),
            Phase::Paused => self.session.resume(),
            _ => {}
        }
        self.sync_screens();
    }

    fn frame(&mut self, dt: f32) -> Option<RunSummary> {
        let input = self.input();
        let summary = self.session.frame(dt, self.driver.vehicle(), &input);
        if summary.is_some() {
            self.last_summary = summary;
        }
        if dt > 0.0 {
            self.fps = self.fps * 0.9 + (1.0 / dt) * 0.1;
        }
        if self.session.phase() != self.last_phase {
            self.sync_screens();
        }
        summary
    }

    fn render(&mut self) {
        self.renderer
            .draw(&mut self.surface, &self.session, &self.settings);
    }

    /// Step to the next quality preset and remember it
    fn cycle_quality(&mut self) {
        let next = self.settings.quality.next();
        if self.settings.set_quality(next) {
            log::info!("Quality set to {}", next.as_str());
        }
    }

    fn set_visible(&self, id: &str, visible: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            if let Err(e) = el.class_list().toggle_with_force("hidden", !visible) {
                log::warn!("Failed to toggle #{}: {:?}", id, e);
            }
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Show the overlay for the current phase
    fn sync_screens(&mut self) {
        let phase = self.session.phase();
        self.last_phase = phase;

        let in_run = matches!(phase, Phase::Playing | Phase::Paused);
        self.set_visible("start-screen", phase == Phase::Start);
        self.set_visible("pause-screen", phase == Phase::Paused);
        self.set_visible("gameover-screen", phase == Phase::GameOver);
        self.set_visible("hud", in_run);
        self.set_visible("fuel-container", in_run);

        if let (Phase::GameOver, Some(summary)) = (phase, self.last_summary) {
            self.set_text("gameover-distance", &format!("{}m", summary.distance_m));
            self.set_text("gameover-best", &format!("BEST: {}m", summary.best_m));
            self.set_visible("gameover-new-record", summary.new_record);
        }
    }

    /// Per-frame DOM updates
    fn update_hud(&self) {
        self.set_text(
            "distance-display",
            &format!("{}m", self.session.distance().floor() as u32),
        );

        let fuel = self.session.fuel();
        if let Some(el) = self.document.get_element_by_id("fuel-bar-fill") {
            let _ = el.set_attribute("style", &format!("width: {}%", fuel.percent()));
            let active = fuel.gauge().css_class();
            let classes = el.class_list();
            for gauge in [FuelGauge::Warning, FuelGauge::Critical] {
                if let Some(class) = gauge.css_class() {
                    let _ = classes.toggle_with_force(class, active == Some(class));
                }
            }
        }

        if self.settings.show_fps {
            self.set_text("hud-fps", &format!("{}", self.fps.round() as u32));
        }
    }
}

fn install_handlers(game: &Rc<RefCell<Game>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    // Keyboard
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "ArrowRight" | "d" | "D" => g.keys.gas = true,
                "ArrowLeft" | "a" | "A" => g.keys.brake = true,
                "Escape" | "p" | "P" => g.toggle_pause(),
                "q" | "Q" => g.cycle_quality(),
                " " | "Enter" => {
                    if matches!(g.session.phase(), Phase::Start | Phase::GameOver) {
                        g.start();
                    }
                }
                _ => {}
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "ArrowRight" | "d" | "D" => g.keys.gas = false,
                "ArrowLeft" | "a" | "A" => g.keys.brake = false,
                _ => {}
            }
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch zones: left half brakes, right half accelerates
    let canvas = game.borrow().canvas.clone();
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            event.prevent_default();
            let mut g = game.borrow_mut();
            let pedal = g.pedal_at(event.client_x());
            let id = event.pointer_id();
            g.pointers.retain(|(p, _)| *p != id);
            g.pointers.push((id, pedal));
        });
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let mut g = game.borrow_mut();
            let pedal = g.pedal_at(event.client_x());
            let id = event.pointer_id();
            if let Some(entry) = g.pointers.iter_mut().find(|(p, _)| *p == id) {
                entry.1 = pedal;
            }
        });
        canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    for kind in ["pointerup", "pointercancel", "pointerleave"] {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let id = event.pointer_id();
            game.borrow_mut().pointers.retain(|(p, _)| *p != id);
        });
        canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Resize
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Auto-pause when the window loses focus
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            if g.session.phase() == Phase::Playing {
                g.toggle_pause();
                log::info!("Auto-paused (window blur)");
            }
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Overlay buttons, when the page has them
    let buttons: [(&str, fn(&mut Game)); 4] = [
        ("start-play-btn", Game::start),
        ("gameover-retry-btn", Game::start),
        ("pause-btn", Game::toggle_pause),
        ("pause-resume-btn", Game::toggle_pause),
    ];
    let document = game.borrow().document.clone();
    for (id, action) in buttons {
        let Some(button) = document.get_element_by_id(id) else {
            continue;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&mut game.borrow_mut());
        });
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn request_animation_frame(game: Rc<RefCell<Game>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(game, time);
    });
    warn_on_err(
        "requestAnimationFrame",
        window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map(|_| ()),
    );
    closure.forget();
}

fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
    {
        let mut g = game.borrow_mut();

        let dt = if g.last_time > 0.0 {
            ((time - g.last_time) / 1000.0) as f32
        } else {
            0.0
        };
        g.last_time = time;

        g.frame(dt);
        g.render();
        g.update_hud();
    }

    request_animation_frame(game);
}

/// JS handle to a running game
#[wasm_bindgen]
pub struct SummitGame {
    game: Rc<RefCell<Game>>,
}

#[wasm_bindgen]
impl SummitGame {
    /// Bind to a canvas element and install input handlers
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<SummitGame, JsValue> {
        let game = Rc::new(RefCell::new(Game::new(canvas_id)?));
        install_handlers(&game)?;
        Ok(Self { game })
    }

    /// Drive frames from requestAnimationFrame
    pub fn run(&self) {
        request_animation_frame(self.game.clone());
        log::info!("Summit running!");
    }

    pub fn start(&self) {
        self.game.borrow_mut().start();
    }

    pub fn pause(&self) {
        let mut g = self.game.borrow_mut();
        if g.session.phase() == Phase::Playing {
            g.toggle_pause();
        }
    }

    pub fn resume(&self) {
        let mut g = self.game.borrow_mut();
        if g.session.phase() == Phase::Paused {
            g.toggle_pause();
        }
    }

    /// Select a quality preset by name ("low", "medium", "high"); persisted.
    /// Returns false for an unknown name.
    pub fn set_quality(&self, name: &str) -> bool {
        match QualityPreset::from_str(name) {
            Some(preset) => {
                self.game.borrow_mut().settings.set_quality(preset);
                true
            }
            None => {
                log::warn!("Unknown quality preset {:?}", name);
                false
            }
        }
    }

    pub fn quality(&self) -> String {
        self.game.borrow().settings.quality.as_str().to_string()
    }

    /// Push the host truck's state; switches the session to the host body
    pub fn set_vehicle(&self, x: f32, y: f32, vx: f32, vy: f32, angle: f32, grounded: bool) {
        let mut g = self.game.borrow_mut();
        let state = VehicleState {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            angle,
            grounded,
        };
        match &mut g.driver {
            Driver::Host(vehicle) => vehicle.set_state(state),
            driver => {
                let mut vehicle = ExternalVehicle::default();
                vehicle.set_state(state);
                *driver = Driver::Host(vehicle);
                log::info!("Vehicle now driven by host");
            }
        }
    }

    /// Gas pedal held (for host-simulated trucks)
    pub fn gas(&self) -> bool {
        self.game.borrow().input().gas
    }

    pub fn brake(&self) -> bool {
        self.game.borrow().input().brake
    }

    /// Advance one frame; true when the run ended on this frame
    pub fn frame(&self, dt: f32) -> bool {
        self.game.borrow_mut().frame(dt).is_some()
    }

    pub fn render(&self) {
        let mut g = self.game.borrow_mut();
        g.render();
        g.update_hud();
    }

    pub fn resize(&self) {
        self.game.borrow_mut().resize();
    }

    pub fn fuel_percent(&self) -> f32 {
        self.game.borrow().session.fuel().percent()
    }

    /// Meters travelled this run
    pub fn distance(&self) -> f32 {
        self.game.borrow().session.distance()
    }

    pub fn best_distance(&self) -> u32 {
        self.game.borrow().session.record().best
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.game.borrow().session.phase())
    }
}

#[wasm_bindgen(start)]
pub fn boot() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger init failed: {e}").into());
    }
    log::info!("Summit starting...");
}
