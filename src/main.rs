use std::sync::Arc;

use glam::Vec3;
use tracing::{error, info, warn};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use greybox::{controller, logging, model, ui, utils, view};

use controller::{InputState, KeyBindings, MovementIntegrator, OrbitRig, ProjectilePool, ShoulderRig};
use model::{Actor, Camera, Scene};
use view::render::{self, CameraUniform, InstanceRaw, LightingUniform, MAX_INSTANCES};
use view::GpuContext;

/// Which follow-camera variant drives the shared camera this frame. The
/// prototypes these came from disagree on feel, so both are kept and toggled
/// at runtime instead of being merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CameraMode {
    Orbit,
    Shoulder,
}

struct App {
    // Core GPU resources
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,

    // Rendering state
    pipeline: wgpu::RenderPipeline,
    cube_mesh: utils::MeshBuffer,
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    // egui
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Game state
    camera: Camera,
    camera_mode: CameraMode,
    orbit: OrbitRig,
    shoulder: ShoulderRig,
    actor: Actor,
    movement: MovementIntegrator,
    pool: ProjectilePool,
    scene: Scene,
    input_state: InputState,
    bindings: KeyBindings,

    // Pointer lock
    mouse_locked: bool,

    // Frame timing
    last_frame_time: std::time::Instant,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl App {
    async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();
        let gpu = GpuContext::new(&instance, surface, size.width, size.height).await;

        let device = gpu.device.clone();
        let queue = gpu.queue.clone();
        let config = gpu.config.clone();

        let depth_format = wgpu::TextureFormat::Depth32Float;
        let (depth_texture, depth_view) =
            render::create_depth_texture(&device, size.width, size.height);

        let camera = Camera::new(size.width, size.height);

        let camera_resources = render::create_camera_resources(&device);
        let camera_buffer = camera_resources.camera_buffer;
        let lighting_buffer = camera_resources.lighting_buffer;
        let camera_bgl = camera_resources.bind_group_layout;
        let camera_bind_group = camera_resources.camera_bind_group;

        let cam_buf_data = CameraUniform {
            view_proj: camera.view_proj().to_cols_array_2d(),
        };
        queue.write_buffer(&camera_buffer, 0, bytemuck::bytes_of(&cam_buf_data));

        // Fixed sun, written once
        let lighting_buf_data = LightingUniform {
            sun_dir: [0.4, 0.8, 0.45],
            sun_intensity: 1.0,
            ambient: 0.35,
            _pad1: 0.0,
            _pad2: 0.0,
            _pad3: 0.0,
        };
        queue.write_buffer(&lighting_buffer, 0, bytemuck::bytes_of(&lighting_buf_data));

        let pipeline = render::create_scene_pipeline(&device, config.format, &camera_bgl, depth_format);
        let cube_mesh = utils::create_unit_cube_mesh().upload(&device);
        let instance_buffer = render::create_instance_buffer(&device);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        // Initialize game systems
        let mut orbit = OrbitRig::default();
        let actor = Actor::new(Vec3::ZERO);
        let mut camera = camera;
        orbit.azimuth = std::f32::consts::PI;
        orbit.update(&mut camera, actor.position);

        Self {
            surface: gpu.surface,
            device,
            queue,
            config,
            size,
            window,
            pipeline,
            cube_mesh,
            instance_buffer,
            depth_texture,
            depth_view,
            camera_buffer,
            camera_bind_group,
            egui_renderer,
            egui_state,
            egui_ctx,
            camera,
            camera_mode: CameraMode::Orbit,
            orbit,
            shoulder: ShoulderRig::default(),
            actor,
            movement: MovementIntegrator::default(),
            pool: ProjectilePool::default(),
            scene: Scene::new(),
            input_state: InputState::new(),
            bindings: KeyBindings::default(),
            mouse_locked: false,
            last_frame_time: std::time::Instant::now(),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    /// Unlocked -> locked: grab and hide the cursor. Failure is logged and
    /// drag state is reset, never fatal.
    fn lock_pointer(&mut self) {
        let result = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));

        match result {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.mouse_locked = true;
                self.input_state.pointer_locked = true;
            }
            Err(e) => {
                warn!("pointer lock failed: {e}");
                self.input_state.reset_drag();
            }
        }
    }

    fn unlock_pointer(&mut self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            warn!("releasing cursor grab failed: {e}");
        }
        self.window.set_cursor_visible(true);
        self.mouse_locked = false;
        self.input_state.pointer_locked = false;
        self.input_state.reset_drag();
        self.input_state.clear_keys();
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        // Let egui process the event first, but never while the pointer is
        // locked for gameplay
        if !self.mouse_locked {
            let egui_captured = self
                .egui_state
                .on_window_event(self.window.as_ref(), event)
                .consumed;
            if egui_captured {
                return true;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            if *code == KeyCode::Escape {
                                self.unlock_pointer();
                            } else if *code == KeyCode::KeyC {
                                self.camera_mode = match self.camera_mode {
                                    CameraMode::Orbit => CameraMode::Shoulder,
                                    CameraMode::Shoulder => CameraMode::Orbit,
                                };
                                info!(mode = ?self.camera_mode, "camera rig switched");
                            } else if let Some(action) = self.bindings.action_for(*code) {
                                self.input_state.press(action);
                            }
                        }
                        ElementState::Released => {
                            if let Some(action) = self.bindings.action_for(*code) {
                                self.input_state.release(action);
                            }
                        }
                    }
                }
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if *state == ElementState::Pressed && *button == MouseButton::Left {
                    if self.mouse_locked {
                        self.input_state.queue_shoot();
                    } else {
                        self.lock_pointer();
                    }
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input_state
                    .set_pointer_pos(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::Focused(false) => {
                self.input_state.clear_keys();
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (depth_texture, depth_view) =
                render::create_depth_texture(&self.device, new_size.width, new_size.height);
            self.depth_texture = depth_texture;
            self.depth_view = depth_view;
            self.camera.set_aspect(new_size.width, new_size.height);
        }
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        if self.mouse_locked {
            self.input_state.add_look(dx as f32, dy as f32);
            // Keep a virtual pointer position for the shoulder rig while the
            // OS cursor is pinned
            let (px, py) = self.input_state.pointer_pos();
            self.input_state.set_pointer_pos(
                (px + dx as f32).clamp(0.0, self.size.width as f32),
                (py + dy as f32).clamp(0.0, self.size.height as f32),
            );
        }
    }

    fn update(&mut self, dt: f32) {
        // Update FPS
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        let move_input = self.input_state.move_input();
        let (dx, dy) = self.input_state.consume_look();

        if self.camera_mode == CameraMode::Orbit {
            self.orbit.apply_drag(dx, dy);
        }

        self.movement
            .update(&mut self.actor, &move_input, self.camera.forward(), dt);

        if self.input_state.take_shoot() {
            let dir = self.actor.facing();
            let muzzle = self.actor.position + dir * 1.5 + Vec3::Y;
            self.pool.shoot(muzzle, dir);
        }

        self.pool.update(dt, self.actor.position);
        self.scene.update(dt);

        match self.camera_mode {
            CameraMode::Orbit => {
                self.orbit.update(&mut self.camera, self.actor.position);
            }
            CameraMode::Shoulder => {
                let (px, py) = self.input_state.pointer_pos();
                let ndc = (
                    px / self.size.width as f32 * 2.0 - 1.0,
                    1.0 - py / self.size.height as f32 * 2.0,
                );
                let running = move_input.run && move_input.any_direction();
                self.shoulder
                    .update(&mut self.camera, self.actor.position, ndc, running);
            }
        }

        let cam_buf_data = CameraUniform {
            view_proj: self.camera.view_proj().to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&cam_buf_data));
    }

    /// Collect everything drawable into one instance list: ground slab,
    /// props, player, projectiles.
    fn build_instances(&self) -> Vec<InstanceRaw> {
        let mut instances = Vec::with_capacity(self.scene.props.len() + self.pool.len() + 2);

        let extent = self.scene.ground_extent;
        instances.push(InstanceRaw::new(
            Vec3::new(0.0, -0.25, 0.0),
            Vec3::new(extent * 2.0, 0.5, extent * 2.0),
            0.0,
            [0.35, 0.45, 0.35, 1.0],
        ));

        for prop in &self.scene.props {
            instances.push(InstanceRaw::new(
                prop.position,
                prop.scale,
                prop.yaw,
                prop.color,
            ));
        }

        instances.push(InstanceRaw::new(
            self.actor.position + Vec3::Y * 0.9,
            Vec3::new(0.8, 1.8, 0.8),
            self.actor.yaw,
            [0.25, 0.45, 0.9, 1.0],
        ));

        for p in self.pool.iter() {
            let scale = 0.25 * self.pool.scale_of(p).max(0.05);
            instances.push(InstanceRaw::new(
                p.position,
                Vec3::splat(scale),
                0.0,
                [1.0, 0.25, 0.2, 1.0],
            ));
        }

        if instances.len() > MAX_INSTANCES {
            warn!(
                count = instances.len(),
                max = MAX_INSTANCES,
                "dropping instances beyond buffer capacity"
            );
            instances.truncate(MAX_INSTANCES);
        }
        instances
    }

    fn render_ui(&mut self) -> (Vec<egui::epaint::ClippedShape>, egui::TexturesDelta) {
        let raw_input = self.egui_state.take_egui_input(&self.window);

        let mut ui_state = ui::UiState {
            fps: self.fps,
            player_pos: self.actor.position,
            speed: self.actor.velocity.length(),
            camera_mode: match self.camera_mode {
                CameraMode::Orbit => "orbit",
                CameraMode::Shoulder => "shoulder",
            },
            is_dodging: self.movement.is_dodging(),
            dodge_ready: self.movement.dodge_ready(),
            projectile_count: self.pool.len(),
            pointer_locked: self.mouse_locked,
            sensitivity: &mut self.orbit.tuning.sensitivity,
        };

        let output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw(ctx, &mut ui_state);
        });

        self.egui_state
            .handle_platform_output(&self.window, output.platform_output);
        (output.shapes, output.textures_delta)
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let instances = self.build_instances();
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let (shapes, textures_delta) = self.render_ui();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let primitives = self
            .egui_ctx
            .tessellate(shapes, self.window.scale_factor() as f32);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        // Upload egui textures
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.5,
                            g: 0.8,
                            b: 1.0,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.cube_mesh.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            render_pass.set_index_buffer(
                self.cube_mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..self.cube_mesh.index_count, 0, 0..instances.len() as u32);
        }

        // Render egui on top
        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(
                &mut egui_pass.forget_lifetime(),
                &primitives,
                &screen_descriptor,
            );
        }

        // Cleanup egui textures
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn main() {
    logging::init();

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("greybox")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = event_loop.create_window(window_attributes).unwrap();
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window.clone()));

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - app.last_frame_time).as_secs_f32().min(0.1);
                            app.last_frame_time = now;

                            app.update(dt);

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => error!("surface error: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent {
                event: winit::event::DeviceEvent::MouseMotion { delta },
                ..
            } => {
                app.handle_mouse_motion(delta.0, delta.1);
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        })
        .unwrap();
}
