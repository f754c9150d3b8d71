use crate::mesh::{self, Vertex};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use glowrig_common::EntityId;
use glowrig_render::RenderContext;
use glowrig_scene::{CameraState, Geometry, Scene};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    /// xyz = key light direction, w = key intensity.
    light_dir: [f32; 4],
    /// x = ambient intensity.
    ambient: [f32; 4],
    camera_right: [f32; 4],
    camera_up: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    /// rgb + opacity.
    color: [f32; 4],
    /// rgb + intensity.
    emissive: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct StarUniforms {
    /// x = point size, y = opacity.
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct StarCorner {
    corner: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct StarInstance {
    center: [f32; 3],
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Live wgpu rendering context bound to a window surface.
///
/// Geometry is uploaded on first sight and cached by entity id; material and
/// transform values are re-read from the scene every frame.
pub struct WgpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    mesh_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,
    frame_uniform_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    star_uniform_buffer: wgpu::Buffer,
    star_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,
    meshes: BTreeMap<EntityId, GpuMesh>,
    stars: Option<(EntityId, wgpu::Buffer, u32)>,
    depth_texture: wgpu::TextureView,
    overlay_ctx: egui::Context,
    overlay_renderer: egui_wgpu::Renderer,
    status_text: Option<String>,
}

impl WgpuContext {
    pub(crate) fn new(
        surface: wgpu::Surface<'static>,
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
    ) -> Self {
        let frame_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniform_buffer"),
            contents: bytemuck::bytes_of(&FrameUniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                light_dir: [0.0, 1.0, 0.0, 0.0],
                ambient: [1.0, 0.0, 0.0, 0.0],
                camera_right: [1.0, 0.0, 0.0, 0.0],
                camera_up: [0.0, 1.0, 0.0, 0.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let star_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star_uniform_buffer"),
            contents: bytemuck::bytes_of(&StarUniforms {
                params: [0.01, 1.0, 0.0, 0.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[uniform_layout_entry(0)],
        });
        let star_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("star_bind_group_layout"),
            entries: &[uniform_layout_entry(0)],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform_buffer.as_entire_binding(),
            }],
        });
        let star_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("star_bind_group"),
            layout: &star_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: star_uniform_buffer.as_entire_binding(),
            }],
        });

        let mesh_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("mesh_pipeline_layout"),
                bind_group_layouts: &[&frame_layout],
                push_constant_ranges: &[],
            });
        let star_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("star_pipeline_layout"),
                bind_group_layouts: &[&frame_layout, &star_layout],
                push_constant_ranges: &[],
            });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });
        let star_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::STAR_SHADER.into()),
        });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&mesh_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // The glass panel is a single quad seen from both sides.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let star_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star_pipeline"),
            layout: Some(&star_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &star_shader,
                entry_point: Some("vs_star"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<StarCorner>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<StarInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![1 => Float32x3],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &star_shader,
                entry_point: Some("fs_star"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                // Stars are backdrop; they test depth but never occlude.
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let quad_corners = [
            StarCorner { corner: [-0.5, -0.5] },
            StarCorner { corner: [0.5, -0.5] },
            StarCorner { corner: [0.5, 0.5] },
            StarCorner { corner: [-0.5, 0.5] },
        ];
        let quad_indices: [u16; 6] = [0, 1, 2, 2, 3, 0];
        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star_quad_vertex_buffer"),
            contents: bytemuck::cast_slice(&quad_corners),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star_quad_index_buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // The scene holds a handful of meshes; 64 leaves headroom.
        let max_instances = 64u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(&device, config.width, config.height);
        let overlay_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1, false);

        Self {
            surface,
            device,
            queue,
            config,
            mesh_pipeline,
            star_pipeline,
            frame_uniform_buffer,
            frame_bind_group,
            star_uniform_buffer,
            star_bind_group,
            instance_buffer,
            max_instances,
            quad_vertex_buffer,
            quad_index_buffer,
            meshes: BTreeMap::new(),
            stars: None,
            depth_texture,
            overlay_ctx: egui::Context::default(),
            overlay_renderer,
            status_text: None,
        }
    }

    /// Text for the status banner drawn over the scene, or None to hide it.
    pub fn set_status(&mut self, text: Option<String>) {
        self.status_text = text;
    }

    fn ensure_mesh(&mut self, id: EntityId, geometry: &Geometry) {
        if self.meshes.contains_key(&id) {
            return;
        }
        let (vertices, indices) = match geometry {
            Geometry::Box {
                width,
                height,
                depth,
            } => mesh::box_mesh(*width, *height, *depth),
            Geometry::Plane { width, height } => mesh::plane_mesh(*width, *height),
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => mesh::torus_mesh(*radius, *tube, *radial_segments, *tubular_segments),
            Geometry::Points { .. } => return,
        };
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_index_buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.meshes.insert(
            id,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: indices.len() as u32,
            },
        );
    }

    fn ensure_stars(&mut self, id: EntityId, positions: &[[f32; 3]]) {
        if matches!(&self.stars, Some((cached, _, _)) if *cached == id) {
            return;
        }
        let instances: Vec<StarInstance> = positions
            .iter()
            .map(|p| StarInstance { center: *p })
            .collect();
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("star_instance_buffer"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.stars = Some((id, buffer, instances.len() as u32));
    }

    /// Paint the status banner into the current frame. The overlay is not
    /// interactive, so egui runs on a synthetic input carrying only the
    /// screen rect.
    fn draw_status(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        text: &str,
    ) {
        let screen = egui::vec2(self.config.width as f32, self.config.height as f32);
        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, screen)),
            ..Default::default()
        };
        let full_output = self.overlay_ctx.run(raw_input, |ctx| {
            egui::Area::new(egui::Id::new("status_banner"))
                .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
                .show(ctx, |ui| {
                    egui::Frame::popup(&ctx.style()).show(ui, |ui| {
                        ui.label(text);
                    });
                });
        });
        let paint_jobs = self
            .overlay_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.overlay_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        self.overlay_renderer.update_buffers(
            &self.device,
            &self.queue,
            encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("status_banner_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.overlay_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        for id in &full_output.textures_delta.free {
            self.overlay_renderer.free_texture(id);
        }
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl RenderContext for WgpuContext {
    fn render(&mut self, scene: &Scene, camera: &CameraState) {
        let view = camera.view_matrix();
        let (key_dir, key_intensity) = scene.key_light().unwrap_or((Vec3::Y, 0.0));
        let frame = FrameUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light_dir: [key_dir.x, key_dir.y, key_dir.z, key_intensity],
            ambient: [scene.ambient_intensity(), 0.0, 0.0, 0.0],
            camera_right: [view.x_axis.x, view.y_axis.x, view.z_axis.x, 0.0],
            camera_up: [view.x_axis.y, view.y_axis.y, view.z_axis.y, 0.0],
        };
        self.queue
            .write_buffer(&self.frame_uniform_buffer, 0, bytemuck::bytes_of(&frame));

        // Gather mesh instances, opaque before transparent, and make sure
        // geometry is resident.
        let mut draws: Vec<(EntityId, InstanceData, bool)> = Vec::new();
        for (id, entity) in scene.entities() {
            match &entity.geometry {
                Geometry::Points { positions, size } => {
                    self.ensure_stars(*id, positions);
                    let opacity = entity.material.opacity;
                    self.queue.write_buffer(
                        &self.star_uniform_buffer,
                        0,
                        bytemuck::bytes_of(&StarUniforms {
                            params: [*size, opacity, 0.0, 0.0],
                        }),
                    );
                }
                geometry => {
                    if draws.len() >= self.max_instances as usize {
                        break;
                    }
                    self.ensure_mesh(*id, geometry);
                    let t = &entity.transform;
                    let model =
                        Mat4::from_scale_rotation_translation(t.scale, t.rotation, t.position);
                    let cols = model.to_cols_array_2d();
                    let m = &entity.material;
                    let [cr, cg, cb] = m.color.to_f32();
                    let [er, eg, eb] = m.emissive.to_f32();
                    draws.push((
                        *id,
                        InstanceData {
                            model_0: cols[0],
                            model_1: cols[1],
                            model_2: cols[2],
                            model_3: cols[3],
                            color: [cr, cg, cb, m.opacity],
                            emissive: [er, eg, eb, m.emissive_intensity],
                        },
                        m.transparent,
                    ));
                }
            }
        }
        draws.sort_by_key(|(_, _, transparent)| *transparent);

        let instances: Vec<InstanceData> = draws.iter().map(|(_, data, _)| *data).collect();
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.03,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            // Starfield first: it sits behind everything.
            if let Some((_, buffer, count)) = &self.stars {
                pass.set_pipeline(&self.star_pipeline);
                pass.set_bind_group(0, &self.frame_bind_group, &[]);
                pass.set_bind_group(1, &self.star_bind_group, &[]);
                pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, buffer.slice(..));
                pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..6, 0, 0..*count);
            }

            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for (i, (id, _, _)) in draws.iter().enumerate() {
                if let Some(gpu_mesh) = self.meshes.get(id) {
                    pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(
                        gpu_mesh.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint16,
                    );
                    pass.draw_indexed(0..gpu_mesh.index_count, 0, i as u32..i as u32 + 1);
                }
            }
        }

        if let Some(text) = self.status_text.clone() {
            self.draw_status(&mut encoder, &target, &text);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            Self::create_depth_texture(&self.device, self.config.width, self.config.height);
    }
}
