use crate::gpu::WgpuContext;
use glowrig_render::{AcquireError, RenderBackend, SurfaceSpec};
use std::sync::Arc;
use winit::window::Window;

/// Render backend over the wgpu stack. Holds the surface attachment point;
/// acquisition happens once, when the availability pipeline probes.
pub struct WgpuBackend {
    window: Arc<Window>,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl RenderBackend for WgpuBackend {
    type Context = WgpuContext;

    fn acquire(&self, surface_spec: &SurfaceSpec) -> Result<WgpuContext, AcquireError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Library presence comes first: if the driver stack exposes no
        // adapters at all, no context will ever be attempted.
        if instance
            .enumerate_adapters(wgpu::Backends::all())
            .is_empty()
        {
            return Err(AcquireError::LibraryMissing(
                "no graphics adapters visible to the driver stack".into(),
            ));
        }

        let surface = instance
            .create_surface(self.window.clone())
            .map_err(|e| AcquireError::ContextCreation(e.to_string()))?;

        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            }))
            .ok_or_else(|| {
                AcquireError::ContextCreation("no adapter compatible with the surface".into())
            })?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("glowrig_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| AcquireError::ContextCreation(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: surface_spec.width.max(1),
            height: surface_spec.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            width = config.width,
            height = config.height,
            "render context acquired"
        );

        Ok(WgpuContext::new(surface, device, queue, config))
    }
}
