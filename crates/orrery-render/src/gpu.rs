//! The window's wgpu device, queue and swapchain surface.

use std::sync::Arc;
use winit::window::Window;

/// Why the orrery could not get a GPU to draw with.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    #[error("no GPU adapter can present to this window")]
    NoAdapter,

    #[error("GPU device request refused: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("cannot create a surface for the window: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("the adapter offers no texture format for the window surface")]
    UnsupportedSurface,
}

/// A frame that could not be acquired. Only `OutOfMemory` ends the run.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Still lost after one reconfigure; the frame is skipped.
    #[error("surface lost")]
    Lost,

    #[error("out of GPU memory")]
    OutOfMemory,

    /// The frame is skipped.
    #[error("timed out acquiring the next frame")]
    Timeout,
}

/// What to do after a failed `get_current_texture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Acquire {
    Reconfigure,
    Fail(SurfaceErrorKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceErrorKind {
    Lost,
    OutOfMemory,
    Timeout,
}

impl From<SurfaceErrorKind> for SurfaceError {
    fn from(kind: SurfaceErrorKind) -> Self {
        match kind {
            SurfaceErrorKind::Lost => SurfaceError::Lost,
            SurfaceErrorKind::OutOfMemory => SurfaceError::OutOfMemory,
            SurfaceErrorKind::Timeout => SurfaceError::Timeout,
        }
    }
}

fn classify(err: &wgpu::SurfaceError) -> Acquire {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Acquire::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => Acquire::Fail(SurfaceErrorKind::OutOfMemory),
        wgpu::SurfaceError::Timeout => Acquire::Fail(SurfaceErrorKind::Timeout),
        wgpu::SurfaceError::Other => Acquire::Fail(SurfaceErrorKind::Lost),
    }
}

/// GPU state bound to the orrery window.
pub struct RenderContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: Arc<wgpu::Queue>,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
}

impl RenderContext {
    /// Pick an adapter that can present to `window`, open a device and configure the surface
    /// at the window's current size.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let size = window.inner_size();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderContextError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("Adapter: {} on {:?}", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("orrery-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_config = surface_configuration(
            &surface.get_capabilities(&adapter),
            size.width,
            size.height,
            vsync,
        )
        .ok_or(RenderContextError::UnsupportedSurface)?;
        surface.configure(&device, &surface_config);
        log::info!(
            "Surface {}x{} {:?}, {:?}",
            surface_config.width,
            surface_config.height,
            surface_config.format,
            surface_config.present_mode
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue: Arc::new(queue),
            surface,
            surface_format: surface_config.format,
            surface_config,
        })
    }

    /// Reconfigure for a new window size. A minimized window keeps a 1×1 surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// The next swapchain texture. A lost or outdated surface is reconfigured and retried once.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        let err = match self.surface.get_current_texture() {
            Ok(texture) => return Ok(texture),
            Err(err) => err,
        };
        match classify(&err) {
            Acquire::Reconfigure => {
                log::warn!("Surface unusable ({err}), reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                self.surface
                    .get_current_texture()
                    .map_err(|_| SurfaceError::Lost)
            }
            Acquire::Fail(kind) => Err(kind.into()),
        }
    }
}

/// [`RenderContext::new`], blocking on `pollster`.
pub fn init_render_context_blocking(
    window: Arc<Window>,
    vsync: bool,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(window, vsync))
}

/// Surface settings for the given capabilities, or `None` when no format is offered.
fn surface_configuration(
    caps: &wgpu::SurfaceCapabilities,
    width: u32,
    height: u32,
    vsync: bool,
) -> Option<wgpu::SurfaceConfiguration> {
    let format = select_preferred_srgb_format(&caps.formats)?;
    Some(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: select_present_mode(&caps.present_modes, vsync),
        alpha_mode: caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

/// Bgra8UnormSrgb, else Rgba8UnormSrgb, else any sRGB format, else whatever comes first.
fn select_preferred_srgb_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ]
    .into_iter()
    .find(|f| formats.contains(f))
    .or_else(|| formats.iter().copied().find(|f| f.is_srgb()))
    .or_else(|| formats.first().copied())
}

/// Fifo with vsync; without it Mailbox, then Immediate, then Fifo.
fn select_present_mode(modes: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|m| modes.contains(m))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

/// Create a headless GPU device and queue. Returns `None` if no GPU is available.
#[cfg(test)]
pub(crate) fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: Default::default(),
                ..Default::default()
            })
            .await
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selection_prefers_bgra_srgb() {
        let formats = [
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        assert_eq!(
            select_preferred_srgb_format(&formats),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn test_format_selection_fallback_rgba_srgb() {
        let formats = [
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        assert_eq!(
            select_preferred_srgb_format(&formats),
            Some(wgpu::TextureFormat::Rgba8UnormSrgb)
        );
    }

    #[test]
    fn test_format_selection_fallback_first() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Rgba8Unorm,
        ];
        assert_eq!(
            select_preferred_srgb_format(&formats),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn test_format_selection_empty_is_none() {
        assert_eq!(select_preferred_srgb_format(&[]), None);
    }

    fn caps(formats: Vec<wgpu::TextureFormat>) -> wgpu::SurfaceCapabilities {
        let mut caps = wgpu::SurfaceCapabilities::default();
        caps.formats = formats;
        caps.present_modes = vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox];
        caps.alpha_modes = vec![wgpu::CompositeAlphaMode::Opaque];
        caps
    }

    #[test]
    fn test_surface_configuration_clamps_and_selects() {
        let config = surface_configuration(
            &caps(vec![wgpu::TextureFormat::Rgba8UnormSrgb]),
            0,
            720,
            false,
        )
        .unwrap();
        assert_eq!((config.width, config.height), (1, 720));
        assert_eq!(config.format, wgpu::TextureFormat::Rgba8UnormSrgb);
        assert_eq!(config.present_mode, wgpu::PresentMode::Mailbox);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn test_surface_configuration_without_formats_is_none() {
        assert!(surface_configuration(&caps(vec![]), 800, 600, true).is_none());
    }

    #[test]
    fn test_lost_and_outdated_reconfigure() {
        assert_eq!(classify(&wgpu::SurfaceError::Lost), Acquire::Reconfigure);
        assert_eq!(classify(&wgpu::SurfaceError::Outdated), Acquire::Reconfigure);
        assert_eq!(
            classify(&wgpu::SurfaceError::OutOfMemory),
            Acquire::Fail(SurfaceErrorKind::OutOfMemory)
        );
        assert_eq!(
            classify(&wgpu::SurfaceError::Timeout),
            Acquire::Fail(SurfaceErrorKind::Timeout)
        );
        assert!(matches!(
            SurfaceError::from(SurfaceErrorKind::Lost),
            SurfaceError::Lost
        ));
    }

    #[test]
    fn test_vsync_selects_fifo() {
        let modes = [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Fifo];
        assert_eq!(select_present_mode(&modes, true), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn test_no_vsync_prefers_mailbox_then_immediate() {
        let modes = [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox];
        assert_eq!(select_present_mode(&modes, false), wgpu::PresentMode::Mailbox);
        let modes = [wgpu::PresentMode::Fifo, wgpu::PresentMode::Immediate];
        assert_eq!(
            select_present_mode(&modes, false),
            wgpu::PresentMode::Immediate
        );
        assert_eq!(
            select_present_mode(&[wgpu::PresentMode::Fifo], false),
            wgpu::PresentMode::Fifo
        );
    }
}
