//! Draws one frame of the solar system.
//!
//! Everything the GPU needs is created once in [`SceneRenderer::new`]; each frame only
//! rewrites uniform buffers and records draws in a fixed order.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use orrery_config::SceneConfig;
use orrery_mesh::{generate_circle, generate_sphere};
use orrery_render::{
    BACKGROUND_SHADER_SOURCE, BackgroundPipeline, BufferUploader, CLEAR_RED, DepthBuffer,
    DrawHandle, FrameEncoder, FrameUniform, Light, ManagedTexture, ORBIT_SHADER_SOURCE,
    ObjectUniform, OrbitPipeline, PLANET_SHADER_SOURCE, PlanetPipeline, RenderContext,
    RenderPassBuilder, SUN_SHADER_SOURCE, SceneLayouts, ShaderError, ShaderLibrary, SunPipeline,
    SurfaceError, TextureManager, UniformSlot, draw_object,
};
use orrery_scene::{SceneState, compose_orbit_ring_transform, orbit_ring_radius};

/// Specular reflectance used for every planet.
const PLANET_SPECULAR: Vec3 = Vec3::splat(0.5);
/// Orbit rings are drawn in plain white.
const ORBIT_RING_COLOR: Vec3 = Vec3::ONE;

/// One draw call in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Background,
    Planet(usize),
    OrbitRing(usize),
    Sun,
}

/// The per-frame draw order for `planets` bodies.
///
/// The background comes first with depth disabled, then each planet followed by its
/// orbit ring, then the sun last.
pub fn draw_order(planets: usize) -> Vec<DrawKind> {
    let mut order = Vec::with_capacity(planets * 2 + 2);
    order.push(DrawKind::Background);
    for i in 0..planets {
        order.push(DrawKind::Planet(i));
        order.push(DrawKind::OrbitRing(i));
    }
    order.push(DrawKind::Sun);
    order
}

/// Call `draw` for each entry of [`draw_order`] and count the calls that recorded a draw.
pub fn record_in_order(planets: usize, mut draw: impl FnMut(DrawKind) -> bool) -> usize {
    let mut recorded = 0;
    for kind in draw_order(planets) {
        if draw(kind) {
            recorded += 1;
        }
    }
    recorded
}

struct PlanetDraw {
    object: UniformSlot<ObjectUniform>,
    texture: Arc<ManagedTexture>,
    ring: DrawHandle,
    ring_object: UniformSlot<ObjectUniform>,
}

/// GPU state for the whole scene.
pub struct SceneRenderer {
    depth: DepthBuffer,
    planet_pipeline: PlanetPipeline,
    sun_pipeline: SunPipeline,
    orbit_pipeline: OrbitPipeline,
    background_pipeline: BackgroundPipeline,
    sphere: DrawHandle,
    background_sphere: DrawHandle,
    frame: UniformSlot<FrameUniform>,
    planets: Vec<PlanetDraw>,
    sun_object: UniformSlot<ObjectUniform>,
    sun_texture: Arc<ManagedTexture>,
    background_object: UniformSlot<ObjectUniform>,
    background_texture: Arc<ManagedTexture>,
    light: Light,
}

impl SceneRenderer {
    /// Compile shaders, build pipelines, load textures and upload every mesh.
    ///
    /// Missing textures fall back to the placeholder. Shader failures are fatal.
    pub fn new(
        ctx: &RenderContext,
        config: &SceneConfig,
        scene: &SceneState,
    ) -> Result<Self, ShaderError> {
        let device = &ctx.device;
        let queue = &ctx.queue;
        let format = ctx.surface_format;
        let (width, height) = ctx.size();

        let layouts = SceneLayouts::new(device);
        let mut textures = TextureManager::new(device, queue);
        let texture_layout = textures.bind_group_layout().clone();

        let mut shaders = ShaderLibrary::new().with_shader_dir(config.resource_dir.join("shaders"));
        let planet_shader = shaders.load_or_embedded(device, "planet", PLANET_SHADER_SOURCE)?;
        let sun_shader = shaders.load_or_embedded(device, "sun", SUN_SHADER_SOURCE)?;
        let orbit_shader = shaders.load_or_embedded(device, "orbit", ORBIT_SHADER_SOURCE)?;
        let background_shader =
            shaders.load_or_embedded(device, "background", BACKGROUND_SHADER_SOURCE)?;
        tracing::info!("Compiled {} shaders", shaders.len());

        let planet_pipeline =
            PlanetPipeline::new(device, &planet_shader, format, &layouts, &texture_layout);
        let sun_pipeline = SunPipeline::new(device, &sun_shader, format, &layouts, &texture_layout);
        let orbit_pipeline = OrbitPipeline::new(device, &orbit_shader, format, &layouts);
        let background_pipeline = BackgroundPipeline::new(
            device,
            &background_shader,
            format,
            &layouts,
            &texture_layout,
        );

        let uploader = BufferUploader::new(device);
        let sphere = uploader.upload(
            "planet-sphere",
            generate_sphere(1.0, config.sphere_slices, config.sphere_stacks),
        );
        let background_sphere = uploader.upload(
            "background-sphere",
            generate_sphere(
                scene.background.radius,
                config.background_slices,
                config.background_stacks,
            ),
        );

        let mut load = |name: &str| {
            textures.load_or_placeholder(device, queue, &config.resource_dir.join(name))
        };
        let sun_texture = load(scene.sun.texture);
        let background_texture = load(scene.background.texture);

        let identity = ObjectUniform::unlit(Mat4::IDENTITY, Vec3::ONE);
        let planets = scene
            .registry
            .iter()
            .map(|body| {
                let ring = uploader.upload(
                    &format!("{}-orbit", body.name),
                    generate_circle(orbit_ring_radius(body), config.orbit_segments),
                );
                PlanetDraw {
                    object: UniformSlot::new(device, &layouts.object, body.name, &identity),
                    texture: load(body.diffuse_texture),
                    ring,
                    ring_object: UniformSlot::new(
                        device,
                        &layouts.object,
                        &format!("{}-orbit", body.name),
                        &ObjectUniform::unlit(compose_orbit_ring_transform(), ORBIT_RING_COLOR),
                    ),
                }
            })
            .collect::<Vec<_>>();

        let light = Light {
            position: scene.light_position(),
            ..Light::default()
        };
        let frame = UniformSlot::new(
            device,
            &layouts.frame,
            "frame-uniform",
            &Self::frame_uniform(scene, &light),
        );

        tracing::info!(
            "Scene renderer ready: {} planets, {} orbit rings",
            planets.len(),
            planets.iter().filter(|p| !p.ring.is_null()).count()
        );

        Ok(Self {
            depth: DepthBuffer::new(device, width, height),
            planet_pipeline,
            sun_pipeline,
            orbit_pipeline,
            background_pipeline,
            sphere,
            background_sphere,
            frame,
            planets,
            sun_object: UniformSlot::new(device, &layouts.object, "sun", &identity),
            sun_texture,
            background_object: UniformSlot::new(device, &layouts.object, "background", &identity),
            background_texture,
            light,
        })
    }

    fn frame_uniform(scene: &SceneState, light: &Light) -> FrameUniform {
        let camera = &scene.camera;
        FrameUniform::new(
            camera.view_matrix(),
            camera.projection_matrix(),
            scene.background_view(),
            camera.position,
            light,
        )
    }

    /// Write this frame's camera, light and model transforms.
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &SceneState) {
        self.light.position = scene.light_position();
        self.frame.write(queue, &Self::frame_uniform(scene, &self.light));

        for (draw, (body, model)) in self.planets.iter().zip(scene.planet_transforms()) {
            draw.object.write(
                queue,
                &ObjectUniform::new(model, Vec3::ONE, PLANET_SPECULAR, body.shininess),
            );
        }
        self.sun_object.write(
            queue,
            &ObjectUniform::unlit(scene.sun_transform(), scene.sun.color),
        );
    }

    /// Record every draw into `pass` in [`draw_order`]. Returns the number of draws recorded.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) -> usize {
        record_in_order(self.planets.len(), |kind| self.draw_one(pass, kind))
    }

    fn draw_one(&self, pass: &mut wgpu::RenderPass<'_>, kind: DrawKind) -> bool {
        let frame = &self.frame.bind_group;
        match kind {
            DrawKind::Background => draw_object(
                pass,
                &self.background_pipeline.pipeline,
                frame,
                &self.background_object.bind_group,
                Some(&self.background_texture.bind_group),
                &self.background_sphere,
            ),
            DrawKind::Planet(i) => {
                let planet = &self.planets[i];
                draw_object(
                    pass,
                    &self.planet_pipeline.pipeline,
                    frame,
                    &planet.object.bind_group,
                    Some(&planet.texture.bind_group),
                    &self.sphere,
                )
            }
            DrawKind::OrbitRing(i) => {
                let planet = &self.planets[i];
                draw_object(
                    pass,
                    &self.orbit_pipeline.pipeline,
                    frame,
                    &planet.ring_object.bind_group,
                    None,
                    &planet.ring,
                )
            }
            DrawKind::Sun => draw_object(
                pass,
                &self.sun_pipeline.pipeline,
                frame,
                &self.sun_object.bind_group,
                Some(&self.sun_texture.bind_group),
                &self.sphere,
            ),
        }
    }

    /// Recreate the depth buffer for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Update uniforms, clear to red, draw the scene and present.
    pub fn render(&mut self, ctx: &RenderContext, scene: &SceneState) -> Result<(), SurfaceError> {
        let surface_texture = ctx.get_current_texture()?;
        self.update(&ctx.queue, scene);

        let builder = RenderPassBuilder::new()
            .clear_color(CLEAR_RED)
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");
        let mut encoder = FrameEncoder::new(&ctx.device, Arc::clone(&ctx.queue), surface_texture);
        {
            let mut pass = encoder.begin_render_pass(&builder);
            self.draw(&mut pass);
        }
        encoder.submit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_first_sun_last() {
        let order = draw_order(8);
        assert_eq!(order.len(), 18);
        assert_eq!(order.first(), Some(&DrawKind::Background));
        assert_eq!(order.last(), Some(&DrawKind::Sun));
    }

    #[test]
    fn test_each_planet_followed_by_its_ring() {
        let order = draw_order(3);
        assert_eq!(
            order,
            vec![
                DrawKind::Background,
                DrawKind::Planet(0),
                DrawKind::OrbitRing(0),
                DrawKind::Planet(1),
                DrawKind::OrbitRing(1),
                DrawKind::Planet(2),
                DrawKind::OrbitRing(2),
                DrawKind::Sun,
            ]
        );
    }

    #[test]
    fn test_every_kind_visited_once_and_only_recorded_draws_counted() {
        let mut visited = Vec::new();
        let recorded = record_in_order(2, |kind| {
            visited.push(kind);
            !matches!(kind, DrawKind::OrbitRing(1))
        });
        assert_eq!(visited, draw_order(2));
        assert_eq!(recorded, draw_order(2).len() - 1);
    }

    #[test]
    fn test_nothing_recorded_counts_zero() {
        let mut calls = 0;
        assert_eq!(record_in_order(8, |_| { calls += 1; false }), 0);
        assert_eq!(calls, 18);
    }

    #[test]
    fn test_empty_registry_still_draws_background_and_sun() {
        assert_eq!(draw_order(0), vec![DrawKind::Background, DrawKind::Sun]);
    }
}
