use std::num::NonZeroU64;

use crate::render::handle::{ResourceId, ShaderHandle};

use super::error::CompileError;
use super::link::{link, LinkedShaders, StageSource};
use super::uniforms::{UniformBlock, UniformSource, UNIFORM_BINDING, UNIFORM_GROUP};

/// A linked vertex + fragment program drawing into the surface format.
///
/// Owns the render pipeline, the uniform buffer and its bind group. All of
/// them are released by `destroy`; dropping the program without destroying
/// it leaks nothing on the CPU side but keeps the GPU objects alive until
/// wgpu collects them.
pub struct ShaderProgram {
    handle: ShaderHandle,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    ubo: Option<wgpu::Buffer>,
    block: UniformBlock,
}

impl ShaderProgram {
    /// Compiles and links the two WGSL sources, then builds the pipeline.
    ///
    /// Any stage or link failure is returned before a GPU object exists.
    pub fn compile(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        vertex_source: &str,
        fragment_source: &str,
        vertex_layout: wgpu::VertexBufferLayout<'_>,
    ) -> Result<Self, CompileError> {
        let linked = link(vertex_source, fragment_source)?;
        Self::create(device, surface_format, &linked, vertex_layout)
    }

    /// Builds GPU objects for an already linked pair.
    ///
    /// Validation errors wgpu raises while building the pipeline come back as
    /// `CompileError::Link` instead of reaching the device's error handler.
    pub fn create(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        linked: &LinkedShaders,
        vertex_layout: wgpu::VertexBufferLayout<'_>,
    ) -> Result<Self, CompileError> {
        let handle = ShaderHandle(ResourceId::next());
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs = shader_module(device, "fractal vertex shader", &linked.vertex);
        let fs = shader_module(device, "fractal fragment shader", &linked.fragment);

        let mut visibility = wgpu::ShaderStages::NONE;
        if linked.vertex.uses_uniforms {
            visibility |= wgpu::ShaderStages::VERTEX;
        }
        if linked.fragment.uses_uniforms {
            visibility |= wgpu::ShaderStages::FRAGMENT;
        }

        let uniforms = linked
            .uniforms()
            .and_then(|layout| NonZeroU64::new(layout.size as u64).map(|size| (layout, size)));

        let (bind_group_layout, ubo, bind_group) = match uniforms {
            Some((_, size)) => {
                let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("fractal program bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: UNIFORM_BINDING,
                        visibility,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(size),
                        },
                        count: None,
                    }],
                });

                let ubo = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("fractal program ubo"),
                    size: size.get(),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("fractal program bind group"),
                    layout: &bgl,
                    entries: &[wgpu::BindGroupEntry {
                        binding: UNIFORM_BINDING,
                        resource: ubo.as_entire_binding(),
                    }],
                });

                (Some(bgl), Some(ubo), Some(bind_group))
            }
            None => (None, None, None),
        };

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = bind_group_layout.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fractal program pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fractal program pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(linked.vertex_entry_point()),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(linked.fragment_entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            if let Some(ubo) = ubo.as_ref() {
                ubo.destroy();
            }
            return Err(CompileError::link(err.to_string()));
        }

        let block = linked.uniforms().cloned().map(UniformBlock::new).unwrap_or_else(UniformBlock::empty);

        log::info!(
            "shader program {} linked ({} uniforms, {} bytes)",
            handle.id(),
            block.layout().fields.len(),
            block.layout().size
        );

        Ok(Self {
            handle,
            pipeline: Some(pipeline),
            bind_group,
            ubo,
            block,
        })
    }

    pub fn handle(&self) -> ShaderHandle {
        self.handle
    }

    /// CPU copy of the uniform block, as last written.
    pub fn uniforms(&self) -> &UniformBlock {
        &self.block
    }

    /// Lets `source` write the named uniforms, then uploads the block.
    ///
    /// Names the program does not declare are skipped.
    pub fn upload_uniforms(&mut self, queue: &wgpu::Queue, source: &impl UniformSource) {
        source.write_uniforms(&mut self.block);
        if let Some(ubo) = self.ubo.as_ref() {
            queue.write_buffer(ubo, 0, self.block.bytes());
        }
    }

    /// Binds the pipeline and uniform group on `pass`.
    ///
    /// Returns `false` once the program has been destroyed; the caller should
    /// skip its draw.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(pipeline) = self.pipeline.as_ref() else {
            log::warn!("shader program {} bound after destroy; skipped", self.handle.id());
            return false;
        };
        pass.set_pipeline(pipeline);
        if let Some(bind_group) = self.bind_group.as_ref() {
            pass.set_bind_group(UNIFORM_GROUP, bind_group, &[]);
        }
        true
    }

    /// Releases the pipeline and uniform buffer. Only the first call has an effect.
    pub fn destroy(&mut self) {
        let Some(pipeline) = self.pipeline.take() else {
            log::warn!("shader program {} already released", self.handle.id());
            return;
        };
        drop(pipeline);
        self.bind_group = None;
        if let Some(ubo) = self.ubo.take() {
            ubo.destroy();
        }
        log::debug!("shader program {} released", self.handle.id());
    }
}

fn shader_module(device: &wgpu::Device, label: &str, stage: &StageSource) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(stage.source.as_str().into()),
    })
}
