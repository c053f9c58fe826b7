use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::handle::{QuadHandle, ResourceId};

/// Position-only vertex (clip space, z = 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const fn v(x: f32, y: f32) -> QuadVertex {
    QuadVertex { position: [x, y, 0.0] }
}

/// Two triangles covering clip space [-1, 1]².
pub const FULLSCREEN_QUAD: [QuadVertex; 6] = [
    v(-1.0, 1.0),
    v(1.0, 1.0),
    v(-1.0, -1.0),
    v(1.0, 1.0),
    v(1.0, -1.0),
    v(-1.0, -1.0),
];

/// Static full-screen quad.
///
/// Created once at startup and never modified. The vertex buffer is released
/// by `destroy`, not on drop.
pub struct GeometryBuffer {
    handle: QuadHandle,
    vbo: Option<wgpu::Buffer>,
}

impl GeometryBuffer {
    pub const VERTEX_COUNT: u32 = FULLSCREEN_QUAD.len() as u32;

    /// Uploads the quad. Allocation failure surfaces through wgpu's device
    /// error handler; there is nothing to render without it.
    pub fn create(device: &wgpu::Device) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fractal quad vbo"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let handle = QuadHandle(ResourceId::next());
        log::debug!("quad {} created ({} vertices)", handle.id(), Self::VERTEX_COUNT);

        Self { handle, vbo: Some(vbo) }
    }

    pub fn handle(&self) -> QuadHandle {
        self.handle
    }

    /// Vertex layout matching `QuadVertex` at shader location 0.
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        QuadVertex::layout()
    }

    /// Issues a triangle-list draw of the six quad vertices.
    ///
    /// The caller must have bound a pipeline built with `vertex_layout()`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(vbo) = self.vbo.as_ref() else {
            log::warn!("quad {} drawn after destroy; skipped", self.handle.id());
            return;
        };
        pass.set_vertex_buffer(0, vbo.slice(..));
        pass.draw(0..Self::VERTEX_COUNT, 0..1);
    }

    /// Releases the vertex buffer. Only the first call has an effect.
    pub fn destroy(&mut self) {
        match self.vbo.take() {
            Some(vbo) => {
                vbo.destroy();
                log::debug!("quad {} released", self.handle.id());
            }
            None => log::warn!("quad {} already released", self.handle.id()),
        }
    }
}
