use wgpu::util::DeviceExt;

use crate::camera::Camera;

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    /// Whether the light moves with the camera.
    pub headlight: bool,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub ambient: f32,
}

impl LightUniform {
    /// White point light at the eye plus a little ambient light.
    pub fn headlight() -> Self {
        Self {
            position: [0.0; 3],
            intensity: 1.0,
            color: [1.0; 3],
            ambient: 0.25,
        }
    }

    /// No point light. Surfaces show their unshaded colour.
    pub fn unlit() -> Self {
        Self {
            position: [0.0; 3],
            intensity: 0.0,
            color: [1.0; 3],
            ambient: 1.0,
        }
    }
}

impl LightResources {
    pub fn new(default_lighting: bool, device: &wgpu::Device) -> Self {
        let uniform = if default_lighting {
            LightUniform::headlight()
        } else {
            LightUniform::unlit()
        };
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
            headlight: default_lighting,
        }
    }

    /// Move a headlight to the eye. Returns whether the uniform changed.
    pub fn follow(&mut self, camera: &Camera) -> bool {
        if !self.headlight {
            return false;
        }
        self.uniform.position = camera.position().into();
        true
    }

    /// Follow `camera` and upload the uniform if it moved.
    pub fn write_uniform(&mut self, camera: &Camera, queue: &wgpu::Queue) {
        if self.follow(camera) {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
