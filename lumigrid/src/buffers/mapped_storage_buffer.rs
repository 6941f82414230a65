use std::ops::{Deref, DerefMut};
use std::{any, mem};

use bytemuck::Pod;

use super::Bindable;

/// Storage buffer that exists both on the host machine and the GPU.
///
/// Scene data (triangles, lights) is built on the host once per scene bind
/// and then only read by kernels, so the buffer is sized from its initial
/// contents and bound read-only; [`DerefMut`] still tracks later edits and
/// [`Self::flush()`] re-uploads them.
#[derive(Debug)]
pub struct MappedStorageBuffer<T> {
    buffer: wgpu::Buffer,
    data: Vec<T>,
    dirty: bool,
}

impl<T> MappedStorageBuffer<T>
where
    T: Pod,
{
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        data: Vec<T>,
    ) -> Self {
        let label = label.as_ref();
        let size = mem::size_of::<T>() * data.len().max(1);
        let size = (size + 15) & !15;

        log::info!(
            "Allocating storage buffer `{label}`; ty={}, len={}, size={size}",
            any::type_name::<T>(),
            data.len(),
        );

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::STORAGE,
            size: size as _,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            data,
            dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn flush(&mut self, queue: &wgpu::Queue) {
        if !mem::take(&mut self.dirty) {
            return;
        }

        if self.data.is_empty() {
            return;
        }

        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&self.data));
    }

    pub fn bind_readable(&self) -> impl Bindable + '_ {
        MappedStorageBufferBinder { parent: self }
    }
}

impl<T> Deref for MappedStorageBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for MappedStorageBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.dirty = true;

        &mut self.data
    }
}

struct MappedStorageBufferBinder<'a, T> {
    parent: &'a MappedStorageBuffer<T>,
}

impl<T> Bindable for MappedStorageBufferBinder<'_, T> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let resource = self.parent.buffer.as_entire_binding();

        vec![(layout, resource)]
    }
}
