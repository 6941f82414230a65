use std::mem;

use glam::Vec4;
use log::debug;

use crate::UnmappedStorageBuffer;

/// Probe positions, one `vec4` per probe, written by the grid-generation
/// kernel and read by the trace and visualization stages.
#[derive(Debug)]
pub struct Probes {
    buffer: UnmappedStorageBuffer,
    capacity: u32,
}

impl Probes {
    pub fn new(device: &wgpu::Device, probe_count: u32) -> Self {
        let buffer = UnmappedStorageBuffer::new(
            device,
            "lumigrid_probes",
            (probe_count as usize) * mem::size_of::<Vec4>(),
        );

        Self {
            buffer,
            capacity: probe_count,
        }
    }

    /// Grows the buffer when the grid outgrows it; a shrinking grid keeps
    /// the existing allocation. Returns whether the buffer was replaced, in
    /// which case bind groups referencing it are stale.
    pub fn prepare(&mut self, device: &wgpu::Device, probe_count: u32) -> bool {
        if probe_count <= self.capacity {
            return false;
        }

        debug!(
            "Growing probe buffer; capacity={} -> {probe_count}",
            self.capacity,
        );

        *self = Self::new(device, probe_count);

        true
    }

    pub fn buffer(&self) -> &UnmappedStorageBuffer {
        &self.buffer
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
