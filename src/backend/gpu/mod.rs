//! wgpu accelerator backend: device context and the scatter kernel.
//!
//! The device/queue pair is process-global and lazily initialized; staging
//! buffers for an invocation are created inside the call and dropped when
//! it returns, so device residency is scoped to the operation.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use once_cell::sync::OnceCell;
use wgpu::util::DeviceExt;

use crate::array::indexable::{Indexable, IndexableMut};
use crate::array::indexer::ArrayIndexer;
use crate::exec_error::MeshExecError;

/// Fixed launch geometry for grid-strided kernels: enough threads to
/// saturate the device irrespective of item count; each thread strides
/// through the item range. Threads per workgroup are fixed at 256 in the
/// shader's `workgroup_size` attribute.
const WORKGROUP_COUNT: u32 = 32;

/// Process-wide accelerator device handle.
#[derive(Debug)]
pub struct GpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

static CONTEXT: OnceCell<GpuContext> = OnceCell::new();

impl GpuContext {
    /// Request an adapter and device, blocking until ready.
    ///
    /// # Errors
    /// `AcceleratorDevice` when no adapter exists or device creation fails.
    pub fn try_new() -> Result<Self, MeshExecError> {
        let instance = wgpu::Instance::default();
        let adapter = pollster::block_on(
            instance.request_adapter(&wgpu::RequestAdapterOptions::default()),
        )
        .ok_or_else(|| MeshExecError::AcceleratorDevice("no suitable adapter".into()))?;
        let (device, queue) = pollster::block_on(
            adapter.request_device(&wgpu::DeviceDescriptor::default(), None),
        )
        .map_err(|e| MeshExecError::AcceleratorDevice(e.to_string()))?;
        log::debug!("accelerator context initialized: {:?}", adapter.get_info().name);
        Ok(GpuContext {
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// The lazily initialized process-global context.
    ///
    /// # Errors
    /// `AcceleratorDevice` when initialization fails; the failure is not
    /// cached, so a later call may succeed if a device appears.
    pub fn global() -> Result<&'static GpuContext, MeshExecError> {
        CONTEXT.get_or_try_init(GpuContext::try_new)
    }

    /// Read `byte_len` bytes of `buffer` back into host memory through a
    /// staging buffer.
    fn read_back(&self, buffer: &wgpu::Buffer, byte_len: u64) -> Result<Vec<u8>, MeshExecError> {
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh-exec readback staging"),
            size: byte_len,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mut enc = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("mesh-exec readback"),
            });
        enc.copy_buffer_to_buffer(buffer, 0, &staging, 0, byte_len);
        self.queue.submit(Some(enc.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            sender.send(res).ok();
        });
        self.device.poll(wgpu::Maintain::Wait);
        let res = pollster::block_on(receiver.receive());
        res.ok_or(MeshExecError::GpuMappingFailed)?
            .map_err(|_| MeshExecError::GpuMappingFailed)?;
        let data = slice.get_mapped_range().to_vec();
        staging.unmap();
        Ok(data)
    }
}

/// Uniform parameter block for the scatter kernel; layout mirrors the
/// WGSL `Params` struct word for word.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ScatterParams {
    n_items: u32,
    elem_words: u32,
    idx_div: u32,
    idx_mod: u32,
    idx_mul: u32,
    idx_add: u32,
    src_div: u32,
    src_mod: u32,
    src_mul: u32,
    src_add: u32,
    dst_div: u32,
    dst_mod: u32,
    dst_mul: u32,
    dst_add: u32,
    _pad: [u32; 2],
}

fn indexer_words(ix: &ArrayIndexer) -> Result<[u32; 4], MeshExecError> {
    let field = |v: usize| {
        u32::try_from(v).map_err(|_| {
            MeshExecError::AcceleratorDevice("indexer field exceeds u32 range".into())
        })
    };
    Ok([
        field(ix.divisor())?,
        field(ix.modulus())?,
        field(ix.multiplier())?,
        field(ix.offset())?,
    ])
}

/// Grid-strided scatter over `N` input/output array pairs, one kernel
/// dispatch per pair.
///
/// Stages the input, index, and output buffers around the call (the output
/// is uploaded first so untargeted locations keep their prior values) and
/// reads the result back byte-for-byte.
pub(crate) fn scatter<V, const N: usize>(
    inputs: &[Indexable<'_, V>; N],
    outputs: &mut [IndexableMut<'_, V>; N],
    indices: Indexable<'_, u32>,
    n_items: usize,
) -> Result<(), MeshExecError>
where
    V: Pod + Send + Sync,
{
    let elem_size = std::mem::size_of::<V>();
    if elem_size % 4 != 0 {
        return Err(MeshExecError::AcceleratorDevice(format!(
            "scatter element size {elem_size} is not a multiple of 4 bytes"
        )));
    }
    let elem_words = (elem_size / 4) as u32;
    let n = u32::try_from(n_items)
        .map_err(|_| MeshExecError::AcceleratorDevice("item count exceeds u32 range".into()))?;

    let ctx = GpuContext::global()?;
    let shader = ctx
        .device
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scatter.wgsl"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(include_str!(
                "scatter.wgsl"
            ))),
        });
    let pipeline = ctx
        .device
        .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("scatter_pipeline"),
            layout: None,
            module: &shader,
            entry_point: "main",
        });

    let idx_buf = ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scatter indices"),
            contents: bytemuck::cast_slice(indices.values),
            usage: wgpu::BufferUsages::STORAGE,
        });
    let [idx_div, idx_mod, idx_mul, idx_add] = indexer_words(&indices.indexer)?;

    for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
        let src_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scatter src"),
                contents: bytemuck::cast_slice(input.values),
                usage: wgpu::BufferUsages::STORAGE,
            });
        let dst_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scatter dst"),
                contents: bytemuck::cast_slice(output.values),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
            });

        let [src_div, src_mod, src_mul, src_add] = indexer_words(&input.indexer)?;
        let [dst_div, dst_mod, dst_mul, dst_add] = indexer_words(&output.indexer)?;
        let params = ScatterParams {
            n_items: n,
            elem_words,
            idx_div,
            idx_mod,
            idx_mul,
            idx_add,
            src_div,
            src_mod,
            src_mul,
            src_add,
            dst_div,
            dst_mod,
            dst_mul,
            dst_add,
            _pad: [0; 2],
        };
        let param_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scatter params"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let layout = pipeline.get_bind_group_layout(0);
        let bind = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scatter bind"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: src_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: idx_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: dst_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: param_buf.as_entire_binding(),
                },
            ],
        });

        let mut enc = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scatter dispatch"),
            });
        {
            let mut pass = enc.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("scatter pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &bind, &[]);
            if n > 0 {
                pass.dispatch_workgroups(WORKGROUP_COUNT, 1, 1);
            }
        }
        ctx.queue.submit(Some(enc.finish()));

        let byte_len = (output.values.len() * elem_size) as u64;
        let bytes = ctx.read_back(&dst_buf, byte_len)?;
        // pod_collect_to_vec realigns; the readback Vec<u8> carries no
        // alignment guarantee for V.
        let host: Vec<V> = bytemuck::pod_collect_to_vec(&bytes);
        output.values.copy_from_slice(&host);
    }
    Ok(())
}
