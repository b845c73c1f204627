//! Backend selection for the binaries.
//!
//! CPU `NdArray` by default; with the `wgpu` feature, a discrete GPU picked by
//! index.

use burn::backend::Autodiff;

#[cfg(not(feature = "wgpu"))]
mod selected {
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::NdArray;

    /// Backend used for inference and validation.
    pub type InferenceBackend = NdArray;

    /// Device for the given GPU index; the CPU backend ignores it.
    pub fn device(gpu: Option<usize>) -> NdArrayDevice {
        if let Some(index) = gpu {
            log::info!("Built without the wgpu feature; ignoring GPU {index} and running on CPU");
        }
        NdArrayDevice::Cpu
    }
}

#[cfg(feature = "wgpu")]
mod selected {
    use burn::backend::wgpu::WgpuDevice;
    use burn::backend::Wgpu;

    /// Backend used for inference and validation.
    pub type InferenceBackend = Wgpu;

    /// Discrete GPU `gpu`, or the default adapter.
    pub fn device(gpu: Option<usize>) -> WgpuDevice {
        match gpu {
            Some(index) => WgpuDevice::DiscreteGpu(index),
            None => WgpuDevice::default(),
        }
    }
}

pub use selected::{device, InferenceBackend};

/// Backend used for training.
pub type TrainingBackend = Autodiff<InferenceBackend>;
