// * Compute device selection: accelerator first, CPU as the floor.

use candle_core::utils::{cuda_is_available, metal_is_available};
use candle_core::Device;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DevicePreference {
    /// CUDA if compiled in and present, then Metal, then CPU
    #[default]
    Auto,
    Cpu,
    Cuda(usize),
    Metal,
}

impl FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "cpu" => Ok(DevicePreference::Cpu),
            "cuda" | "gpu" => Ok(DevicePreference::Cuda(0)),
            "metal" | "mps" => Ok(DevicePreference::Metal),
            other => match other.strip_prefix("cuda:") {
                Some(ordinal) => ordinal
                    .parse::<usize>()
                    .map(DevicePreference::Cuda)
                    .map_err(|_| format!("bad CUDA ordinal in {:?}", s)),
                None => Err(format!("unknown device {:?} (expected auto, cpu, cuda[:N], metal)", s)),
            },
        }
    }
}

impl fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevicePreference::Auto => write!(f, "auto"),
            DevicePreference::Cpu => write!(f, "cpu"),
            DevicePreference::Cuda(ordinal) => write!(f, "cuda:{}", ordinal),
            DevicePreference::Metal => write!(f, "metal"),
        }
    }
}

/// Resolves a preference to a concrete device.
/// `Auto` never fails: an accelerator that refuses to initialize degrades to CPU.
pub fn select_device(preference: DevicePreference) -> candle_core::Result<Device> {
    match preference {
        DevicePreference::Cpu => Ok(Device::Cpu),
        DevicePreference::Cuda(ordinal) => Device::new_cuda(ordinal),
        DevicePreference::Metal => Device::new_metal(0),
        DevicePreference::Auto => {
            if cuda_is_available() {
                match Device::new_cuda(0) {
                    Ok(device) => return Ok(device),
                    Err(e) => tracing::warn!(error = %e, "CUDA present but unusable, falling back"),
                }
            }
            if metal_is_available() {
                match Device::new_metal(0) {
                    Ok(device) => return Ok(device),
                    Err(e) => tracing::warn!(error = %e, "Metal present but unusable, falling back"),
                }
            }
            Ok(Device::Cpu)
        }
    }
}

pub fn device_label(device: &Device) -> String {
    match device.location() {
        candle_core::DeviceLocation::Cpu => "cpu".to_string(),
        candle_core::DeviceLocation::Cuda { gpu_id } => format!("cuda:{}", gpu_id),
        candle_core::DeviceLocation::Metal { gpu_id } => format!("metal:{}", gpu_id),
    }
}
