pub mod dispatch;
pub mod error;
pub mod kernels;
pub mod profiling;
pub mod signal_io;
pub mod types;

pub use dispatch::{apply_filter, apply_filter_in_place, partition, plan};
pub use error::{FilterError, Result};
pub use kernels::{Kernel, KernelMetadata, ResolvedKernel, KERNEL_REGISTRY};
pub use profiling::{LoggedStopwatch, Stopwatch};
pub use signal_io::{load_signal, save_signal, FileType};
pub use types::*;
