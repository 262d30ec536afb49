pub mod projection;

pub use projection::{project_pslf, pslf_overlay, PslfInput, PslfResult};
