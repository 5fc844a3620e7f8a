pub mod config;
pub mod report;

pub use config::{
    FftSection, GlitchConfig, MungeSection, QuantizeSection, ShiftSection, SortSection,
    ZigzagSection,
};
pub use report::OperationReport;
