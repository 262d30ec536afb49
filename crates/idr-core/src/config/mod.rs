pub mod plans;
pub mod poverty;
pub mod tax_tables;

pub use plans::{AgiBracket, PaymentBasis, PlanCatalog, PlanDefinition, PlanKey};
pub use poverty::PovertyGuidelines;
pub use tax_tables::TaxTables;
