mod audit;
mod export;
mod generate;
mod posters;
mod scan;
mod update;

pub use audit::{AuditArgs, cmd_audit_collections};
pub use export::cmd_export_sheets;
pub use generate::{GenerateArgs, cmd_generate_one_pace};
pub use posters::cmd_find_missing_posters;
pub use scan::{ScanArgs, ScanPlan, cmd_scan_folders};
pub use update::{UpdateArgs, cmd_update_metadata};
