//! CLI command implementations

pub mod generate;
pub mod init;
pub mod source;
pub mod tables;

pub use generate::GenerateCommand;
pub use init::InitCommand;
pub use source::SourceArgs;
pub use tables::TablesCommand;
